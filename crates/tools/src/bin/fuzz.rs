use anyhow::Result;
use cavern_core::{
    CaveObject, CaveRendered, CaveReplay, CaveStored, Coord, Element, LevelMask, MazeFlavor,
    MazeObject, ObjectKind, RandomFillObject, check_replays,
};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    iterations: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn rand_range(rng: &mut ChaCha8Rng, lo: i32, hi: i32) -> i32 {
    lo + (rng.next_u64() % (hi - lo) as u64) as i32
}

const FILL_ELEMENTS: [Element; 6] = [
    Element::Space,
    Element::Dirt,
    Element::Stone,
    Element::Diamond,
    Element::BrickWall,
    Element::Amoeba,
];

fn random_coord(rng: &mut ChaCha8Rng, cave: &CaveStored) -> Coord {
    Coord::new(
        rand_range(rng, 0, cave.base.width as i32),
        rand_range(rng, 0, cave.base.height as i32),
    )
}

fn random_object(rng: &mut ChaCha8Rng, cave: &CaveStored) -> CaveObject {
    let start = random_coord(rng, cave);
    let end = random_coord(rng, cave);
    let element = choose(rng, &FILL_ELEMENTS);
    let kind = match rng.next_u64() % 11 {
        0 => ObjectKind::Point { start, element },
        1 => ObjectKind::Line { start, end, element },
        2 => ObjectKind::Rectangle { start, end, element },
        3 => ObjectKind::FilledRectangle {
            start,
            end,
            border: element,
            fill: choose(rng, &FILL_ELEMENTS),
        },
        4 => ObjectKind::Raster {
            start,
            end,
            step: Coord::new(rand_range(rng, 1, 5), rand_range(rng, 1, 5)),
            element,
        },
        5 => ObjectKind::Join {
            search: choose(rng, &FILL_ELEMENTS),
            put: element,
            offset: Coord::new(rand_range(rng, -3, 4), rand_range(rng, -3, 4)),
            backwards: rng.next_u64() % 2 == 0,
        },
        6 => ObjectKind::FloodFillReplace { start, element },
        7 => ObjectKind::FloodFillBorder {
            start,
            border: Element::SteelWall,
            fill: element,
        },
        8 => ObjectKind::Maze(MazeObject {
            start,
            end,
            wall_width: rand_range(rng, 1, 3),
            path_width: rand_range(rng, 1, 3),
            wall: Element::BrickWall,
            path: choose(rng, &[Element::Space, Element::Dirt, Element::None]),
            horiz_percent: rand_range(rng, 0, 100),
            seeds: [
                rand_range(rng, -1, 1000),
                rand_range(rng, -1, 1000),
                rand_range(rng, -1, 1000),
                rand_range(rng, -1, 1000),
                rand_range(rng, -1, 1000),
            ],
            flavor: choose(
                rng,
                &[MazeFlavor::Perfect, MazeFlavor::Braid, MazeFlavor::Unicursal],
            ),
        }),
        9 => ObjectKind::RandomFill(RandomFillObject {
            start,
            end,
            replace_only: if rng.next_u64() % 2 == 0 { Some(Element::Dirt) } else { None },
            seeds: [rand_range(rng, -1, 1000); 5],
            initial: choose(rng, &FILL_ELEMENTS),
            fill: [
                choose(rng, &FILL_ELEMENTS),
                choose(rng, &FILL_ELEMENTS),
                choose(rng, &FILL_ELEMENTS),
                choose(rng, &FILL_ELEMENTS),
            ],
            probability: [
                rand_range(rng, 0, 64) as u8,
                rand_range(rng, 64, 128) as u8,
                rand_range(rng, 128, 192) as u8,
                rand_range(rng, 192, 256) as u8,
            ],
            c64_random: rng.next_u64() % 2 == 0,
        }),
        _ => ObjectKind::CopyPaste {
            src_start: start,
            src_end: end,
            dest: random_coord(rng, cave),
            mirror: rng.next_u64() % 2 == 0,
            flip: rng.next_u64() % 2 == 0,
        },
    };
    let mut object = CaveObject::new(kind);
    if rng.next_u64() % 4 == 0 {
        object.levels = LevelMask::only((rng.next_u64() % 5) as usize);
        object.levels.enable_on_level((rng.next_u64() % 5) as usize);
    }
    object
}

fn random_cave(rng: &mut ChaCha8Rng) -> CaveStored {
    let mut cave = CaveStored::new("fuzz");
    cave.base.width = rand_range(rng, 12, 41) as usize;
    cave.base.height = rand_range(rng, 10, 23) as usize;
    cave.base.lineshift = rng.next_u64() % 2 == 0;
    cave.base.wraparound_objects = rng.next_u64() % 2 == 0;
    cave.base.initial_fill = choose(rng, &FILL_ELEMENTS);
    cave.base.initial_border = Element::SteelWall;
    cave.base.random_fill = [
        choose(rng, &FILL_ELEMENTS),
        choose(rng, &FILL_ELEMENTS),
        choose(rng, &FILL_ELEMENTS),
        choose(rng, &FILL_ELEMENTS),
    ];
    cave.base.random_fill_probability = [
        rand_range(rng, 0, 64) as u8,
        rand_range(rng, 64, 128) as u8,
        rand_range(rng, 128, 192) as u8,
        rand_range(rng, 192, 256) as u8,
    ];
    cave.base.level_random_seed = [
        rand_range(rng, -1, 0x10000),
        rand_range(rng, -1, 0x10000),
        rand_range(rng, -1, 0x10000),
        rand_range(rng, -1, 0x10000),
        rand_range(rng, -1, 0x10000),
    ];
    let object_count = rand_range(rng, 0, 12);
    for _ in 0..object_count {
        let object = random_object(rng, &cave);
        cave.add_object(object);
    }
    cave
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} iterations...", args.seed, args.iterations);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for iteration in 0..args.iterations {
        let mut cave = random_cave(&mut rng);
        let level = (rng.next_u64() % 5) as usize;
        let seed = rng.next_u32();

        let first = CaveRendered::new(&cave, level, seed);
        let second = CaveRendered::new(&cave, level, seed);
        assert_eq!(
            first.canonical_bytes(),
            second.canonical_bytes(),
            "non-deterministic render at iteration {iteration}"
        );
        assert_eq!(
            first.checksum(),
            second.checksum(),
            "unstable checksum at iteration {iteration}"
        );

        // Invariants of any materialized cave.
        assert!(first.map.cells().iter().all(|&e| e != Element::None), "NONE cell in grid");
        let object_count = cave.objects.len();
        assert!(
            first.draw_order.cells().iter().flatten().all(|&order| order < object_count),
            "provenance points past the object list"
        );
        for object in &cave.objects {
            assert!(object.levels.any(), "object invisible on every level");
        }

        // A fresh replay adopts exactly the rendered checksum.
        cave.replays.push(CaveReplay::new(level, seed));
        let wrong = check_replays(&mut cave, false, false);
        assert_eq!(wrong, 0, "fresh replay flagged at iteration {iteration}");
        assert_eq!(cave.replays[0].checksum, first.checksum());

        if iteration % 50 == 0 {
            println!(
                "iteration {iteration}: {}x{} cave, {} objects, checksum {:#010x}",
                cave.base.width,
                cave.base.height,
                object_count,
                first.checksum()
            );
        }
    }

    println!("All iterations passed.");
    Ok(())
}
