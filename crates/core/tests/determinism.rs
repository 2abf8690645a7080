use cavern_core::content::showcase_cave;
use cavern_core::{CaveRendered, CaveStored, Element};

#[test]
fn rendering_the_same_cave_twice_is_byte_identical() {
    let cave = showcase_cave();
    for level in 0..5 {
        for seed in [1_u32, 42, 0xFFFF_FFFF] {
            let first = CaveRendered::new(&cave, level, seed);
            let second = CaveRendered::new(&cave, level, seed);
            assert_eq!(
                first.canonical_bytes(),
                second.canonical_bytes(),
                "level {level} seed {seed}"
            );
        }
    }
}

#[test]
fn checksum_is_a_pure_function_of_cave_level_and_seed() {
    let cave = showcase_cave();
    let first = CaveRendered::new(&cave, 1, 99).checksum();
    let second = CaveRendered::new(&cave, 1, 99).checksum();
    assert_eq!(first, second);
}

#[test]
fn different_levels_produce_different_grids() {
    let cave = showcase_cave();
    let level0 = CaveRendered::new(&cave, 0, 7);
    let level1 = CaveRendered::new(&cave, 1, 7);
    assert_ne!(level0.map.cells(), level1.map.cells());
}

#[test]
fn fingerprints_are_stable_across_independent_renders() {
    let cave = showcase_cave();
    let fingerprint_a = CaveRendered::new(&cave, 2, 5).fingerprint();
    let fingerprint_b = CaveRendered::new(&cave, 2, 5).fingerprint();
    assert_eq!(fingerprint_a, fingerprint_b);
    let other_level = CaveRendered::new(&cave, 3, 5).fingerprint();
    assert_ne!(fingerprint_a, other_level);
}

#[test]
fn modern_generator_path_depends_on_the_materialization_seed() {
    let mut cave = showcase_cave();
    // A negative per-level seed switches the random fill to the modern
    // generator seeded from the materialization seed.
    cave.base.level_random_seed = [-1; 5];
    let seed_a = CaveRendered::new(&cave, 0, 1);
    let seed_a_again = CaveRendered::new(&cave, 0, 1);
    let seed_b = CaveRendered::new(&cave, 0, 2);
    assert_eq!(seed_a.map.cells(), seed_a_again.map.cells());
    assert_ne!(seed_a.map.cells(), seed_b.map.cells());
}

#[test]
fn legacy_generator_path_ignores_the_materialization_seed() {
    let cave = showcase_cave();
    // Positive per-level seeds drive the fill from the legacy generator, so
    // the materialization seed only affects objects with derived seeds; the
    // showcase maze has one, so pin it before comparing.
    let mut cave = cave;
    for object in &mut cave.objects {
        if let cavern_core::ObjectKind::Maze(maze) = &mut object.kind {
            maze.seeds = [3; 5];
        }
    }
    let seed_a = CaveRendered::new(&cave, 0, 1);
    let seed_b = CaveRendered::new(&cave, 0, 123_456);
    assert_eq!(seed_a.map.cells(), seed_b.map.cells());
}

#[test]
fn legacy_fill_matches_the_golden_grid() {
    let mut cave = CaveStored::new("golden");
    cave.base.width = 6;
    cave.base.height = 5;
    cave.base.initial_fill = Element::Dirt;
    cave.base.initial_border = Element::SteelWall;
    cave.base.random_fill = [Element::Stone, Element::Space, Element::Space, Element::Space];
    cave.base.random_fill_probability = [128, 0, 0, 0];
    cave.base.level_random_seed = [7; 5];

    let rendered = CaveRendered::new(&cave, 0, 1);
    let expected = "\
WWWWWW
WDSSDW
WSDDSW
WSDDDW
WWWWWW";
    let mut drawn = String::new();
    for y in 0..5 {
        if y > 0 {
            drawn.push('\n');
        }
        for x in 0..6 {
            drawn.push(match rendered.map.get(x, y) {
                Element::SteelWall => 'W',
                Element::Dirt => 'D',
                Element::Stone => 'S',
                other => panic!("unexpected element {other:?} at ({x}, {y})"),
            });
        }
    }
    assert_eq!(drawn, expected);
}
