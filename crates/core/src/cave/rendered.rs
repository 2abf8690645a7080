//! Materialization of an authored cave into a concrete playable grid.
//!
//! `create_map` is a pure function of `(CaveStored, level, seed)`: no global
//! state, and re-running it discards all prior contents before regenerating.
//! This determinism is what the replay checksum relies on.

use xxhash_rust::xxh3::xxh3_64;

use crate::cave::base::CaveBase;
use crate::cave::object::fill::select_random_fill_element;
use crate::cave::stored::CaveStored;
use crate::map::{CaveMap, WrapPolicy};
use crate::rng::{C64RandomGenerator, RandomGenerator, mix_seed_stream};
use crate::types::Element;

/// Register bytes for the legacy generator when the grid comes from a
/// pre-baked map. The grid takes no randomness then; the later slime stage
/// still needs a defined register state.
const PREBAKED_MAP_SEED: (u32, u32) = (0, 0);

/// Modulus of the rolling map checksum.
const CHECKSUM_MOD: u32 = 65521;

/// One concrete, playable cave: a grid for one level and one seed, plus the
/// per-cell record of which object drew last.
#[derive(Clone, Debug)]
pub struct CaveRendered {
    level: usize,
    seed: u32,
    pub base: CaveBase,

    /// Level-flattened scalars, selected from the authored 5-wide arrays.
    pub time: u32,
    pub diamonds_needed: u32,
    pub magic_wall_time: u32,
    pub amoeba_time: u32,
    pub amoeba_threshold: u32,
    pub slime_permeability: u32,
    pub rand_seed: i32,

    pub map: CaveMap<Element>,
    /// Index into the stored object list of the last object to write each
    /// cell; `None` where only the base fill touched it.
    pub draw_order: CaveMap<Option<usize>>,

    pub rng: RandomGenerator,
    pub c64_rng: C64RandomGenerator,
}

impl CaveRendered {
    pub fn new(stored: &CaveStored, level: usize, seed: u32) -> Self {
        let base = stored.base.clone();
        let width = base.width;
        let height = base.height;
        let mut rendered = Self {
            level,
            seed,
            time: base.level_time[level],
            diamonds_needed: base.level_diamonds_needed[level],
            magic_wall_time: base.level_magic_wall_time[level],
            amoeba_time: base.level_amoeba_time[level],
            amoeba_threshold: base.level_amoeba_threshold[level],
            slime_permeability: base.level_slime_permeability[level],
            rand_seed: base.level_random_seed[level],
            base,
            map: CaveMap::new(width, height, Element::Space),
            draw_order: CaveMap::new(width, height, None),
            rng: RandomGenerator::new(seed),
            c64_rng: C64RandomGenerator::new(),
        };
        rendered.create_map(stored);
        rendered
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Seed for an object whose authored seed is negative, derived from the
    /// materialization seed and the object's list position so the whole
    /// render stays a function of `(CaveStored, level, seed)`.
    pub fn derived_object_seed(&self, order: usize) -> u32 {
        mix_seed_stream(self.seed as u64, order as u64) as u32
    }

    /// Build the grid. Steps: pre-baked map or random fill, border ring,
    /// wrap policy, then every visible object in list order.
    pub fn create_map(&mut self, stored: &CaveStored) {
        let width = stored.base.width;
        let height = stored.base.height;
        self.base = stored.base.clone();
        self.time = stored.base.level_time[self.level];
        self.diamonds_needed = stored.base.level_diamonds_needed[self.level];
        self.magic_wall_time = stored.base.level_magic_wall_time[self.level];
        self.amoeba_time = stored.base.level_amoeba_time[self.level];
        self.amoeba_threshold = stored.base.level_amoeba_threshold[self.level];
        self.slime_permeability = stored.base.level_slime_permeability[self.level];
        self.rand_seed = stored.base.level_random_seed[self.level];

        if let Some(prebaked) = &stored.map {
            self.map = prebaked.clone();
            self.c64_rng.set_seed_bytes(PREBAKED_MAP_SEED.0, PREBAKED_MAP_SEED.1);
        } else {
            self.map = CaveMap::new(width, height, stored.base.initial_fill);

            let legacy = self.rand_seed >= 0;
            if legacy {
                self.c64_rng.set_seed(self.rand_seed as u16);
            } else {
                self.rng.set_seed(self.seed);
            }

            // Rows 1..h-2; the border rows are filled below. Every cell in
            // the row draws one random value, including the cells the border
            // columns overwrite: the consumption pattern is part of the
            // legacy-compatible sequence.
            for y in 1..height.saturating_sub(1) as i32 {
                for x in 0..width as i32 {
                    let random_byte = if legacy {
                        self.c64_rng.random()
                    } else {
                        self.rng.rand_int_range(0, 256) as u8
                    };
                    let element = select_random_fill_element(
                        random_byte,
                        stored.base.initial_fill,
                        &stored.base.random_fill,
                        &stored.base.random_fill_probability,
                    );
                    self.map.set(x, y, element);
                }
            }

            for x in 0..width as i32 {
                self.map.set(x, 0, stored.base.initial_border);
                self.map.set(x, height as i32 - 1, stored.base.initial_border);
            }
            for y in 0..height as i32 {
                self.map.set(0, y, stored.base.initial_border);
                self.map.set(width as i32 - 1, y, stored.base.initial_border);
            }
        }

        let wrap =
            if stored.base.lineshift { WrapPolicy::LineShift } else { WrapPolicy::Perfect };
        self.map.set_wrap_policy(wrap);

        self.draw_order = CaveMap::new(width, height, None);
        for (order, object) in stored.objects.iter().enumerate() {
            if object.levels.is_seen_on(self.level) {
                object.draw(self, order);
            }
        }
    }

    /// Write one cell on behalf of an object. `Element::None` skips the
    /// cell. With `wraparound_objects` the coordinate is first normalized
    /// through the map's wrap policy; a coordinate still out of bounds after
    /// that is dropped silently.
    pub fn store(&mut self, x: i32, y: i32, element: Element, order: usize) {
        if element == Element::None {
            return;
        }
        let normalized = if self.base.wraparound_objects {
            self.map.normalize(x, y)
        } else {
            WrapPolicy::None.normalize(self.map.width(), self.map.height(), x, y)
        };
        let Some((nx, ny)) = normalized else {
            return;
        };
        self.map.set(nx as i32, ny as i32, element);
        self.draw_order.set(nx as i32, ny as i32, Some(order));
    }

    /// Order-dependent rolling checksum over the grid, row-major. Divergence
    /// between a replay and the cave it claims to belong to shows up here.
    pub fn checksum(&self) -> u32 {
        let mut a: u32 = 1;
        let mut b: u32 = 0;
        for element in self.map.cells() {
            a = (a + element.character() as u32) % CHECKSUM_MOD;
            b = (b + a) % CHECKSUM_MOD;
        }
        (b << 16) | a
    }

    /// Stable byte serialization of everything materialization decided,
    /// for fingerprinting in tests and tools.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.map.width() as u32).to_le_bytes());
        bytes.extend((self.map.height() as u32).to_le_bytes());
        bytes.push(self.level as u8);
        bytes.extend(self.seed.to_le_bytes());
        for element in self.map.cells() {
            bytes.push(element.code());
        }
        for order in self.draw_order.cells() {
            match order {
                None => bytes.extend(u32::MAX.to_le_bytes()),
                Some(index) => bytes.extend((*index as u32).to_le_bytes()),
            }
        }
        bytes
    }

    /// xxh3 fingerprint of [`CaveRendered::canonical_bytes`], for
    /// determinism regressions and the fuzz harness.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
