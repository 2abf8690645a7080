//! Parameters shared by the authored and the materialized cave.

use serde::{Deserialize, Serialize};

use crate::types::{Element, GdColor};

/// Number of difficulty levels; every per-level array has exactly this many
/// entries.
pub const LEVEL_COUNT: usize = 5;

/// Probabilities are stored as integer parts per million of a fraction.
pub const PPM_MAX: u32 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaveColors {
    pub border: GdColor,
    pub background: GdColor,
    pub dirt: GdColor,
    pub wall: GdColor,
    pub amoeba: GdColor,
    pub slime: GdColor,
}

impl Default for CaveColors {
    fn default() -> Self {
        Self {
            border: GdColor::c64(0),
            background: GdColor::c64(0),
            dirt: GdColor::c64(8),
            wall: GdColor::c64(12),
            amoeba: GdColor::c64(5),
            slime: GdColor::c64(5),
        }
    }
}

/// Flat record of authored cave parameters. A plain value type: copied into
/// every materialized cave, written generically through the property table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaveBase {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Visible sub-rectangle, inclusive corners.
    pub visible_x1: i32,
    pub visible_y1: i32,
    pub visible_x2: i32,
    pub visible_y2: i32,
    pub intermission: bool,
    /// Border-crossing policy of the playfield: row-shifting wrap when set,
    /// toroidal otherwise.
    pub lineshift: bool,
    /// Objects drawing outside the cave wrap through the same policy instead
    /// of being clipped.
    pub wraparound_objects: bool,
    pub colors: CaveColors,

    pub initial_border: Element,
    pub initial_fill: Element,
    pub random_fill: [Element; 4],
    /// Ascending thresholds compared against one random byte per cell.
    pub random_fill_probability: [u8; 4],

    /// Per-level seed for the random fill; a negative value selects the
    /// modern generator seeded from the materialization seed.
    pub level_random_seed: [i32; LEVEL_COUNT],
    pub level_time: [u32; LEVEL_COUNT],
    pub level_diamonds_needed: [u32; LEVEL_COUNT],
    pub level_magic_wall_time: [u32; LEVEL_COUNT],
    pub level_amoeba_time: [u32; LEVEL_COUNT],
    pub level_amoeba_threshold: [u32; LEVEL_COUNT],
    /// Parts per million.
    pub level_slime_permeability: [u32; LEVEL_COUNT],

    /// Parts per million.
    pub amoeba_growth_prob: u32,
    /// Parts per million.
    pub amoeba_fast_growth_prob: u32,

    pub diamond_value: u16,
    pub extra_diamond_value: u16,
    pub frame_time_ms: u32,

    pub magic_diamond_to: Element,
    pub magic_stone_to: Element,
    pub amoeba_too_big_effect: Element,
    pub amoeba_enclosed_effect: Element,
    pub slime_eats_1: Element,
    pub slime_converts_1: Element,
    pub slime_eats_2: Element,
    pub slime_converts_2: Element,
    pub expanding_wall_looks_like: Element,
    pub dirt_looks_like: Element,
}

impl Default for CaveBase {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: 40,
            height: 22,
            visible_x1: 0,
            visible_y1: 0,
            visible_x2: 39,
            visible_y2: 21,
            intermission: false,
            lineshift: false,
            wraparound_objects: false,
            colors: CaveColors::default(),
            initial_border: Element::SteelWall,
            initial_fill: Element::Dirt,
            random_fill: [Element::Space; 4],
            random_fill_probability: [0; 4],
            level_random_seed: [0, 1, 2, 3, 4],
            level_time: [999; LEVEL_COUNT],
            level_diamonds_needed: [10; LEVEL_COUNT],
            level_magic_wall_time: [999; LEVEL_COUNT],
            level_amoeba_time: [999; LEVEL_COUNT],
            level_amoeba_threshold: [200; LEVEL_COUNT],
            level_slime_permeability: [1_000_000; LEVEL_COUNT],
            amoeba_growth_prob: 31_250,
            amoeba_fast_growth_prob: 250_000,
            diamond_value: 0,
            extra_diamond_value: 0,
            frame_time_ms: 200,
            magic_diamond_to: Element::Stone,
            magic_stone_to: Element::Diamond,
            amoeba_too_big_effect: Element::Stone,
            amoeba_enclosed_effect: Element::Diamond,
            slime_eats_1: Element::Diamond,
            slime_converts_1: Element::Diamond,
            slime_eats_2: Element::Stone,
            slime_converts_2: Element::Stone,
            expanding_wall_looks_like: Element::BrickWall,
            dirt_looks_like: Element::Dirt,
        }
    }
}

impl CaveBase {
    /// All parts-per-million fields stay in `[0, PPM_MAX]`; the editor and the
    /// importer uphold this, the renderer relies on it.
    pub fn probabilities_in_range(&self) -> bool {
        self.amoeba_growth_prob <= PPM_MAX
            && self.amoeba_fast_growth_prob <= PPM_MAX
            && self.level_slime_permeability.iter().all(|&p| p <= PPM_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_probabilities_are_valid_fractions() {
        assert!(CaveBase::default().probabilities_in_range());
    }

    #[test]
    fn default_visible_rectangle_covers_the_whole_cave() {
        let base = CaveBase::default();
        assert_eq!(base.visible_x2 - base.visible_x1 + 1, base.width as i32);
        assert_eq!(base.visible_y2 - base.visible_y1 + 1, base.height as i32);
    }
}
