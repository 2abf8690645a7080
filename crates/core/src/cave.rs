//! Cave domain split into coherent submodules.

pub mod base;
pub mod object;
pub mod rendered;
pub mod stored;

pub use base::{CaveBase, CaveColors, LEVEL_COUNT, PPM_MAX};
pub use object::{CaveObject, LevelMask, MazeFlavor, MazeObject, ObjectKind, RandomFillObject};
pub use rendered::CaveRendered;
pub use stored::{CaveStored, HIGHSCORE_CAPACITY, Highscore, HighscoreTable};

/// Materialize one playable cave from an authored cave.
pub fn render_cave(stored: &CaveStored, level: usize, seed: u32) -> CaveRendered {
    CaveRendered::new(stored, level, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_cave_matches_direct_construction() {
        let stored = CaveStored::new("probe");
        let from_helper = render_cave(&stored, 1, 77);
        let direct = CaveRendered::new(&stored, 1, 77);
        assert_eq!(from_helper.canonical_bytes(), direct.canonical_bytes());
    }
}
