pub mod bdcff;
pub mod cave;
pub mod content;
pub mod map;
pub mod props;
pub mod replay;
pub mod replay_file;
pub mod rng;
pub mod types;

pub use cave::{
    CaveBase, CaveColors, CaveObject, CaveRendered, CaveStored, Highscore, HighscoreTable,
    LEVEL_COUNT, LevelMask, MazeFlavor, MazeObject, ObjectKind, PPM_MAX, RandomFillObject,
    render_cave,
};
pub use map::{CaveMap, WrapPolicy};
pub use replay::{CaveReplay, Movement, check_replays};
pub use rng::{C64RandomGenerator, RandomGenerator};
pub use types::{Coord, Direction, Element, GdColor};
