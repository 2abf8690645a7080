use serde::{Deserialize, Serialize};

/// Grid coordinate. Signed so object geometry may reach outside the cave;
/// the wrap policy decides what happens there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Cave cell contents. `None` is not a real cell value: objects use it to
/// skip cells while drawing, and it never appears in a materialized map.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Element {
    None,
    #[default]
    Space,
    Dirt,
    BrickWall,
    MagicWall,
    SteelWall,
    ExpandingWall,
    Stone,
    Diamond,
    Inbox,
    Outbox,
    InvisibleOutbox,
    Firefly,
    Butterfly,
    Amoeba,
    Slime,
    Acid,
    Water,
    Voodoo,
    Bomb,
    Player,
}

impl Element {
    /// Identifier used by the external text format.
    pub fn name(self) -> &'static str {
        match self {
            Element::None => "NONE",
            Element::Space => "SPACE",
            Element::Dirt => "DIRT",
            Element::BrickWall => "WALL",
            Element::MagicWall => "MAGICWALL",
            Element::SteelWall => "STEELWALL",
            Element::ExpandingWall => "EXPANDINGWALL",
            Element::Stone => "BOULDER",
            Element::Diamond => "DIAMOND",
            Element::Inbox => "INBOX",
            Element::Outbox => "OUTBOX",
            Element::InvisibleOutbox => "HIDDENOUTBOX",
            Element::Firefly => "FIREFLY",
            Element::Butterfly => "BUTTERFLY",
            Element::Amoeba => "AMOEBA",
            Element::Slime => "SLIME",
            Element::Acid => "ACID",
            Element::Water => "WATER",
            Element::Voodoo => "VOODOO",
            Element::Bomb => "BOMB",
            Element::Player => "PLAYER",
        }
    }

    /// One-character code used by the external text format and by the
    /// rendered-map checksum. Unique per element.
    pub fn character(self) -> u8 {
        match self {
            Element::None => b'?',
            Element::Space => b' ',
            Element::Dirt => b'.',
            Element::BrickWall => b'w',
            Element::MagicWall => b'M',
            Element::SteelWall => b'W',
            Element::ExpandingWall => b'x',
            Element::Stone => b'r',
            Element::Diamond => b'd',
            Element::Inbox => b'P',
            Element::Outbox => b'X',
            Element::InvisibleOutbox => b'H',
            Element::Firefly => b'q',
            Element::Butterfly => b'c',
            Element::Amoeba => b'a',
            Element::Slime => b's',
            Element::Acid => b'Y',
            Element::Water => b'v',
            Element::Voodoo => b'F',
            Element::Bomb => b'N',
            Element::Player => b'p',
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ALL_ELEMENTS.iter().copied().find(|e| e.name() == name)
    }

    /// Stable numeric code used by canonical byte serializations.
    pub fn code(self) -> u8 {
        ALL_ELEMENTS.iter().position(|&e| e == self).map(|i| i as u8).unwrap_or(0)
    }
}

pub const ALL_ELEMENTS: [Element; 21] = [
    Element::None,
    Element::Space,
    Element::Dirt,
    Element::BrickWall,
    Element::MagicWall,
    Element::SteelWall,
    Element::ExpandingWall,
    Element::Stone,
    Element::Diamond,
    Element::Inbox,
    Element::Outbox,
    Element::InvisibleOutbox,
    Element::Firefly,
    Element::Butterfly,
    Element::Amoeba,
    Element::Slime,
    Element::Acid,
    Element::Water,
    Element::Voodoo,
    Element::Bomb,
    Element::Player,
];

/// Player movement direction, low nibble of a packed replay byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Still,
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

pub const ALL_DIRECTIONS: [Direction; 9] = [
    Direction::Still,
    Direction::Up,
    Direction::UpRight,
    Direction::Right,
    Direction::DownRight,
    Direction::Down,
    Direction::DownLeft,
    Direction::Left,
    Direction::UpLeft,
];

impl Direction {
    pub fn to_nibble(self) -> u8 {
        ALL_DIRECTIONS.iter().position(|&d| d == self).unwrap_or(0) as u8
    }

    pub fn from_nibble(nibble: u8) -> Option<Self> {
        ALL_DIRECTIONS.get(nibble as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Still => "still",
            Direction::Up => "up",
            Direction::UpRight => "upright",
            Direction::Right => "right",
            Direction::DownRight => "downright",
            Direction::Down => "down",
            Direction::DownLeft => "downleft",
            Direction::Left => "left",
            Direction::UpLeft => "upleft",
        }
    }
}

/// RGB display color carried by the authored cave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GdColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl GdColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Classic 16-entry hardware palette, index taken mod 16.
    pub const fn c64(index: u8) -> Self {
        C64_PALETTE[(index % 16) as usize]
    }
}

const C64_PALETTE: [GdColor; 16] = [
    GdColor::rgb(0x00, 0x00, 0x00),
    GdColor::rgb(0xff, 0xff, 0xff),
    GdColor::rgb(0x88, 0x00, 0x00),
    GdColor::rgb(0xaa, 0xff, 0xee),
    GdColor::rgb(0xcc, 0x44, 0xcc),
    GdColor::rgb(0x00, 0xcc, 0x55),
    GdColor::rgb(0x00, 0x00, 0xaa),
    GdColor::rgb(0xee, 0xee, 0x77),
    GdColor::rgb(0xdd, 0x88, 0x55),
    GdColor::rgb(0x66, 0x44, 0x00),
    GdColor::rgb(0xff, 0x77, 0x77),
    GdColor::rgb(0x33, 0x33, 0x33),
    GdColor::rgb(0x77, 0x77, 0x77),
    GdColor::rgb(0xaa, 0xff, 0x66),
    GdColor::rgb(0x00, 0x88, 0xff),
    GdColor::rgb(0xbb, 0xbb, 0xbb),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn element_characters_are_unique() {
        let chars: BTreeSet<u8> = ALL_ELEMENTS.iter().map(|e| e.character()).collect();
        assert_eq!(chars.len(), ALL_ELEMENTS.len());
    }

    #[test]
    fn element_names_round_trip() {
        for element in ALL_ELEMENTS {
            assert_eq!(Element::from_name(element.name()), Some(element));
        }
    }

    #[test]
    fn direction_nibbles_round_trip() {
        for direction in ALL_DIRECTIONS {
            assert_eq!(Direction::from_nibble(direction.to_nibble()), Some(direction));
        }
        assert_eq!(Direction::from_nibble(9), None);
    }
}
