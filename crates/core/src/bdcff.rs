//! Text codecs for the external cave description format.
//!
//! Three independent codecs live here: `Identifier=value` cave parameter
//! lines driven by the property table, positional object lines, and the
//! run-length movement encoding used by replays. All encoders are canonical:
//! encode → decode → re-encode reproduces the same text.

use std::fmt;

use crate::cave::object::{
    CaveObject, LevelMask, MazeFlavor, MazeObject, ObjectKind, RandomFillObject,
};
use crate::cave::stored::CaveStored;
use crate::props::{self, PROP_ALWAYS_SAVE, PropKind, PropValue};
use crate::replay::Movement;
use crate::types::{Coord, Element};

/// Longest run one movement token can carry.
const MOVEMENT_RUN_CAP: usize = 255;

#[derive(Debug, PartialEq, Eq)]
pub enum BdcffError {
    UnknownProperty(String),
    InvalidValue { identifier: String, message: String },
    UnknownObject(String),
    InvalidObject { message: String },
    InvalidMovement { message: String },
}

impl fmt::Display for BdcffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProperty(identifier) => {
                write!(f, "unknown cave property: {identifier}")
            }
            Self::InvalidValue { identifier, message } => {
                write!(f, "invalid value for {identifier}: {message}")
            }
            Self::UnknownObject(name) => write!(f, "unknown object type: {name}"),
            Self::InvalidObject { message } => write!(f, "invalid object line: {message}"),
            Self::InvalidMovement { message } => {
                write!(f, "invalid movement string: {message}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property values
// ---------------------------------------------------------------------------

pub fn format_value(value: &PropValue) -> String {
    match value {
        PropValue::Bool(b) => b.to_string(),
        PropValue::Int(i) => i.to_string(),
        PropValue::String(s) => s.clone(),
        PropValue::Element(e) => e.name().to_string(),
        PropValue::Elements4(elements) => {
            elements.iter().map(|e| e.name()).collect::<Vec<_>>().join(" ")
        }
        PropValue::Bytes4(bytes) => {
            bytes.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(" ")
        }
        PropValue::IntLevels(levels) => {
            levels.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
        }
        PropValue::UIntLevels(levels) | PropValue::ProbabilityLevels(levels) => {
            levels.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
        }
        PropValue::Probability(p) => p.to_string(),
    }
}

pub fn parse_value(kind: PropKind, text: &str) -> Result<PropValue, BdcffError> {
    let invalid = |message: String| BdcffError::InvalidValue {
        identifier: String::new(),
        message,
    };
    let words: Vec<&str> = text.split_whitespace().collect();
    match kind {
        PropKind::Bool => match text.trim() {
            "true" => Ok(PropValue::Bool(true)),
            "false" => Ok(PropValue::Bool(false)),
            other => Err(invalid(format!("expected true or false, got {other:?}"))),
        },
        PropKind::Int => text
            .trim()
            .parse::<i32>()
            .map(PropValue::Int)
            .map_err(|e| invalid(e.to_string())),
        PropKind::String => Ok(PropValue::String(text.to_string())),
        PropKind::Element => parse_element(text.trim()).map(PropValue::Element),
        PropKind::Elements4 => {
            let elements = parse_fixed::<Element, 4>(&words, parse_element)?;
            Ok(PropValue::Elements4(elements))
        }
        PropKind::Bytes4 => {
            let bytes = parse_fixed::<u8, 4>(&words, |w| {
                w.parse::<u8>().map_err(|e| invalid(e.to_string()))
            })?;
            Ok(PropValue::Bytes4(bytes))
        }
        PropKind::IntLevels => {
            let levels = parse_fixed::<i32, 5>(&words, |w| {
                w.parse::<i32>().map_err(|e| invalid(e.to_string()))
            })?;
            Ok(PropValue::IntLevels(levels))
        }
        PropKind::UIntLevels => {
            let levels = parse_fixed::<u32, 5>(&words, |w| {
                w.parse::<u32>().map_err(|e| invalid(e.to_string()))
            })?;
            Ok(PropValue::UIntLevels(levels))
        }
        PropKind::Probability => text
            .trim()
            .parse::<u32>()
            .map(PropValue::Probability)
            .map_err(|e| invalid(e.to_string())),
        PropKind::ProbabilityLevels => {
            let levels = parse_fixed::<u32, 5>(&words, |w| {
                w.parse::<u32>().map_err(|e| invalid(e.to_string()))
            })?;
            Ok(PropValue::ProbabilityLevels(levels))
        }
    }
}

fn parse_element(word: &str) -> Result<Element, BdcffError> {
    Element::from_name(word).ok_or_else(|| BdcffError::InvalidValue {
        identifier: String::new(),
        message: format!("unknown element name {word:?}"),
    })
}

fn parse_fixed<T: Copy + Default, const N: usize>(
    words: &[&str],
    parse: impl Fn(&str) -> Result<T, BdcffError>,
) -> Result<[T; N], BdcffError> {
    if words.len() != N {
        return Err(BdcffError::InvalidValue {
            identifier: String::new(),
            message: format!("expected {N} values, got {}", words.len()),
        });
    }
    let mut out = [T::default(); N];
    for (slot, word) in out.iter_mut().zip(words.iter().copied()) {
        *slot = parse(word)?;
    }
    Ok(out)
}

/// Format every cave parameter that differs from its default (or is flagged
/// always-save) as an `Identifier=value` line.
pub fn cave_properties_to_lines(stored: &CaveStored) -> Vec<String> {
    let defaults = CaveStored::default();
    let mut lines = Vec::new();
    for descriptor in props::cave_properties() {
        let value = (descriptor.get)(stored);
        if descriptor.flags & PROP_ALWAYS_SAVE == 0 && value == (descriptor.get)(&defaults) {
            continue;
        }
        lines.push(format!("{}={}", descriptor.identifier, format_value(&value)));
    }
    lines
}

/// Apply one `Identifier=value` line to a cave.
pub fn set_cave_property(
    stored: &mut CaveStored,
    identifier: &str,
    value_text: &str,
) -> Result<(), BdcffError> {
    let descriptor = props::find_property(identifier)
        .ok_or_else(|| BdcffError::UnknownProperty(identifier.to_string()))?;
    let value = parse_value(descriptor.kind, value_text).map_err(|e| match e {
        BdcffError::InvalidValue { message, .. } => BdcffError::InvalidValue {
            identifier: identifier.to_string(),
            message,
        },
        other => other,
    })?;
    if !(descriptor.set)(stored, &value) {
        return Err(BdcffError::InvalidValue {
            identifier: identifier.to_string(),
            message: "value rejected".to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Object lines
// ---------------------------------------------------------------------------

/// Positional one-line encoding of a cave object. A trailing `levels=` token
/// appears only when the object is not visible on all five levels.
pub fn object_to_line(object: &CaveObject) -> String {
    let args = match &object.kind {
        ObjectKind::Point { start, element } => {
            format!("{} {} {}", start.x, start.y, element.name())
        }
        ObjectKind::Line { start, end, element } => {
            format!("{} {} {} {} {}", start.x, start.y, end.x, end.y, element.name())
        }
        ObjectKind::Rectangle { start, end, element } => {
            format!("{} {} {} {} {}", start.x, start.y, end.x, end.y, element.name())
        }
        ObjectKind::FilledRectangle { start, end, border, fill } => format!(
            "{} {} {} {} {} {}",
            start.x,
            start.y,
            end.x,
            end.y,
            border.name(),
            fill.name()
        ),
        ObjectKind::Raster { start, end, step, element } => format!(
            "{} {} {} {} {} {} {}",
            start.x,
            start.y,
            end.x,
            end.y,
            step.x,
            step.y,
            element.name()
        ),
        ObjectKind::Join { search, put, offset, backwards } => format!(
            "{} {} {} {} {}",
            search.name(),
            put.name(),
            offset.x,
            offset.y,
            if *backwards { "backward" } else { "forward" }
        ),
        ObjectKind::FloodFillReplace { start, element } => {
            format!("{} {} {}", start.x, start.y, element.name())
        }
        ObjectKind::FloodFillBorder { start, border, fill } => {
            format!("{} {} {} {}", start.x, start.y, border.name(), fill.name())
        }
        ObjectKind::Maze(maze) => {
            let seeds =
                maze.seeds.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ");
            format!(
                "{} {} {} {} {} {} {} {} {} {seeds}",
                maze.start.x,
                maze.start.y,
                maze.end.x,
                maze.end.y,
                maze.wall_width,
                maze.path_width,
                maze.horiz_percent,
                maze.wall.name(),
                maze.path.name()
            )
        }
        ObjectKind::RandomFill(rf) => {
            let pairs = rf
                .fill
                .iter()
                .zip(&rf.probability)
                .map(|(e, p)| format!("{} {p}", e.name()))
                .collect::<Vec<_>>()
                .join(" ");
            let seeds = rf.seeds.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ");
            let mask = rf.replace_only.unwrap_or(Element::None);
            format!(
                "{} {} {} {} {} {} {pairs} {seeds} {}",
                rf.start.x,
                rf.start.y,
                rf.end.x,
                rf.end.y,
                mask.name(),
                rf.initial.name(),
                rf.c64_random
            )
        }
        ObjectKind::CopyPaste { src_start, src_end, dest, mirror, flip } => format!(
            "{} {} {} {} {} {} {mirror} {flip}",
            src_start.x, src_start.y, src_end.x, src_end.y, dest.x, dest.y
        ),
    };
    let mut line = format!("{}={}", object.type_name(), args);
    if object.levels != LevelMask::all() {
        let numbers = object
            .levels
            .level_numbers()
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",");
        line.push_str(&format!(" levels={numbers}"));
    }
    line
}

struct ArgReader<'a> {
    words: Vec<&'a str>,
    position: usize,
}

impl<'a> ArgReader<'a> {
    fn new(text: &'a str) -> Self {
        Self { words: text.split_whitespace().collect(), position: 0 }
    }

    fn next_word(&mut self) -> Result<&'a str, BdcffError> {
        let word = self.words.get(self.position).copied().ok_or(BdcffError::InvalidObject {
            message: "missing argument".to_string(),
        })?;
        self.position += 1;
        Ok(word)
    }

    fn next_int(&mut self) -> Result<i32, BdcffError> {
        let word = self.next_word()?;
        word.parse::<i32>().map_err(|e| BdcffError::InvalidObject { message: e.to_string() })
    }

    fn next_coord(&mut self) -> Result<Coord, BdcffError> {
        Ok(Coord::new(self.next_int()?, self.next_int()?))
    }

    fn next_element(&mut self) -> Result<Element, BdcffError> {
        let word = self.next_word()?;
        Element::from_name(word).ok_or_else(|| BdcffError::InvalidObject {
            message: format!("unknown element name {word:?}"),
        })
    }

    fn next_bool(&mut self) -> Result<bool, BdcffError> {
        match self.next_word()? {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(BdcffError::InvalidObject {
                message: format!("expected true or false, got {other:?}"),
            }),
        }
    }

    fn next_seeds(&mut self) -> Result<[i32; 5], BdcffError> {
        let mut seeds = [0_i32; 5];
        for seed in &mut seeds {
            *seed = self.next_int()?;
        }
        Ok(seeds)
    }

    fn finish(self) -> Result<(), BdcffError> {
        if self.position == self.words.len() {
            Ok(())
        } else {
            Err(BdcffError::InvalidObject {
                message: format!("{} trailing arguments", self.words.len() - self.position),
            })
        }
    }
}

pub fn object_from_line(line: &str) -> Result<CaveObject, BdcffError> {
    let (name, rest) = line.split_once('=').ok_or_else(|| BdcffError::InvalidObject {
        message: "missing '='".to_string(),
    })?;

    // Optional levels suffix.
    let (args, levels) = match rest.rsplit_once(" levels=") {
        Some((args, numbers)) => (args, parse_level_mask(numbers)?),
        None => (rest, LevelMask::all()),
    };

    let mut reader = ArgReader::new(args);
    let kind = match name {
        "Point" => ObjectKind::Point {
            start: reader.next_coord()?,
            element: reader.next_element()?,
        },
        "Line" => ObjectKind::Line {
            start: reader.next_coord()?,
            end: reader.next_coord()?,
            element: reader.next_element()?,
        },
        "Rectangle" => ObjectKind::Rectangle {
            start: reader.next_coord()?,
            end: reader.next_coord()?,
            element: reader.next_element()?,
        },
        "FillRect" => ObjectKind::FilledRectangle {
            start: reader.next_coord()?,
            end: reader.next_coord()?,
            border: reader.next_element()?,
            fill: reader.next_element()?,
        },
        "Raster" => ObjectKind::Raster {
            start: reader.next_coord()?,
            end: reader.next_coord()?,
            step: reader.next_coord()?,
            element: reader.next_element()?,
        },
        "Join" => {
            let search = reader.next_element()?;
            let put = reader.next_element()?;
            let offset = reader.next_coord()?;
            let backwards = match reader.next_word()? {
                "forward" => false,
                "backward" => true,
                other => {
                    return Err(BdcffError::InvalidObject {
                        message: format!("expected forward or backward, got {other:?}"),
                    });
                }
            };
            ObjectKind::Join { search, put, offset, backwards }
        }
        "ReplaceFill" => ObjectKind::FloodFillReplace {
            start: reader.next_coord()?,
            element: reader.next_element()?,
        },
        "BoundaryFill" => ObjectKind::FloodFillBorder {
            start: reader.next_coord()?,
            border: reader.next_element()?,
            fill: reader.next_element()?,
        },
        "Maze" | "BraidMaze" | "UnicursalMaze" => {
            let flavor = match name {
                "Maze" => MazeFlavor::Perfect,
                "BraidMaze" => MazeFlavor::Braid,
                _ => MazeFlavor::Unicursal,
            };
            let start = reader.next_coord()?;
            let end = reader.next_coord()?;
            let wall_width = reader.next_int()?;
            let path_width = reader.next_int()?;
            let horiz_percent = reader.next_int()?;
            let wall = reader.next_element()?;
            let path = reader.next_element()?;
            let seeds = reader.next_seeds()?;
            ObjectKind::Maze(MazeObject {
                start,
                end,
                wall_width,
                path_width,
                wall,
                path,
                horiz_percent,
                seeds,
                flavor,
            })
        }
        "RandomFill" => {
            let start = reader.next_coord()?;
            let end = reader.next_coord()?;
            let mask = reader.next_element()?;
            let initial = reader.next_element()?;
            let mut fill = [Element::Space; 4];
            let mut probability = [0_u8; 4];
            for k in 0..4 {
                fill[k] = reader.next_element()?;
                let p = reader.next_int()?;
                if !(0..=255).contains(&p) {
                    return Err(BdcffError::InvalidObject {
                        message: format!("probability {p} out of byte range"),
                    });
                }
                probability[k] = p as u8;
            }
            let seeds = reader.next_seeds()?;
            let c64_random = reader.next_bool()?;
            ObjectKind::RandomFill(RandomFillObject {
                start,
                end,
                replace_only: if mask == Element::None { None } else { Some(mask) },
                seeds,
                initial,
                fill,
                probability,
                c64_random,
            })
        }
        "CopyPaste" => ObjectKind::CopyPaste {
            src_start: reader.next_coord()?,
            src_end: reader.next_coord()?,
            dest: reader.next_coord()?,
            mirror: reader.next_bool()?,
            flip: reader.next_bool()?,
        },
        other => return Err(BdcffError::UnknownObject(other.to_string())),
    };
    reader.finish()?;

    Ok(CaveObject::on_levels(levels, kind))
}

fn parse_level_mask(numbers: &str) -> Result<LevelMask, BdcffError> {
    let mut mask: Option<LevelMask> = None;
    for number in numbers.split(',') {
        let level: usize = number.trim().parse().map_err(|_| BdcffError::InvalidObject {
            message: format!("bad level number {number:?}"),
        })?;
        if !(1..=5).contains(&level) {
            return Err(BdcffError::InvalidObject {
                message: format!("level {level} out of range 1..=5"),
            });
        }
        mask = Some(match mask {
            None => LevelMask::only(level - 1),
            Some(mut seen) => {
                seen.enable_on_level(level - 1);
                seen
            }
        });
    }
    mask.ok_or_else(|| BdcffError::InvalidObject { message: "empty level list".to_string() })
}

// ---------------------------------------------------------------------------
// Movements
// ---------------------------------------------------------------------------

/// Run-length encode packed movement bytes: four hex digits per run, two for
/// the movement and two for the run length. Runs longer than 255 split.
pub fn encode_movements(movements: &[u8]) -> String {
    let mut text = String::new();
    let mut index = 0;
    while index < movements.len() {
        let byte = movements[index];
        let mut run = 1;
        while index + run < movements.len() && movements[index + run] == byte && run < MOVEMENT_RUN_CAP
        {
            run += 1;
        }
        text.push_str(&format!("{byte:02x}{run:02x}"));
        index += run;
    }
    text
}

pub fn decode_movements(text: &str) -> Result<Vec<u8>, BdcffError> {
    let text = text.trim();
    if !text.len().is_multiple_of(4) {
        return Err(BdcffError::InvalidMovement {
            message: format!("length {} is not a multiple of 4", text.len()),
        });
    }
    let mut movements = Vec::new();
    for token in text.as_bytes().chunks(4) {
        let token = std::str::from_utf8(token).map_err(|_| BdcffError::InvalidMovement {
            message: "non-ASCII movement token".to_string(),
        })?;
        let byte = u8::from_str_radix(&token[0..2], 16).map_err(|e| {
            BdcffError::InvalidMovement { message: e.to_string() }
        })?;
        let run = u8::from_str_radix(&token[2..4], 16).map_err(|e| {
            BdcffError::InvalidMovement { message: e.to_string() }
        })?;
        if run == 0 {
            return Err(BdcffError::InvalidMovement {
                message: "zero-length run".to_string(),
            });
        }
        if Movement::unpack(byte).is_none() {
            return Err(BdcffError::InvalidMovement {
                message: format!("byte {byte:#04x} is not a valid movement"),
            });
        }
        for _ in 0..run {
            movements.push(byte);
        }
    }
    Ok(movements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cave::object::RandomFillObject;
    use crate::types::Direction;

    #[test]
    fn cave_property_lines_round_trip() {
        let mut cave = CaveStored::new("Round Trip");
        cave.base.width = 20;
        cave.base.height = 12;
        cave.base.lineshift = true;
        cave.base.random_fill = [Element::Stone, Element::Diamond, Element::Space, Element::Space];
        cave.base.random_fill_probability = [100, 120, 0, 0];
        cave.base.level_random_seed = [-1, 20, 30, 40, 50];
        cave.base.amoeba_growth_prob = 12_345;

        let mut decoded = CaveStored::default();
        for line in cave_properties_to_lines(&cave) {
            let (identifier, value) = line.split_once('=').unwrap();
            set_cave_property(&mut decoded, identifier, value).unwrap();
        }
        assert_eq!(decoded.base, cave.base);
    }

    #[test]
    fn unchanged_defaults_are_not_written_unless_flagged() {
        let cave = CaveStored::new("x");
        let lines = cave_properties_to_lines(&cave);
        assert!(lines.iter().any(|l| l.starts_with("Name=")));
        assert!(lines.iter().any(|l| l.starts_with("Width=")));
        assert!(!lines.iter().any(|l| l.starts_with("Lineshift=")));
    }

    #[test]
    fn unknown_property_is_reported() {
        let mut cave = CaveStored::default();
        let error = set_cave_property(&mut cave, "NoSuchThing", "1").unwrap_err();
        assert_eq!(error, BdcffError::UnknownProperty("NoSuchThing".to_string()));
    }

    fn sample_objects() -> Vec<CaveObject> {
        vec![
            CaveObject::new(ObjectKind::Point {
                start: Coord::new(3, 4),
                element: Element::Diamond,
            }),
            CaveObject::new(ObjectKind::Line {
                start: Coord::new(0, 0),
                end: Coord::new(9, 5),
                element: Element::BrickWall,
            }),
            CaveObject::new(ObjectKind::Rectangle {
                start: Coord::new(1, 1),
                end: Coord::new(8, 8),
                element: Element::SteelWall,
            }),
            CaveObject::new(ObjectKind::FilledRectangle {
                start: Coord::new(2, 2),
                end: Coord::new(6, 6),
                border: Element::BrickWall,
                fill: Element::Space,
            }),
            CaveObject::new(ObjectKind::Raster {
                start: Coord::new(2, 2),
                end: Coord::new(20, 12),
                step: Coord::new(3, 2),
                element: Element::Stone,
            }),
            CaveObject::new(ObjectKind::Join {
                search: Element::Diamond,
                put: Element::Firefly,
                offset: Coord::new(1, -2),
                backwards: true,
            }),
            CaveObject::new(ObjectKind::FloodFillReplace {
                start: Coord::new(5, 5),
                element: Element::Amoeba,
            }),
            CaveObject::new(ObjectKind::FloodFillBorder {
                start: Coord::new(4, 4),
                border: Element::SteelWall,
                fill: Element::Water,
            }),
            CaveObject::on_levels(
                LevelMask::only(4),
                ObjectKind::Maze(MazeObject {
                    start: Coord::new(1, 1),
                    end: Coord::new(19, 11),
                    wall_width: 1,
                    path_width: 2,
                    wall: Element::BrickWall,
                    path: Element::Space,
                    horiz_percent: 40,
                    seeds: [-1, -1, 7, 8, 9],
                    flavor: MazeFlavor::Braid,
                }),
            ),
            CaveObject::new(ObjectKind::RandomFill(RandomFillObject {
                start: Coord::new(4, 4),
                end: Coord::new(14, 10),
                replace_only: Some(Element::Dirt),
                seeds: [5, 5, 5, 5, 5],
                initial: Element::Dirt,
                fill: [Element::Stone, Element::Diamond, Element::Space, Element::Space],
                probability: [60, 90, 0, 0],
                c64_random: true,
            })),
            CaveObject::new(ObjectKind::CopyPaste {
                src_start: Coord::new(1, 1),
                src_end: Coord::new(5, 5),
                dest: Coord::new(10, 10),
                mirror: true,
                flip: false,
            }),
        ]
    }

    #[test]
    fn object_lines_round_trip_for_every_kind() {
        for object in sample_objects() {
            let line = object_to_line(&object);
            let decoded = object_from_line(&line).unwrap_or_else(|e| {
                panic!("failed to parse {line:?}: {e}");
            });
            assert_eq!(decoded, object, "{line}");
            assert_eq!(object_to_line(&decoded), line);
        }
    }

    #[test]
    fn object_line_with_bad_element_is_rejected() {
        let error = object_from_line("Point=1 2 GOLD").unwrap_err();
        assert!(matches!(error, BdcffError::InvalidObject { .. }));
    }

    #[test]
    fn movement_encoding_round_trips() {
        let still = Movement::default().pack();
        let right =
            Movement { direction: Direction::Right, fire: false, suicide: false }.pack();
        let fire_up = Movement { direction: Direction::Up, fire: true, suicide: false }.pack();
        let movements = vec![still, still, right, right, right, fire_up, still];
        let text = encode_movements(&movements);
        assert_eq!(decode_movements(&text).unwrap(), movements);
        assert_eq!(encode_movements(&decode_movements(&text).unwrap()), text);
    }

    #[test]
    fn runs_of_256_split_into_two_tokens() {
        let byte = Movement { direction: Direction::Down, fire: false, suicide: false }.pack();
        let movements = vec![byte; 256];
        let text = encode_movements(&movements);
        assert_eq!(text, format!("{byte:02x}ff{byte:02x}01"));
        assert_eq!(decode_movements(&text).unwrap(), movements);
    }

    #[test]
    fn movement_decoding_rejects_invalid_bytes_and_shapes() {
        assert!(decode_movements("0a").is_err());
        assert!(decode_movements("4001").is_err());
        assert!(decode_movements("0100zz").is_err());
        assert!(decode_movements("0000").is_err()); // zero-length run
    }
}
