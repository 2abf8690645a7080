//! Generic access to the authored cave parameters.
//!
//! Each parameter is described by a static descriptor: identifier, type tag,
//! flags, and plain function values for reading and writing. The external
//! text layer and the editor bind to caves through this table only; neither
//! needs to know the parameter record's shape.

use crate::cave::base::{LEVEL_COUNT, PPM_MAX};
use crate::cave::stored::CaveStored;
use crate::types::Element;

/// Save this parameter even when it equals the default value.
pub const PROP_ALWAYS_SAVE: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropKind {
    Bool,
    Int,
    String,
    Element,
    /// Four elements, one per random-fill slot.
    Elements4,
    /// Four bytes, the ascending random-fill thresholds.
    Bytes4,
    /// One signed value per difficulty level.
    IntLevels,
    /// One unsigned value per difficulty level.
    UIntLevels,
    /// Parts-per-million fraction.
    Probability,
    /// Parts-per-million fraction per difficulty level.
    ProbabilityLevels,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Int(i32),
    String(String),
    Element(Element),
    Elements4([Element; 4]),
    Bytes4([u8; 4]),
    IntLevels([i32; LEVEL_COUNT]),
    UIntLevels([u32; LEVEL_COUNT]),
    Probability(u32),
    ProbabilityLevels([u32; LEVEL_COUNT]),
}

impl PropValue {
    pub fn kind(&self) -> PropKind {
        match self {
            PropValue::Bool(_) => PropKind::Bool,
            PropValue::Int(_) => PropKind::Int,
            PropValue::String(_) => PropKind::String,
            PropValue::Element(_) => PropKind::Element,
            PropValue::Elements4(_) => PropKind::Elements4,
            PropValue::Bytes4(_) => PropKind::Bytes4,
            PropValue::IntLevels(_) => PropKind::IntLevels,
            PropValue::UIntLevels(_) => PropKind::UIntLevels,
            PropValue::Probability(_) => PropKind::Probability,
            PropValue::ProbabilityLevels(_) => PropKind::ProbabilityLevels,
        }
    }
}

/// One cave parameter as seen by generic consumers.
pub struct PropDescriptor {
    pub identifier: &'static str,
    pub kind: PropKind,
    pub flags: u32,
    pub get: fn(&CaveStored) -> PropValue,
    /// Returns false when the value has the wrong kind or fails validation;
    /// the cave is left unchanged then.
    pub set: fn(&mut CaveStored, &PropValue) -> bool,
}

pub fn cave_properties() -> &'static [PropDescriptor] {
    &CAVE_PROPERTIES
}

pub fn find_property(identifier: &str) -> Option<&'static PropDescriptor> {
    CAVE_PROPERTIES.iter().find(|p| p.identifier == identifier)
}

static CAVE_PROPERTIES: [PropDescriptor; 36] = [
    PropDescriptor {
        identifier: "Name",
        kind: PropKind::String,
        flags: PROP_ALWAYS_SAVE,
        get: |c| PropValue::String(c.base.name.clone()),
        set: |c, v| match v {
            PropValue::String(s) => {
                c.base.name = s.clone();
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "Width",
        kind: PropKind::Int,
        flags: PROP_ALWAYS_SAVE,
        get: |c| PropValue::Int(c.base.width as i32),
        set: |c, v| match v {
            PropValue::Int(i) if *i > 0 => {
                c.base.width = *i as usize;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "Height",
        kind: PropKind::Int,
        flags: PROP_ALWAYS_SAVE,
        get: |c| PropValue::Int(c.base.height as i32),
        set: |c, v| match v {
            PropValue::Int(i) if *i > 0 => {
                c.base.height = *i as usize;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "VisibleX1",
        kind: PropKind::Int,
        flags: 0,
        get: |c| PropValue::Int(c.base.visible_x1),
        set: |c, v| match v {
            PropValue::Int(i) => {
                c.base.visible_x1 = *i;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "VisibleY1",
        kind: PropKind::Int,
        flags: 0,
        get: |c| PropValue::Int(c.base.visible_y1),
        set: |c, v| match v {
            PropValue::Int(i) => {
                c.base.visible_y1 = *i;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "VisibleX2",
        kind: PropKind::Int,
        flags: 0,
        get: |c| PropValue::Int(c.base.visible_x2),
        set: |c, v| match v {
            PropValue::Int(i) => {
                c.base.visible_x2 = *i;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "VisibleY2",
        kind: PropKind::Int,
        flags: 0,
        get: |c| PropValue::Int(c.base.visible_y2),
        set: |c, v| match v {
            PropValue::Int(i) => {
                c.base.visible_y2 = *i;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "Intermission",
        kind: PropKind::Bool,
        flags: 0,
        get: |c| PropValue::Bool(c.base.intermission),
        set: |c, v| match v {
            PropValue::Bool(b) => {
                c.base.intermission = *b;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "Lineshift",
        kind: PropKind::Bool,
        flags: 0,
        get: |c| PropValue::Bool(c.base.lineshift),
        set: |c, v| match v {
            PropValue::Bool(b) => {
                c.base.lineshift = *b;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "WraparoundObjects",
        kind: PropKind::Bool,
        flags: 0,
        get: |c| PropValue::Bool(c.base.wraparound_objects),
        set: |c, v| match v {
            PropValue::Bool(b) => {
                c.base.wraparound_objects = *b;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "InitialBorder",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.initial_border),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.initial_border = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "InitialFill",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.initial_fill),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.initial_fill = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "RandomFill",
        kind: PropKind::Elements4,
        flags: 0,
        get: |c| PropValue::Elements4(c.base.random_fill),
        set: |c, v| match v {
            PropValue::Elements4(e) => {
                c.base.random_fill = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "RandomFillProbability",
        kind: PropKind::Bytes4,
        flags: 0,
        get: |c| PropValue::Bytes4(c.base.random_fill_probability),
        set: |c, v| match v {
            PropValue::Bytes4(b) => {
                c.base.random_fill_probability = *b;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "RandSeed",
        kind: PropKind::IntLevels,
        flags: 0,
        get: |c| PropValue::IntLevels(c.base.level_random_seed),
        set: |c, v| match v {
            PropValue::IntLevels(l) => {
                c.base.level_random_seed = *l;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "CaveTime",
        kind: PropKind::UIntLevels,
        flags: 0,
        get: |c| PropValue::UIntLevels(c.base.level_time),
        set: |c, v| match v {
            PropValue::UIntLevels(l) => {
                c.base.level_time = *l;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "DiamondsRequired",
        kind: PropKind::UIntLevels,
        flags: 0,
        get: |c| PropValue::UIntLevels(c.base.level_diamonds_needed),
        set: |c, v| match v {
            PropValue::UIntLevels(l) => {
                c.base.level_diamonds_needed = *l;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "MagicWallTime",
        kind: PropKind::UIntLevels,
        flags: 0,
        get: |c| PropValue::UIntLevels(c.base.level_magic_wall_time),
        set: |c, v| match v {
            PropValue::UIntLevels(l) => {
                c.base.level_magic_wall_time = *l;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "AmoebaTime",
        kind: PropKind::UIntLevels,
        flags: 0,
        get: |c| PropValue::UIntLevels(c.base.level_amoeba_time),
        set: |c, v| match v {
            PropValue::UIntLevels(l) => {
                c.base.level_amoeba_time = *l;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "AmoebaThreshold",
        kind: PropKind::UIntLevels,
        flags: 0,
        get: |c| PropValue::UIntLevels(c.base.level_amoeba_threshold),
        set: |c, v| match v {
            PropValue::UIntLevels(l) => {
                c.base.level_amoeba_threshold = *l;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "SlimePermeability",
        kind: PropKind::ProbabilityLevels,
        flags: 0,
        get: |c| PropValue::ProbabilityLevels(c.base.level_slime_permeability),
        set: |c, v| match v {
            PropValue::ProbabilityLevels(l) if l.iter().all(|&p| p <= PPM_MAX) => {
                c.base.level_slime_permeability = *l;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "AmoebaGrowthProb",
        kind: PropKind::Probability,
        flags: 0,
        get: |c| PropValue::Probability(c.base.amoeba_growth_prob),
        set: |c, v| match v {
            PropValue::Probability(p) if *p <= PPM_MAX => {
                c.base.amoeba_growth_prob = *p;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "AmoebaFastGrowthProb",
        kind: PropKind::Probability,
        flags: 0,
        get: |c| PropValue::Probability(c.base.amoeba_fast_growth_prob),
        set: |c, v| match v {
            PropValue::Probability(p) if *p <= PPM_MAX => {
                c.base.amoeba_fast_growth_prob = *p;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "DiamondValue",
        kind: PropKind::Int,
        flags: 0,
        get: |c| PropValue::Int(c.base.diamond_value as i32),
        set: |c, v| match v {
            PropValue::Int(i) if (0..=i32::from(u16::MAX)).contains(i) => {
                c.base.diamond_value = *i as u16;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "ExtraDiamondValue",
        kind: PropKind::Int,
        flags: 0,
        get: |c| PropValue::Int(c.base.extra_diamond_value as i32),
        set: |c, v| match v {
            PropValue::Int(i) if (0..=i32::from(u16::MAX)).contains(i) => {
                c.base.extra_diamond_value = *i as u16;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "FrameTime",
        kind: PropKind::Int,
        flags: 0,
        get: |c| PropValue::Int(c.base.frame_time_ms as i32),
        set: |c, v| match v {
            PropValue::Int(i) if *i > 0 => {
                c.base.frame_time_ms = *i as u32;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "MagicWallDiamondTo",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.magic_diamond_to),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.magic_diamond_to = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "MagicWallStoneTo",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.magic_stone_to),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.magic_stone_to = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "AmoebaTooBigEffect",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.amoeba_too_big_effect),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.amoeba_too_big_effect = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "AmoebaEnclosedEffect",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.amoeba_enclosed_effect),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.amoeba_enclosed_effect = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "SlimeEats1",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.slime_eats_1),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.slime_eats_1 = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "SlimeConverts1",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.slime_converts_1),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.slime_converts_1 = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "SlimeEats2",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.slime_eats_2),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.slime_eats_2 = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "SlimeConverts2",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.slime_converts_2),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.slime_converts_2 = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "ExpandingWallLooksLike",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.expanding_wall_looks_like),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.expanding_wall_looks_like = *e;
                true
            }
            _ => false,
        },
    },
    PropDescriptor {
        identifier: "DirtLooksLike",
        kind: PropKind::Element,
        flags: 0,
        get: |c| PropValue::Element(c.base.dirt_looks_like),
        set: |c, v| match v {
            PropValue::Element(e) => {
                c.base.dirt_looks_like = *e;
                true
            }
            _ => false,
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn identifiers_are_unique() {
        let identifiers: BTreeSet<&str> =
            cave_properties().iter().map(|p| p.identifier).collect();
        assert_eq!(identifiers.len(), cave_properties().len());
    }

    #[test]
    fn every_descriptor_round_trips_its_own_value() {
        let source = CaveStored::new("source");
        let mut target = CaveStored::new("target");
        for descriptor in cave_properties() {
            let value = (descriptor.get)(&source);
            assert_eq!(value.kind(), descriptor.kind, "{}", descriptor.identifier);
            assert!((descriptor.set)(&mut target, &value), "{}", descriptor.identifier);
            assert_eq!((descriptor.get)(&target), value, "{}", descriptor.identifier);
        }
    }

    #[test]
    fn setters_reject_mismatched_kinds_without_modifying_the_cave() {
        let mut cave = CaveStored::new("probe");
        let before = cave.base.clone();
        let descriptor = find_property("Width").unwrap();
        assert!(!(descriptor.set)(&mut cave, &PropValue::Bool(true)));
        assert_eq!(cave.base, before);
    }

    #[test]
    fn probability_setters_reject_values_above_one_million() {
        let mut cave = CaveStored::new("probe");
        let descriptor = find_property("AmoebaGrowthProb").unwrap();
        assert!(!(descriptor.set)(&mut cave, &PropValue::Probability(PPM_MAX + 1)));
        assert!((descriptor.set)(&mut cave, &PropValue::Probability(PPM_MAX)));
    }
}
