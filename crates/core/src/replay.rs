//! Recorded player input and its verification against a cave.
//!
//! A replay is only meaningful relative to one exact materialization: the
//! stored checksum is compared against the checksum of a fresh render at the
//! replay's level and seed.

use serde::{Deserialize, Serialize};

use crate::cave::rendered::CaveRendered;
use crate::cave::stored::CaveStored;
use crate::types::Direction;

const DIRECTION_MASK: u8 = 0x0F;
const FIRE_FLAG: u8 = 0x10;
const SUICIDE_FLAG: u8 = 0x20;

/// One frame of player input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub direction: Direction,
    pub fire: bool,
    pub suicide: bool,
}

impl Movement {
    pub fn pack(self) -> u8 {
        let mut byte = self.direction.to_nibble();
        if self.fire {
            byte |= FIRE_FLAG;
        }
        if self.suicide {
            byte |= SUICIDE_FLAG;
        }
        byte
    }

    /// `None` for a byte whose direction nibble is not a valid direction or
    /// which carries unknown flag bits.
    pub fn unpack(byte: u8) -> Option<Self> {
        if byte & !(DIRECTION_MASK | FIRE_FLAG | SUICIDE_FLAG) != 0 {
            return None;
        }
        let direction = Direction::from_nibble(byte & DIRECTION_MASK)?;
        Some(Self {
            direction,
            fire: byte & FIRE_FLAG != 0,
            suicide: byte & SUICIDE_FLAG != 0,
        })
    }
}

/// A recorded input sequence, one packed byte per frame, plus the checksum
/// of the materialization it was recorded against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaveReplay {
    pub level: usize,
    pub seed: u32,
    pub player_name: String,
    pub recorded_with: String,
    pub success: bool,
    /// 0 means not yet computed.
    pub checksum: u32,
    /// Derived, recomputable; never authoritative on its own.
    pub wrong_checksum: bool,
    movements: Vec<u8>,
    #[serde(skip)]
    current: usize,
}

impl CaveReplay {
    pub fn new(level: usize, seed: u32) -> Self {
        Self {
            level,
            seed,
            player_name: String::new(),
            recorded_with: String::new(),
            success: false,
            checksum: 0,
            wrong_checksum: false,
            movements: Vec::new(),
            current: 0,
        }
    }

    pub fn store_movement(&mut self, movement: Movement) {
        self.movements.push(movement.pack());
    }

    /// Advance the playback cursor; `None` once the recording is exhausted.
    pub fn get_next_movement(&mut self) -> Option<Movement> {
        let byte = *self.movements.get(self.current)?;
        self.current += 1;
        Movement::unpack(byte)
    }

    pub fn rewind(&mut self) {
        self.current = 0;
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    pub fn movements(&self) -> &[u8] {
        &self.movements
    }

    pub fn set_movements(&mut self, movements: Vec<u8>) {
        self.movements = movements;
        self.current = 0;
    }
}

/// Verify every replay of a cave against a fresh materialization.
///
/// A replay without a checksum adopts the computed one. A matching replay is
/// left alone. A mismatching replay is flagged; `repair` overwrites its
/// checksum with the computed value instead, `remove` drops it. Returns how
/// many replays mismatched.
pub fn check_replays(stored: &mut CaveStored, remove: bool, repair: bool) -> usize {
    let mut replays = std::mem::take(&mut stored.replays);
    let mut wrong = 0;

    replays.retain_mut(|replay| {
        let computed = CaveRendered::new(stored, replay.level, replay.seed).checksum();
        if replay.checksum == 0 {
            replay.checksum = computed;
            replay.wrong_checksum = false;
            return true;
        }
        if replay.checksum == computed {
            replay.wrong_checksum = false;
            return true;
        }
        wrong += 1;
        if repair {
            replay.checksum = computed;
            replay.wrong_checksum = false;
            return true;
        }
        replay.wrong_checksum = true;
        !remove
    });

    stored.replays = replays;
    wrong
}
