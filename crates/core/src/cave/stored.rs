//! The authored cave: object list, optional pre-baked map, highscores,
//! replays.

use serde::{Deserialize, Serialize};

use crate::cave::base::CaveBase;
use crate::cave::object::CaveObject;
use crate::map::CaveMap;
use crate::replay::CaveReplay;
use crate::types::Element;

/// Maximum number of entries a highscore table keeps.
pub const HIGHSCORE_CAPACITY: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highscore {
    pub name: String,
    pub score: u32,
}

/// Sorted, capped highscore list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreTable {
    entries: Vec<Highscore>,
}

impl HighscoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Highscore] {
        &self.entries
    }

    pub fn is_highscore(&self, score: u32) -> bool {
        score > 0
            && (self.entries.len() < HIGHSCORE_CAPACITY
                || score > self.entries.last().map(|e| e.score).unwrap_or(0))
    }

    /// Insert keeping descending score order; ties keep the earlier entry
    /// first. Returns false when the score does not make the table.
    pub fn add(&mut self, name: &str, score: u32) -> bool {
        if !self.is_highscore(score) {
            return false;
        }
        let position =
            self.entries.iter().position(|e| e.score < score).unwrap_or(self.entries.len());
        self.entries.insert(position, Highscore { name: name.to_string(), score });
        self.entries.truncate(HIGHSCORE_CAPACITY);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The authored, multi-level cave definition.
///
/// The object list is ordered and the order is semantic: later objects draw
/// over earlier ones. A pre-baked map, when present, is used verbatim during
/// materialization instead of the random fill.
#[derive(Clone, Debug)]
pub struct CaveStored {
    pub base: CaveBase,
    pub objects: Vec<CaveObject>,
    pub map: Option<CaveMap<Element>>,
    pub highscores: HighscoreTable,
    pub replays: Vec<CaveReplay>,
}

impl CaveStored {
    pub fn new(name: &str) -> Self {
        let mut base = CaveBase::default();
        base.name = name.to_string();
        Self {
            base,
            objects: Vec::new(),
            map: None,
            highscores: HighscoreTable::new(),
            replays: Vec::new(),
        }
    }

    pub fn has_map(&self) -> bool {
        self.map.is_some()
    }

    pub fn add_object(&mut self, object: CaveObject) {
        self.objects.push(object);
    }
}

impl Default for CaveStored {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highscores_stay_sorted_and_capped() {
        let mut table = HighscoreTable::new();
        for score in [50_u32, 10, 90, 30, 70] {
            assert!(table.add("p", score));
        }
        let scores: Vec<u32> = table.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![90, 70, 50, 30, 10]);

        for score in 100..200 {
            table.add("q", score);
        }
        assert_eq!(table.entries().len(), HIGHSCORE_CAPACITY);
        assert_eq!(table.entries()[0].score, 199);
    }

    #[test]
    fn zero_scores_never_enter_the_table() {
        let mut table = HighscoreTable::new();
        assert!(!table.add("p", 0));
        assert!(table.entries().is_empty());
    }

    #[test]
    fn low_score_is_rejected_once_the_table_is_full() {
        let mut table = HighscoreTable::new();
        for score in 100..100 + HIGHSCORE_CAPACITY as u32 {
            table.add("p", score);
        }
        assert!(!table.add("q", 5));
        assert!(table.add("q", 150));
    }
}
