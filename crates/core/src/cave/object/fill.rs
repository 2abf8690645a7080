//! Flood fills and the rectangle-scoped random fill.

use serde::{Deserialize, Serialize};

use crate::cave::base::LEVEL_COUNT;
use crate::cave::rendered::CaveRendered;
use crate::rng::{C64RandomGenerator, RandomGenerator};
use crate::types::{Coord, Element};

/// Pick the element for one random byte: the first ascending threshold the
/// byte falls under wins, otherwise the initial fill.
pub(crate) fn select_random_fill_element(
    random_byte: u8,
    initial: Element,
    fill: &[Element; 4],
    probability: &[u8; 4],
) -> Element {
    for k in 0..4 {
        if random_byte < probability[k] {
            return fill[k];
        }
    }
    initial
}

/// Flood-fill the contiguous region holding whatever element is found at the
/// start coordinate when the draw runs. Re-running after the grid changed can
/// flood a different region.
pub(crate) fn draw_replace_fill(
    cave: &mut CaveRendered,
    start: Coord,
    element: Element,
    order: usize,
) {
    let Some((sx, sy)) = cave.map.normalize(start.x, start.y) else {
        return;
    };
    let search = *cave.map.get(sx as i32, sy as i32);
    // Painting the searched element (or nothing) would never terminate.
    if search == element || element == Element::None {
        return;
    }

    let width = cave.map.width() as i32;
    let height = cave.map.height() as i32;
    let mut pending = vec![(sx as i32, sy as i32)];
    while let Some((x, y)) = pending.pop() {
        if *cave.map.get(x, y) != search {
            continue;
        }
        cave.store(x, y, element, order);
        for (nx, ny) in [(x, y - 1), (x + 1, y), (x, y + 1), (x - 1, y)] {
            if nx >= 0 && ny >= 0 && nx < width && ny < height && *cave.map.get(nx, ny) == search {
                pending.push((nx, ny));
            }
        }
    }
}

/// Flood-fill outward from the start coordinate, stopping at cells holding
/// the designated border element.
pub(crate) fn draw_boundary_fill(
    cave: &mut CaveRendered,
    start: Coord,
    border: Element,
    fill: Element,
    order: usize,
) {
    let Some((sx, sy)) = cave.map.normalize(start.x, start.y) else {
        return;
    };
    if *cave.map.get(sx as i32, sy as i32) == border {
        return;
    }

    let width = cave.map.width();
    let height = cave.map.height();
    let mut visited = vec![false; width * height];
    let mut pending = vec![(sx as i32, sy as i32)];
    while let Some((x, y)) = pending.pop() {
        let index = y as usize * width + x as usize;
        if visited[index] {
            continue;
        }
        visited[index] = true;
        cave.store(x, y, fill, order);
        for (nx, ny) in [(x, y - 1), (x + 1, y), (x, y + 1), (x - 1, y)] {
            if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                continue;
            }
            if visited[ny as usize * width + nx as usize] {
                continue;
            }
            if *cave.map.get(nx, ny) != border {
                pending.push((nx, ny));
            }
        }
    }
}

/// The cave-level random fill scoped to a sub-rectangle, with its own seed,
/// an optional replace-only mask, and a choice of generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomFillObject {
    pub start: Coord,
    pub end: Coord,
    /// When set, only cells currently holding this element are overwritten.
    pub replace_only: Option<Element>,
    /// Per-level seeds; a negative entry derives the seed from the
    /// materialization seed and the object's list position.
    pub seeds: [i32; LEVEL_COUNT],
    pub initial: Element,
    pub fill: [Element; 4],
    pub probability: [u8; 4],
    /// Draw random bytes from the legacy generator instead of the modern one.
    pub c64_random: bool,
}

impl Default for RandomFillObject {
    fn default() -> Self {
        Self {
            start: Coord::new(0, 0),
            end: Coord::new(0, 0),
            replace_only: None,
            seeds: [-1; LEVEL_COUNT],
            initial: Element::Space,
            fill: [Element::Space; 4],
            probability: [0; 4],
            c64_random: false,
        }
    }
}

impl RandomFillObject {
    pub fn draw(&self, cave: &mut CaveRendered, order: usize) {
        let seed = self.seeds[cave.level()];
        let seed = if seed < 0 { cave.derived_object_seed(order) } else { seed as u32 };

        let mut c64_rng = C64RandomGenerator::new();
        let mut modern_rng = RandomGenerator::new(seed);
        if self.c64_random {
            c64_rng.set_seed(seed as u16);
        }

        let x1 = self.start.x.min(self.end.x);
        let x2 = self.start.x.max(self.end.x);
        let y1 = self.start.y.min(self.end.y);
        let y2 = self.start.y.max(self.end.y);
        for y in y1..=y2 {
            for x in x1..=x2 {
                let random_byte = if self.c64_random {
                    c64_rng.random()
                } else {
                    modern_rng.rand_int_range(0, 256) as u8
                };
                let element = select_random_fill_element(
                    random_byte,
                    self.initial,
                    &self.fill,
                    &self.probability,
                );
                if let Some(mask) = self.replace_only {
                    match cave.map.normalize(x, y) {
                        Some((nx, ny)) if *cave.map.get(nx as i32, ny as i32) == mask => {}
                        _ => continue,
                    }
                }
                cave.store(x, y, element, order);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_selection_takes_the_first_matching_band() {
        let fill = [Element::Stone, Element::Diamond, Element::Firefly, Element::Amoeba];
        let probability = [32, 64, 96, 128];
        assert_eq!(
            select_random_fill_element(10, Element::Dirt, &fill, &probability),
            Element::Stone
        );
        assert_eq!(
            select_random_fill_element(32, Element::Dirt, &fill, &probability),
            Element::Diamond
        );
        assert_eq!(
            select_random_fill_element(95, Element::Dirt, &fill, &probability),
            Element::Firefly
        );
        assert_eq!(
            select_random_fill_element(200, Element::Dirt, &fill, &probability),
            Element::Dirt
        );
    }

    #[test]
    fn zero_thresholds_always_fall_through_to_initial() {
        let fill = [Element::Stone; 4];
        let probability = [0; 4];
        for byte in [0_u8, 1, 128, 255] {
            assert_eq!(
                select_random_fill_element(byte, Element::Dirt, &fill, &probability),
                Element::Dirt
            );
        }
    }
}
