//! Procedural drawing primitives stored in an authored cave.
//!
//! Objects live in an ordered list; order is semantic, later objects draw
//! over earlier ones and the provenance map records the last writer.

pub mod fill;
pub mod maze;

use serde::{Deserialize, Serialize};

use crate::cave::base::LEVEL_COUNT;
use crate::cave::rendered::CaveRendered;
use crate::types::{Coord, Element};

pub use fill::RandomFillObject;
pub use maze::{MazeFlavor, MazeObject};

/// Which of the five difficulty levels an object is drawn on.
///
/// An object must stay visible on at least one level; the mutating operations
/// auto-correct rather than leave the mask empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMask([bool; LEVEL_COUNT]);

impl LevelMask {
    pub fn all() -> Self {
        Self([true; LEVEL_COUNT])
    }

    pub fn only(level: usize) -> Self {
        let mut mask = [false; LEVEL_COUNT];
        mask[level] = true;
        Self(mask)
    }

    pub fn is_seen_on(&self, level: usize) -> bool {
        self.0[level]
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|&seen| seen)
    }

    pub fn enable_on_level(&mut self, level: usize) {
        self.0[level] = true;
    }

    /// Disable on one level; if that would hide the object everywhere, the
    /// edited level is re-enabled instead.
    pub fn disable_on_level(&mut self, level: usize) {
        self.0[level] = false;
        if !self.any() {
            self.0[level] = true;
        }
    }

    pub fn enable_only_on_level(&mut self, level: usize) {
        *self = Self::only(level);
    }

    /// 1-based level numbers, for the text format.
    pub fn level_numbers(&self) -> Vec<usize> {
        (0..LEVEL_COUNT).filter(|&l| self.0[l]).map(|l| l + 1).collect()
    }
}

impl Default for LevelMask {
    fn default() -> Self {
        Self::all()
    }
}

/// The closed set of drawing primitives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Point { start: Coord, element: Element },
    Line { start: Coord, end: Coord, element: Element },
    Rectangle { start: Coord, end: Coord, element: Element },
    FilledRectangle { start: Coord, end: Coord, border: Element, fill: Element },
    Raster { start: Coord, end: Coord, step: Coord, element: Element },
    /// Scans the whole materialized grid for `search` and puts `put` at a
    /// fixed offset from every match. The scan direction is the explicit
    /// `backwards` flag, never inferred from the offset sign; the forward
    /// top-to-bottom scan cascades on downward offsets, which is the
    /// compatibility behavior.
    Join { search: Element, put: Element, offset: Coord, backwards: bool },
    /// Flood-fills the contiguous region whose element is sampled at `start`
    /// at draw time.
    FloodFillReplace { start: Coord, element: Element },
    /// Flood-fills outward from `start`, stopping at `border` cells.
    FloodFillBorder { start: Coord, border: Element, fill: Element },
    Maze(MazeObject),
    RandomFill(RandomFillObject),
    /// Naive row-major copy; overlapping source and destination produce
    /// whatever the left-to-right top-to-bottom order produces.
    CopyPaste { src_start: Coord, src_end: Coord, dest: Coord, mirror: bool, flip: bool },
}

/// One authored drawing primitive plus its level visibility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaveObject {
    pub levels: LevelMask,
    pub kind: ObjectKind,
}

impl CaveObject {
    pub fn new(kind: ObjectKind) -> Self {
        Self { levels: LevelMask::all(), kind }
    }

    pub fn on_levels(levels: LevelMask, kind: ObjectKind) -> Self {
        Self { levels, kind }
    }

    /// Identifier of the primitive in the text format.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ObjectKind::Point { .. } => "Point",
            ObjectKind::Line { .. } => "Line",
            ObjectKind::Rectangle { .. } => "Rectangle",
            ObjectKind::FilledRectangle { .. } => "FillRect",
            ObjectKind::Raster { .. } => "Raster",
            ObjectKind::Join { .. } => "Join",
            ObjectKind::FloodFillReplace { .. } => "ReplaceFill",
            ObjectKind::FloodFillBorder { .. } => "BoundaryFill",
            ObjectKind::Maze(maze) => match maze.flavor {
                MazeFlavor::Perfect => "Maze",
                MazeFlavor::Braid => "BraidMaze",
                MazeFlavor::Unicursal => "UnicursalMaze",
            },
            ObjectKind::RandomFill(_) => "RandomFill",
            ObjectKind::CopyPaste { .. } => "CopyPaste",
        }
    }

    /// The element the editor shows for this object. No computational role.
    pub fn characteristic_element(&self) -> Element {
        match &self.kind {
            ObjectKind::Point { element, .. }
            | ObjectKind::Line { element, .. }
            | ObjectKind::Rectangle { element, .. }
            | ObjectKind::Raster { element, .. }
            | ObjectKind::FloodFillReplace { element, .. } => *element,
            ObjectKind::FilledRectangle { fill, .. }
            | ObjectKind::FloodFillBorder { fill, .. } => *fill,
            ObjectKind::Join { put, .. } => *put,
            ObjectKind::Maze(maze) => maze.path,
            ObjectKind::RandomFill(random_fill) => random_fill.initial,
            ObjectKind::CopyPaste { .. } => Element::None,
        }
    }

    /// Paint this object onto a materialized cave. `order_index` is the
    /// object's position in the stored list, recorded as provenance for
    /// every cell written.
    pub fn draw(&self, cave: &mut CaveRendered, order_index: usize) {
        match &self.kind {
            ObjectKind::Point { start, element } => {
                cave.store(start.x, start.y, *element, order_index);
            }
            ObjectKind::Line { start, end, element } => {
                draw_line(cave, *start, *end, *element, order_index);
            }
            ObjectKind::Rectangle { start, end, element } => {
                draw_rectangle(cave, *start, *end, *element, None, order_index);
            }
            ObjectKind::FilledRectangle { start, end, border, fill } => {
                draw_rectangle(cave, *start, *end, *border, Some(*fill), order_index);
            }
            ObjectKind::Raster { start, end, step, element } => {
                draw_raster(cave, *start, *end, *step, *element, order_index);
            }
            ObjectKind::Join { search, put, offset, backwards } => {
                draw_join(cave, *search, *put, *offset, *backwards, order_index);
            }
            ObjectKind::FloodFillReplace { start, element } => {
                fill::draw_replace_fill(cave, *start, *element, order_index);
            }
            ObjectKind::FloodFillBorder { start, border, fill } => {
                fill::draw_boundary_fill(cave, *start, *border, *fill, order_index);
            }
            ObjectKind::Maze(maze) => maze.draw(cave, order_index),
            ObjectKind::RandomFill(random_fill) => random_fill.draw(cave, order_index),
            ObjectKind::CopyPaste { src_start, src_end, dest, mirror, flip } => {
                draw_copy_paste(cave, *src_start, *src_end, *dest, *mirror, *flip, order_index);
            }
        }
    }
}

fn draw_line(cave: &mut CaveRendered, start: Coord, end: Coord, element: Element, order: usize) {
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let step_x = if start.x < end.x { 1 } else { -1 };
    let step_y = if start.y < end.y { 1 } else { -1 };
    let mut error = dx + dy;
    let mut x = start.x;
    let mut y = start.y;
    loop {
        cave.store(x, y, element, order);
        if x == end.x && y == end.y {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x += step_x;
        }
        if doubled <= dx {
            error += dx;
            y += step_y;
        }
    }
}

fn draw_rectangle(
    cave: &mut CaveRendered,
    start: Coord,
    end: Coord,
    border: Element,
    fill: Option<Element>,
    order: usize,
) {
    let x1 = start.x.min(end.x);
    let x2 = start.x.max(end.x);
    let y1 = start.y.min(end.y);
    let y2 = start.y.max(end.y);
    for y in y1..=y2 {
        for x in x1..=x2 {
            let on_border = x == x1 || x == x2 || y == y1 || y == y2;
            match (on_border, fill) {
                (true, _) => cave.store(x, y, border, order),
                (false, Some(fill_element)) => cave.store(x, y, fill_element, order),
                (false, None) => {}
            }
        }
    }
}

fn draw_raster(
    cave: &mut CaveRendered,
    start: Coord,
    end: Coord,
    step: Coord,
    element: Element,
    order: usize,
) {
    let step_x = step.x.max(1);
    let step_y = step.y.max(1);
    let x1 = start.x.min(end.x);
    let x2 = start.x.max(end.x);
    let y1 = start.y.min(end.y);
    let y2 = start.y.max(end.y);
    let mut y = y1;
    while y <= y2 {
        let mut x = x1;
        while x <= x2 {
            cave.store(x, y, element, order);
            x += step_x;
        }
        y += step_y;
    }
}

fn draw_join(
    cave: &mut CaveRendered,
    search: Element,
    put: Element,
    offset: Coord,
    backwards: bool,
    order: usize,
) {
    let width = cave.map.width() as i32;
    let height = cave.map.height() as i32;
    // The scan reads the live grid, so a put that lands ahead of the scan
    // position is seen again. Preserved intentionally.
    if backwards {
        for y in (0..height).rev() {
            for x in (0..width).rev() {
                if *cave.map.get(x, y) == search {
                    cave.store(x + offset.x, y + offset.y, put, order);
                }
            }
        }
    } else {
        for y in 0..height {
            for x in 0..width {
                if *cave.map.get(x, y) == search {
                    cave.store(x + offset.x, y + offset.y, put, order);
                }
            }
        }
    }
}

fn draw_copy_paste(
    cave: &mut CaveRendered,
    src_start: Coord,
    src_end: Coord,
    dest: Coord,
    mirror: bool,
    flip: bool,
    order: usize,
) {
    let x1 = src_start.x.min(src_end.x);
    let x2 = src_start.x.max(src_end.x);
    let y1 = src_start.y.min(src_end.y);
    let y2 = src_start.y.max(src_end.y);
    let width = x2 - x1 + 1;
    let height = y2 - y1 + 1;
    for y in 0..height {
        for x in 0..width {
            let src_x = x1 + if mirror { width - 1 - x } else { x };
            let src_y = y1 + if flip { height - 1 - y } else { y };
            // Source cells outside the cave are skipped, like clipped writes.
            let Some((sx, sy)) = cave.map.normalize(src_x, src_y) else {
                continue;
            };
            let element = *cave.map.get(sx as i32, sy as i32);
            cave.store(dest.x + x, dest.y + y, element, order);
        }
    }
}
