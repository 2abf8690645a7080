//! Maze carving: randomized spanning tree over a coarsened grid, plus the
//! braid (dead ends removed) and unicursal (single closed loop) variants.

use serde::{Deserialize, Serialize};

use crate::cave::base::LEVEL_COUNT;
use crate::cave::rendered::CaveRendered;
use crate::rng::RandomGenerator;
use crate::types::{Coord, Element};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeFlavor {
    Perfect,
    Braid,
    Unicursal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeObject {
    pub start: Coord,
    pub end: Coord,
    pub wall_width: i32,
    pub path_width: i32,
    pub wall: Element,
    /// `Element::None` leaves the carved path cells untouched.
    pub path: Element,
    /// Percent chance to keep carving horizontally when a horizontal
    /// neighbor is available; biases the maze toward long horizontal runs.
    pub horiz_percent: i32,
    /// Per-level seeds; a negative entry derives the seed from the
    /// materialization seed and the object's list position.
    pub seeds: [i32; LEVEL_COUNT],
    pub flavor: MazeFlavor,
}

impl Default for MazeObject {
    fn default() -> Self {
        Self {
            start: Coord::new(0, 0),
            end: Coord::new(9, 9),
            wall_width: 1,
            path_width: 1,
            wall: Element::BrickWall,
            path: Element::Space,
            horiz_percent: 0,
            seeds: [-1; LEVEL_COUNT],
            flavor: MazeFlavor::Perfect,
        }
    }
}

/// Coarse maze cells with wall-open flags toward the right and downward
/// neighbors. The carve produces a spanning tree; braid and unicursal
/// post-process it.
struct MazeGrid {
    width: usize,
    height: usize,
    open_right: Vec<bool>,
    open_down: Vec<bool>,
}

impl MazeGrid {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            open_right: vec![false; width * height],
            open_down: vec![false; width * height],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn open_right(&self, x: usize, y: usize) -> bool {
        x + 1 < self.width && self.open_right[self.index(x, y)]
    }

    fn open_down(&self, x: usize, y: usize) -> bool {
        y + 1 < self.height && self.open_down[self.index(x, y)]
    }

    fn open_left(&self, x: usize, y: usize) -> bool {
        x > 0 && self.open_right(x - 1, y)
    }

    fn open_up(&self, x: usize, y: usize) -> bool {
        y > 0 && self.open_down(x, y - 1)
    }

    fn degree(&self, x: usize, y: usize) -> usize {
        usize::from(self.open_right(x, y))
            + usize::from(self.open_down(x, y))
            + usize::from(self.open_left(x, y))
            + usize::from(self.open_up(x, y))
    }

    /// Open the wall between `(x, y)` and its neighbor in `direction`
    /// (0 up, 1 right, 2 down, 3 left).
    fn open_toward(&mut self, x: usize, y: usize, direction: usize) {
        match direction {
            0 => {
                let index = self.index(x, y - 1);
                self.open_down[index] = true;
            }
            1 => {
                let index = self.index(x, y);
                self.open_right[index] = true;
            }
            2 => {
                let index = self.index(x, y);
                self.open_down[index] = true;
            }
            3 => {
                let index = self.index(x - 1, y);
                self.open_right[index] = true;
            }
            _ => unreachable!("direction is 0..4"),
        }
    }

    fn neighbor(&self, x: usize, y: usize, direction: usize) -> Option<(usize, usize)> {
        match direction {
            0 if y > 0 => Some((x, y - 1)),
            1 if x + 1 < self.width => Some((x + 1, y)),
            2 if y + 1 < self.height => Some((x, y + 1)),
            3 if x > 0 => Some((x - 1, y)),
            _ => None,
        }
    }
}

/// Randomized depth-first spanning-tree carve. The horizontal bias picks
/// among horizontal candidates with `horiz_percent` probability whenever one
/// exists.
fn carve_perfect(
    width: usize,
    height: usize,
    rng: &mut RandomGenerator,
    horiz_percent: i32,
) -> MazeGrid {
    let mut grid = MazeGrid::new(width, height);
    let mut visited = vec![false; width * height];
    let mut stack = vec![(0_usize, 0_usize)];
    visited[0] = true;

    while let Some(&(x, y)) = stack.last() {
        let mut candidates = [0_usize; 4];
        let mut candidate_count = 0;
        let mut horizontal = [0_usize; 2];
        let mut horizontal_count = 0;
        for direction in 0..4 {
            if let Some((nx, ny)) = grid.neighbor(x, y, direction) {
                if !visited[grid.index(nx, ny)] {
                    candidates[candidate_count] = direction;
                    candidate_count += 1;
                    if direction == 1 || direction == 3 {
                        horizontal[horizontal_count] = direction;
                        horizontal_count += 1;
                    }
                }
            }
        }

        if candidate_count == 0 {
            stack.pop();
            continue;
        }

        let direction = if horizontal_count > 0 && rng.rand_int_range(0, 100) < horiz_percent {
            horizontal[rng.rand_int_range(0, horizontal_count as i32) as usize]
        } else {
            candidates[rng.rand_int_range(0, candidate_count as i32) as usize]
        };

        grid.open_toward(x, y, direction);
        let (nx, ny) = grid.neighbor(x, y, direction).expect("candidate neighbor exists");
        visited[grid.index(nx, ny)] = true;
        stack.push((nx, ny));
    }

    grid
}

/// Remove dead ends by opening one extra wall from every degree-one cell.
fn braid(grid: &mut MazeGrid, rng: &mut RandomGenerator) {
    for y in 0..grid.height {
        for x in 0..grid.width {
            if grid.degree(x, y) != 1 {
                continue;
            }
            let mut closed = [0_usize; 4];
            let mut closed_count = 0;
            for direction in 0..4 {
                if grid.neighbor(x, y, direction).is_none() {
                    continue;
                }
                let already_open = match direction {
                    0 => grid.open_up(x, y),
                    1 => grid.open_right(x, y),
                    2 => grid.open_down(x, y),
                    _ => grid.open_left(x, y),
                };
                if !already_open {
                    closed[closed_count] = direction;
                    closed_count += 1;
                }
            }
            if closed_count > 0 {
                let direction = closed[rng.rand_int_range(0, closed_count as i32) as usize];
                grid.open_toward(x, y, direction);
            }
        }
    }
}

/// Double a perfect maze into a maze whose passages form one closed loop:
/// every coarse cell becomes a 2×2 ring of sub-cells, rings connect across
/// every spanning-tree edge, and the ring side crossed by a tree edge is
/// blocked. Every sub-cell ends up with exactly two open walls.
fn double_unicursal(small: &MazeGrid) -> MazeGrid {
    let mut big = MazeGrid::new(small.width * 2, small.height * 2);
    for y in 0..small.height {
        for x in 0..small.width {
            let bx = x * 2;
            let by = y * 2;
            if !small.open_up(x, y) {
                let index = big.index(bx, by);
                big.open_right[index] = true;
            }
            if !small.open_down(x, y) {
                let index = big.index(bx, by + 1);
                big.open_right[index] = true;
            }
            if !small.open_left(x, y) {
                let index = big.index(bx, by);
                big.open_down[index] = true;
            }
            if !small.open_right(x, y) {
                let index = big.index(bx + 1, by);
                big.open_down[index] = true;
            }
            if small.open_right(x, y) {
                let index = big.index(bx + 1, by);
                big.open_right[index] = true;
                let index = big.index(bx + 1, by + 1);
                big.open_right[index] = true;
            }
            if small.open_down(x, y) {
                let index = big.index(bx, by + 1);
                big.open_down[index] = true;
                let index = big.index(bx + 1, by + 1);
                big.open_down[index] = true;
            }
        }
    }
    big
}

impl MazeObject {
    pub fn draw(&self, cave: &mut CaveRendered, order: usize) {
        let x1 = self.start.x.min(self.end.x);
        let x2 = self.start.x.max(self.end.x);
        let y1 = self.start.y.min(self.end.y);
        let y2 = self.start.y.max(self.end.y);

        // The whole area starts as wall; any leftover beyond an integer
        // multiple of the wall/path pitch stays wall.
        for y in y1..=y2 {
            for x in x1..=x2 {
                cave.store(x, y, self.wall, order);
            }
        }

        let wall_width = self.wall_width.max(0);
        let path_width = self.path_width.max(1);
        let pitch = wall_width + path_width;
        let cells_w = (x2 - x1 + 1 - wall_width) / pitch;
        let cells_h = (y2 - y1 + 1 - wall_width) / pitch;
        if cells_w < 1 || cells_h < 1 {
            return;
        }

        let seed = self.seeds[cave.level()];
        let seed = if seed < 0 { cave.derived_object_seed(order) } else { seed as u32 };
        let mut rng = RandomGenerator::new(seed);

        let grid = match self.flavor {
            MazeFlavor::Perfect => {
                carve_perfect(cells_w as usize, cells_h as usize, &mut rng, self.horiz_percent)
            }
            MazeFlavor::Braid => {
                let mut grid = carve_perfect(
                    cells_w as usize,
                    cells_h as usize,
                    &mut rng,
                    self.horiz_percent,
                );
                braid(&mut grid, &mut rng);
                grid
            }
            MazeFlavor::Unicursal => {
                let small_w = cells_w / 2;
                let small_h = cells_h / 2;
                if small_w < 1 || small_h < 1 {
                    return;
                }
                let small = carve_perfect(
                    small_w as usize,
                    small_h as usize,
                    &mut rng,
                    self.horiz_percent,
                );
                double_unicursal(&small)
            }
        };

        self.render(cave, order, x1, y1, wall_width, path_width, &grid);
    }

    fn render(
        &self,
        cave: &mut CaveRendered,
        order: usize,
        x1: i32,
        y1: i32,
        wall_width: i32,
        path_width: i32,
        grid: &MazeGrid,
    ) {
        let pitch = wall_width + path_width;
        for cy in 0..grid.height {
            for cx in 0..grid.width {
                let base_x = x1 + wall_width + cx as i32 * pitch;
                let base_y = y1 + wall_width + cy as i32 * pitch;
                for dy in 0..path_width {
                    for dx in 0..path_width {
                        cave.store(base_x + dx, base_y + dy, self.path, order);
                    }
                }
                if grid.open_right(cx, cy) {
                    for dy in 0..path_width {
                        for dx in 0..wall_width {
                            cave.store(base_x + path_width + dx, base_y + dy, self.path, order);
                        }
                    }
                }
                if grid.open_down(cx, cy) {
                    for dy in 0..wall_width {
                        for dx in 0..path_width {
                            cave.store(base_x + dx, base_y + path_width + dy, self.path, order);
                        }
                    }
                }
            }
        }
    }
}
