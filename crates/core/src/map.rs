//! Rectangular cell storage with a configurable border-wrap policy.

/// How coordinates outside the map rectangle are mapped back inside.
///
/// The policy is per-instance state: rendering switches it to match the
/// authored cave's `lineshift` flag before any object draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapPolicy {
    /// No wrapping; out-of-range coordinates stay out of range.
    #[default]
    None,
    /// Toroidal: x and y wrap independently.
    Perfect,
    /// Crossing a vertical edge shifts the row: wrapping off the right edge
    /// lands one row down, off the left edge one row up (mod height).
    /// Vertical edges do not wrap.
    LineShift,
}

impl WrapPolicy {
    /// Map `(x, y)` into the `width`×`height` rectangle, or `None` when the
    /// coordinate is still outside after applying the policy.
    pub fn normalize(self, width: usize, height: usize, x: i32, y: i32) -> Option<(usize, usize)> {
        let w = width as i32;
        let h = height as i32;
        match self {
            WrapPolicy::None => {
                if x >= 0 && y >= 0 && x < w && y < h {
                    Some((x as usize, y as usize))
                } else {
                    None
                }
            }
            WrapPolicy::Perfect => Some((x.rem_euclid(w) as usize, y.rem_euclid(h) as usize)),
            WrapPolicy::LineShift => {
                if y < 0 || y >= h {
                    return None;
                }
                let shifted_y = (y + x.div_euclid(w)).rem_euclid(h);
                Some((x.rem_euclid(w) as usize, shifted_y as usize))
            }
        }
    }
}

/// Row-major grid of cells, dimensions fixed at construction.
///
/// Exclusively owned by one cave representation at a time; `Clone` is a deep
/// copy, so two maps never alias backing storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaveMap<T> {
    width: usize,
    height: usize,
    wrap: WrapPolicy,
    cells: Vec<T>,
}

impl<T: Clone> CaveMap<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        assert!(width > 0 && height > 0, "cave map must have a positive size");
        Self { width, height, wrap: WrapPolicy::None, cells: vec![fill; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn wrap_policy(&self) -> WrapPolicy {
        self.wrap
    }

    pub fn set_wrap_policy(&mut self, wrap: WrapPolicy) {
        self.wrap = wrap;
    }

    /// Normalize a coordinate through the active wrap policy.
    pub fn normalize(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        self.wrap.normalize(self.width, self.height, x, y)
    }

    /// Read a cell. Panics if the coordinate is still outside the map after
    /// wrap normalization; that is a logic bug in the calling layer, not data.
    pub fn get(&self, x: i32, y: i32) -> &T {
        let (nx, ny) = self
            .normalize(x, y)
            .expect("coordinate outside cave map after wrap normalization");
        &self.cells[ny * self.width + nx]
    }

    /// Write a cell, with the same normalization contract as [`CaveMap::get`].
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        let (nx, ny) = self
            .normalize(x, y)
            .expect("coordinate outside cave map after wrap normalization");
        self.cells[ny * self.width + nx] = value;
    }

    /// Overwrite every cell, keeping dimensions and wrap policy.
    pub fn fill(&mut self, value: T) {
        for cell in &mut self.cells {
            *cell = value.clone();
        }
    }

    /// Row-major view of the backing cells.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }
}
