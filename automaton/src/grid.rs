// grid.rs - Cell matrix, neighbor counting and whole-grid stepping

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::patterns::Pattern;
use crate::rule::RuleSpec;

/// Default grid edge length.
pub const DEFAULT_SIZE: usize = 512;

/// The eight Moore-neighborhood offsets as `(dx, dy)`.
#[rustfmt::skip]
pub const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// Neighbor index along one axis, or `None` when it falls off the grid.
/// Edges do not wrap.
#[inline]
fn neighbor_index(i: usize, delta: isize, len: usize) -> Option<usize> {
    i.checked_add_signed(delta).filter(|&n| n < len)
}

/// Rectangular boolean cell matrix, indexed `(x, y)`.
///
/// Dimensions are fixed at construction; stepping returns a fresh grid of
/// the same size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE, DEFAULT_SIZE)
    }
}

impl Grid {
    /// Creates an all-dead grid. Zero dimensions are raised to 1.
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// An all-dead grid with the same dimensions.
    pub fn cleared(&self) -> Self {
        Self::new(self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major cell storage (`y * width + x`).
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell state; anything outside the grid reads as dead.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[self.index(x, y)]
    }

    /// Sets one cell; writes outside the grid are ignored.
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.cells[i] = alive;
        }
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Coordinates of every live cell, row by row.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(i, _)| (i % self.width, i / self.width))
    }

    /// Live neighbors of a single cell. Off-grid positions count as dead.
    pub fn neighbor_count(&self, x: usize, y: usize) -> u8 {
        let mut count = 0;
        for &(dx, dy) in &MOORE_OFFSETS {
            if let (Some(nx), Some(ny)) = (
                neighbor_index(x, dx, self.width),
                neighbor_index(y, dy, self.height),
            ) {
                count += self.cells[self.index(nx, ny)] as u8;
            }
        }
        count
    }

    /// Live-neighbor counts for the whole grid.
    ///
    /// Each of the eight offsets is accumulated as its own pass over the
    /// grid, so border cells simply receive fewer contributions.
    pub fn neighbor_counts(&self) -> NeighborCounts {
        let mut counts = vec![0u8; self.cells.len()];

        for &(dx, dy) in &MOORE_OFFSETS {
            for y in 0..self.height {
                let Some(ny) = neighbor_index(y, dy, self.height) else { continue };
                for x in 0..self.width {
                    let Some(nx) = neighbor_index(x, dx, self.width) else { continue };
                    counts[self.index(x, y)] += self.cells[self.index(nx, ny)] as u8;
                }
            }
        }

        NeighborCounts {
            width: self.width,
            height: self.height,
            counts,
        }
    }

    /// Advances one generation under `rule`.
    ///
    /// Reads only from `self` and writes a new grid, so every cell sees the
    /// complete previous generation.
    pub fn step(&self, rule: &RuleSpec) -> Grid {
        let counts = self.neighbor_counts();
        let cells = self
            .cells
            .iter()
            .zip(&counts.counts)
            .map(|(&alive, &n)| rule.next_state(alive, n))
            .collect();

        Grid {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// Next generation of a single row; used by the row tasks.
    pub fn next_row(&self, rule: &RuleSpec, y: usize) -> Vec<bool> {
        (0..self.width)
            .map(|x| rule.next_state(self.get(x, y), self.neighbor_count(x, y)))
            .collect()
    }

    /// Assembles a grid from rows produced by [`Grid::next_row`].
    pub(crate) fn from_rows(width: usize, height: usize, rows: Vec<Vec<bool>>) -> Grid {
        let mut grid = Grid::new(width, height);
        for (y, row) in rows.into_iter().enumerate().take(grid.height) {
            let start = y * grid.width;
            let len = row.len().min(grid.width);
            grid.cells[start..start + len].copy_from_slice(&row[..len]);
        }
        grid
    }

    /// Sets every cell in the region to `op.alive`, clamping the region to
    /// the grid first. Returns `false` when nothing of it lies on the grid.
    pub fn paint(&mut self, op: PaintOp) -> bool {
        let region = op.region.clamp(self.width, self.height);
        for y in region.y0..region.y1 {
            let start = self.index(region.x0, y);
            let end = self.index(region.x1, y);
            self.cells[start..end].fill(op.alive);
        }
        !region.is_empty()
    }

    /// Places a pattern with its origin at `(x, y)`; cells that land
    /// outside the grid are dropped.
    pub fn stamp(&mut self, pattern: &Pattern, x: usize, y: usize) {
        for &(dx, dy) in pattern.cells {
            if let (Some(cx), Some(cy)) = (x.checked_add(dx), y.checked_add(dy)) {
                self.set(cx, cy, true);
            }
        }
    }

    /// Fills the grid with random cells, each alive with probability
    /// `density`. A non-finite density leaves every cell dead.
    pub fn randomize(&mut self, seed: u64, density: f64) {
        let density = if density.is_finite() {
            density.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut rng = StdRng::seed_from_u64(seed);
        for cell in &mut self.cells {
            *cell = rng.gen_bool(density);
        }
    }
}

/// Per-cell live-neighbor counts, same shape as the grid they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborCounts {
    width: usize,
    height: usize,
    counts: Vec<u8>,
}

impl NeighborCounts {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.counts[y * self.width + x]
        } else {
            0
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.counts
    }
}

/// Half-open rectangle `[x0, x1) × [y0, y1)` in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
}

impl Region {
    pub fn new(x0: usize, x1: usize, y0: usize, y1: usize) -> Self {
        Self { x0, x1, y0, y1 }
    }

    /// Square brush of `radius` centred on `(cx, cy)`, clamped to a
    /// `width × height` grid. The centre may lie off the grid.
    pub fn brush(cx: i64, cy: i64, radius: u32, width: usize, height: usize) -> Self {
        let r = i64::from(radius);
        let span = |c: i64, len: usize| {
            let len = len as i64;
            let lo = (c - r).clamp(0, len);
            let hi = (c + r + 1).clamp(0, len);
            (lo as usize, hi as usize)
        };
        let (x0, x1) = span(cx, width);
        let (y0, y1) = span(cy, height);
        Self { x0, x1, y0, y1 }
    }

    /// Restricts the region to a `width × height` grid; an inverted region
    /// becomes empty.
    pub fn clamp(self, width: usize, height: usize) -> Self {
        let x1 = self.x1.min(width);
        let y1 = self.y1.min(height);
        Self {
            x0: self.x0.min(x1),
            x1,
            y0: self.y0.min(y1),
            y1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.x1 - self.x0) * (self.y1 - self.y0)
        }
    }
}

/// Paint request from the pointer: set every cell in `region` to `alive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintOp {
    pub region: Region,
    pub alive: bool,
}

impl PaintOp {
    pub fn alive(region: Region) -> Self {
        Self { region, alive: true }
    }

    pub fn dead(region: Region) -> Self {
        Self { region, alive: false }
    }
}
