//! Pair search for connection lines.
//!
//! Rendering joins every pair of particles closer than the connection
//! distance. The default search compares all pairs, which is quadratic and
//! only meant for the tens of particles an ambient background uses. The grid
//! search buckets particles into cells at least as wide as the connection
//! distance (counting sort into `cell_start` ranges), so each particle only
//! checks its 3×3 cell neighborhood. Both produce the same pairs in the same
//! order.

use glam::Vec2;

use crate::config::ConnectionStrategy;

/// A pair of particles close enough to be joined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    /// Lower particle index.
    pub a: usize,
    /// Higher particle index.
    pub b: usize,
    pub distance: f32,
}

/// Upper bound on grid cells per particle, so a tiny connection distance on
/// a huge surface cannot allocate an enormous grid.
const MAX_CELLS_PER_PARTICLE: usize = 4;

/// Find every unordered pair closer than `max_distance`, sorted by `(a, b)`.
pub fn find_connections(
    positions: &[Vec2],
    max_distance: f32,
    strategy: ConnectionStrategy,
    out: &mut Vec<Connection>,
) {
    out.clear();
    if positions.len() < 2 || max_distance <= 0.0 {
        return;
    }
    match strategy {
        ConnectionStrategy::Exhaustive => exhaustive(positions, max_distance, out),
        ConnectionStrategy::Grid => ConnectionGrid::build(positions, max_distance).collect(positions, max_distance, out),
    }
}

fn exhaustive(positions: &[Vec2], max_distance: f32, out: &mut Vec<Connection>) {
    for (a, pa) in positions.iter().enumerate() {
        for (offset, pb) in positions[a + 1..].iter().enumerate() {
            let distance = pa.distance(*pb);
            if distance < max_distance {
                out.push(Connection {
                    a,
                    b: a + 1 + offset,
                    distance,
                });
            }
        }
    }
}

/// Uniform grid over the particles' bounding box.
#[derive(Debug)]
pub struct ConnectionGrid {
    origin: Vec2,
    cell_size: f32,
    cols: usize,
    rows: usize,
    /// `cell_start[c]..cell_start[c + 1]` indexes `sorted` for cell `c`.
    cell_start: Vec<usize>,
    /// Particle indices ordered by cell.
    sorted: Vec<usize>,
}

impl ConnectionGrid {
    pub fn build(positions: &[Vec2], max_distance: f32) -> Self {
        let (min, max) = positions.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let extent = (max - min).max(Vec2::ZERO);

        let mut cell_size = max_distance;
        let cell_budget = (positions.len() * MAX_CELLS_PER_PARTICLE).max(1);
        while span(extent.x, cell_size).saturating_mul(span(extent.y, cell_size)) > cell_budget {
            cell_size *= 2.0;
        }
        let cols = span(extent.x, cell_size);
        let rows = span(extent.y, cell_size);

        let mut grid = Self {
            origin: min,
            cell_size,
            cols,
            rows,
            cell_start: vec![0; cols * rows + 1],
            sorted: vec![0; positions.len()],
        };

        let cells: Vec<usize> = positions.iter().map(|p| grid.cell_index(*p)).collect();
        for &c in &cells {
            grid.cell_start[c + 1] += 1;
        }
        for c in 0..cols * rows {
            grid.cell_start[c + 1] += grid.cell_start[c];
        }
        let mut cursor = grid.cell_start.clone();
        for (i, &c) in cells.iter().enumerate() {
            grid.sorted[cursor[c]] = i;
            cursor[c] += 1;
        }
        grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn cell_coords(&self, p: Vec2) -> (usize, usize) {
        let rel = (p - self.origin) / self.cell_size;
        let cx = (rel.x.max(0.0) as usize).min(self.cols - 1);
        let cy = (rel.y.max(0.0) as usize).min(self.rows - 1);
        (cx, cy)
    }

    fn cell_index(&self, p: Vec2) -> usize {
        let (cx, cy) = self.cell_coords(p);
        cy * self.cols + cx
    }

    /// Particles in cell `(cx, cy)`.
    fn cell(&self, cx: usize, cy: usize) -> &[usize] {
        let c = cy * self.cols + cx;
        &self.sorted[self.cell_start[c]..self.cell_start[c + 1]]
    }

    pub fn collect(&self, positions: &[Vec2], max_distance: f32, out: &mut Vec<Connection>) {
        for (a, pa) in positions.iter().enumerate() {
            let (cx, cy) = self.cell_coords(*pa);
            for ny in cy.saturating_sub(1)..=(cy + 1).min(self.rows - 1) {
                for nx in cx.saturating_sub(1)..=(cx + 1).min(self.cols - 1) {
                    for &b in self.cell(nx, ny) {
                        if b <= a {
                            continue;
                        }
                        let distance = pa.distance(positions[b]);
                        if distance < max_distance {
                            out.push(Connection { a, b, distance });
                        }
                    }
                }
            }
        }
        out.sort_unstable_by_key(|c| (c.a, c.b));
    }
}

/// Cells needed to cover `extent`.
fn span(extent: f32, cell_size: f32) -> usize {
    ((extent / cell_size) as usize).saturating_add(1)
}
