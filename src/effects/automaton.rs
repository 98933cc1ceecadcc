//! Outer-totalistic cellular automaton seeded from thresholded brightness.

use crate::foundation::core::{PixelBuffer, Plane, Rgb};
use crate::foundation::error::FxResult;
use crate::foundation::math::clamp_param;

/// Neighborhood family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomatonKind {
    /// Moore neighborhood of radius 1 (8 neighbors).
    #[default]
    Classic,
    /// "Larger than life" neighborhood of radius 2 (24 neighbors).
    LargerThanLife,
}

impl AutomatonKind {
    /// Neighborhood radius in cells.
    pub fn radius(self) -> i64 {
        match self {
            Self::Classic => 1,
            Self::LargerThanLife => 2,
        }
    }
}

/// Automaton parameters. Count ranges are inclusive; an inverted range matches nothing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AutomatonParams {
    /// Cells darker than this start alive.
    pub threshold: f32,
    /// Cell edge in pixels, `1..=20`.
    pub cell_size: u32,
    /// Generations to run, `0..=50`.
    pub steps: u32,
    /// Neighborhood family.
    pub kind: AutomatonKind,
    /// Lowest neighbor count that keeps a live cell alive.
    pub survive_lower: u32,
    /// Highest neighbor count that keeps a live cell alive.
    pub survive_upper: u32,
    /// Lowest neighbor count that revives a dead cell.
    pub birth_lower: u32,
    /// Highest neighbor count that revives a dead cell.
    pub birth_upper: u32,
    /// Dead cell color.
    pub bg: Rgb,
    /// Live cell color.
    pub fg: Rgb,
}

impl Default for AutomatonParams {
    fn default() -> Self {
        Self {
            threshold: 128.0,
            cell_size: 4,
            steps: 3,
            kind: AutomatonKind::Classic,
            survive_lower: 2,
            survive_upper: 3,
            birth_lower: 3,
            birth_upper: 3,
            bg: Rgb::WHITE,
            fg: Rgb::BLACK,
        }
    }
}

impl AutomatonParams {
    /// Clamp every field into its domain.
    pub fn sanitized(&self) -> Self {
        Self {
            threshold: clamp_param(self.threshold, 0.0, 255.0, 128.0),
            cell_size: self.cell_size.clamp(1, 20),
            steps: self.steps.min(50),
            ..self.clone()
        }
    }

    fn survives(&self, n: u32) -> bool {
        self.survive_lower <= n && n <= self.survive_upper
    }

    fn born(&self, n: u32) -> bool {
        self.birth_lower <= n && n <= self.birth_upper
    }
}

crate::animation::animatable!(AutomatonParams {
    "threshold" => threshold: [0, 255, 1],
    "cell_size" => cell_size: [1, 20, 1],
    "steps" => steps: [0, 50, 1],
    "survive_lower" => survive_lower: [0, 8, 1],
    "survive_upper" => survive_upper: [0, 8, 1],
    "birth_lower" => birth_lower: [0, 8, 1],
    "birth_upper" => birth_upper: [0, 8, 1],
});

/// Boolean cell grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl CellGrid {
    /// Build from explicit cells; `None` when the length does not match.
    pub fn from_cells(cols: usize, rows: usize, cells: Vec<bool>) -> Option<Self> {
        (cols > 0 && rows > 0 && cells.len() == cols * rows).then_some(Self { cols, rows, cells })
    }

    /// Columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cell state, row-major.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Live cell at `(c, r)`.
    pub fn alive(&self, c: usize, r: usize) -> bool {
        self.cells[r * self.cols + c]
    }

    /// Number of live cells; always within `0..=cols*rows`.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&a| a).count()
    }

    /// Live neighbors of `(c, r)` within `radius`, wrapping at the edges.
    pub fn neighbors(&self, c: usize, r: usize, radius: i64) -> u32 {
        let (cols, rows) = (self.cols as i64, self.rows as i64);
        let mut n = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nr = (r as i64 + dy).rem_euclid(rows) as usize;
                let nc = (c as i64 + dx).rem_euclid(cols) as usize;
                n += u32::from(self.cells[nr * self.cols + nc]);
            }
        }
        n
    }
}

/// Initial grid: a cell is alive when the luma at its center is below `threshold`.
pub fn seed_grid(luma: &Plane, params: &AutomatonParams) -> CellGrid {
    let p = params.sanitized();
    let cell = p.cell_size;
    let cols = luma.width().div_ceil(cell) as usize;
    let rows = luma.height().div_ceil(cell) as usize;
    let center = |i: usize, extent: u32| -> u32 {
        (((i as f64 + 0.5) * f64::from(cell)).floor() as u32).min(extent - 1)
    };
    let mut cells = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        let py = center(r, luma.height());
        for c in 0..cols {
            let px = center(c, luma.width());
            cells.push(luma.get(px, py) < p.threshold);
        }
    }
    CellGrid { cols, rows, cells }
}

/// One synchronous generation computed from a snapshot of `grid`.
pub fn step(grid: &CellGrid, params: &AutomatonParams) -> CellGrid {
    let radius = params.kind.radius();
    let mut cells = Vec::with_capacity(grid.cells.len());
    for r in 0..grid.rows {
        for c in 0..grid.cols {
            let n = grid.neighbors(c, r, radius);
            cells.push(if grid.alive(c, r) {
                params.survives(n)
            } else {
                params.born(n)
            });
        }
    }
    CellGrid {
        cols: grid.cols,
        rows: grid.rows,
        cells,
    }
}

/// Seed, run `steps` generations and return the final grid.
pub fn simulate(luma: &Plane, params: &AutomatonParams) -> CellGrid {
    let p = params.sanitized();
    let mut grid = seed_grid(luma, &p);
    for _ in 0..p.steps {
        grid = step(&grid, &p);
    }
    grid
}

/// Draw every live cell as a `cell_size` square in `fg` over `bg`.
pub fn render_grid(
    grid: &CellGrid,
    width: u32,
    height: u32,
    params: &AutomatonParams,
) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let cell = p.cell_size;
    let mut out = PixelBuffer::filled(width, height, p.bg.to_rgba())?;
    let fg = p.fg.to_rgba();
    for r in 0..grid.rows {
        for c in 0..grid.cols {
            if grid.alive(c, r) {
                out.fill_rect(c as u32 * cell, r as u32 * cell, cell, cell, fg);
            }
        }
    }
    Ok(out)
}

/// Full automaton effect over a luma plane.
#[tracing::instrument(skip_all, fields(steps = params.steps))]
pub fn render_automaton(luma: &Plane, params: &AutomatonParams) -> FxResult<PixelBuffer> {
    let grid = simulate(luma, params);
    tracing::trace!(population = grid.population(), "automaton settled");
    render_grid(&grid, luma.width(), luma.height(), params)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/automaton.rs"]
mod tests;
