//! Packing equal square cells into a rectangular canvas.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::xy::Xy;

/// Result of [`compute_grid`]: square cells of `cell_size` in `columns` x `rows`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub cell_size: f64,
    pub columns: usize,
    pub rows: usize,
}

impl GridLayout {
    /// Gap between neighbouring cells when the grid is spread over `size`.
    pub fn spacing(&self, size: Xy) -> Xy {
        let gap = |extent: f64, count: usize| {
            if count <= 1 {
                0.0
            } else {
                (extent - self.cell_size * count as f64) / (count - 1) as f64
            }
        };
        Xy::new(gap(size.x, self.columns), gap(size.y, self.rows))
    }

    /// Top-left corner of cell `index` (row-major) on a canvas of `size` at `offset`.
    pub fn cell_origin(&self, index: usize, size: Xy, offset: Xy) -> Xy {
        let spacing = self.spacing(size);
        let used = Xy::new(
            self.columns as f64 * self.cell_size + (self.columns as f64 - 1.0) * spacing.x,
            self.rows as f64 * self.cell_size + (self.rows as f64 - 1.0) * spacing.y,
        );
        let start = offset + 0.5 * (size - used);
        let col = (index % self.columns) as f64;
        let row = (index / self.columns) as f64;
        start + Xy::new(col, row) * Xy::new(self.cell_size + spacing.x, self.cell_size + spacing.y)
    }
}

/// Choose `columns x rows >= item_count` maximizing the square cell size on a
/// `width x height` canvas.
///
/// For each column count only the smallest sufficient row count is considered,
/// since extra rows can only shrink cells. Among equal cell sizes the layout with
/// fewer cells wins, then the one with fewer columns.
///
/// # Example
/// ```
/// use track_poster::compute_grid;
///
/// let grid = compute_grid(4, 280.0, 280.0).unwrap();
/// assert_eq!((grid.columns, grid.rows), (2, 2));
/// assert_eq!(grid.cell_size, 140.0);
/// ```
pub fn compute_grid(item_count: usize, width: f64, height: f64) -> Result<GridLayout> {
    if item_count == 0 {
        return Err(Error::layout("Unable to compute grid for zero items"));
    }
    if !(width > 0.0 && height > 0.0) {
        return Err(Error::layout(format!(
            "Unable to compute grid for canvas {}x{}",
            width, height
        )));
    }

    let mut best: Option<GridLayout> = None;
    for columns in 1..=item_count {
        let rows = item_count.div_ceil(columns);
        let cell_size = (width / columns as f64).min(height / rows as f64);
        let better = best.map_or(true, |b| {
            cell_size > b.cell_size
                || (cell_size == b.cell_size && columns * rows < b.columns * b.rows)
        });
        if better {
            best = Some(GridLayout {
                cell_size,
                columns,
                rows,
            });
        }
    }

    best.ok_or_else(|| Error::layout("Unable to compute grid"))
}
