//! # Rendering
//!
//! Renderers turn tracks into drawing operations: canvas polylines grouped by year.
//! They only depend on the public track and geometry API. Writing the result to
//! SVG or any other format is left to the caller.
//!
//! - [`GridRenderer`] - one cell per track, each track fitted into its own cell
//! - [`HeatmapRenderer`] - all tracks overlaid on one map
//! - [`ElevationRenderer`] - one elevation profile per cell
//! - [`Poster`] - page geometry and per-year statistics

mod elevation;
mod grid;
mod heatmap;
mod poster;

pub use elevation::ElevationRenderer;
pub use grid::GridRenderer;
pub use heatmap::{heatmap_bbox, HeatmapRenderer, EARTH_RADIUS_KM};
pub use poster::Poster;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::compute_grid;
use crate::track::TrackRecord;
use crate::xy::Xy;

/// Share of a grid cell used by its track.
const CELL_FILL: f64 = 0.9;

/// Rectangle on the canvas that a renderer draws into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub size: Xy,
    pub offset: Xy,
}

impl Canvas {
    pub fn new(size: Xy, offset: Xy) -> Self {
        Self { size, offset }
    }

    /// Same canvas shrunk by `margin` on every side.
    pub fn inset(&self, margin: f64) -> Self {
        Self {
            size: self.size - Xy::new(2.0 * margin, 2.0 * margin),
            offset: self.offset + Xy::new(margin, margin),
        }
    }
}

/// One stroke on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Xy>,
    /// Drawn from a highlighted track
    pub special: bool,
}

/// All strokes of tracks starting in `year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearGroup {
    pub year: i32,
    pub polylines: Vec<Polyline>,
}

/// Output of a [`TracksRenderer`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// Year groups in the order their first track was drawn
    pub groups: Vec<YearGroup>,
}

impl Drawing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stroke to the group of `year`, creating the group on first use.
    pub fn add(&mut self, year: i32, polyline: Polyline) {
        match self.groups.iter_mut().find(|g| g.year == year) {
            Some(group) => group.polylines.push(polyline),
            None => self.groups.push(YearGroup {
                year,
                polylines: vec![polyline],
            }),
        }
    }

    pub fn group(&self, year: i32) -> Option<&YearGroup> {
        self.groups.iter().find(|g| g.year == year)
    }

    pub fn polyline_count(&self) -> usize {
        self.groups.iter().map(|g| g.polylines.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A way of drawing a set of tracks.
pub trait TracksRenderer {
    fn name(&self) -> &'static str;

    /// Draw `tracks` into `canvas`.
    fn draw(&self, tracks: &[TrackRecord], canvas: &Canvas) -> Result<Drawing>;
}

/// Inner drawing area of each of `count` grid cells laid out over `canvas`.
///
/// Cells are spread evenly, the grid is centered, and each track gets 90% of
/// its cell with a 5% margin.
pub(crate) fn cell_canvases(count: usize, canvas: &Canvas) -> Result<Vec<Canvas>> {
    let layout = compute_grid(count, canvas.size.x, canvas.size.y)?;
    let cell = Xy::new(layout.cell_size, layout.cell_size);
    let margin = 0.5 * (1.0 - CELL_FILL);

    Ok((0..count)
        .map(|index| {
            let origin = layout.cell_origin(index, canvas.size, canvas.offset);
            Canvas::new(CELL_FILL * cell, origin + margin * cell)
        })
        .collect())
}
