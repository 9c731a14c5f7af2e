//! Small multiples: every track scaled into its own grid cell.

use crate::error::Result;
use crate::projection::project;
use crate::track::TrackRecord;

use super::{cell_canvases, Canvas, Drawing, Polyline, TracksRenderer};

/// Small multiples: every track in its own grid cell, scaled to fit.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridRenderer;

impl TracksRenderer for GridRenderer {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn draw(&self, tracks: &[TrackRecord], canvas: &Canvas) -> Result<Drawing> {
        let cells = cell_canvases(tracks.len(), canvas)?;
        let mut drawing = Drawing::new();

        for (track, cell) in tracks.iter().zip(cells) {
            for points in project(&track.bbox(), cell.size, cell.offset, &track.polylines) {
                drawing.add(
                    track.year(),
                    Polyline {
                        points,
                        special: track.special,
                    },
                );
            }
        }

        Ok(drawing)
    }
}
