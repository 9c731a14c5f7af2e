//! Elevation profiles.

use crate::error::{OptionExt, Result};
use crate::track::TrackRecord;
use crate::xy::Xy;

use super::{cell_canvases, Canvas, Drawing, Polyline, TracksRenderer};

/// Elevation profiles, one grid cell per track, on a shared vertical scale.
///
/// Samples are spread evenly over the cell width regardless of the distance
/// between the points they belong to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElevationRenderer;

/// Lowest and highest elevation over all tracks.
fn elevation_range(tracks: &[TrackRecord]) -> Option<(f64, f64)> {
    tracks
        .iter()
        .flat_map(|t| t.elevations.iter().flatten())
        .copied()
        .filter(|e| e.is_finite())
        .fold(None, |range, e| match range {
            None => Some((e, e)),
            Some((lo, hi)) => Some((lo.min(e), hi.max(e))),
        })
}

fn profile(elevations: &[f64], range: (f64, f64), cell: &Canvas) -> Vec<Xy> {
    let (lo, hi) = range;
    let n = elevations.len();

    elevations
        .iter()
        .enumerate()
        .map(|(i, &e)| {
            let x = if n > 1 {
                cell.size.x * i as f64 / (n - 1) as f64
            } else {
                cell.size.x / 2.0
            };
            let height = if hi > lo { (e - lo) / (hi - lo) } else { 0.5 };
            cell.offset + Xy::new(x, cell.size.y * (1.0 - height))
        })
        .collect()
}

impl TracksRenderer for ElevationRenderer {
    fn name(&self) -> &'static str {
        "elevation"
    }

    fn draw(&self, tracks: &[TrackRecord], canvas: &Canvas) -> Result<Drawing> {
        let cells = cell_canvases(tracks.len(), canvas)?;
        let range = elevation_range(tracks).ok_or_layout("No elevation data to draw")?;
        let mut drawing = Drawing::new();

        for (track, cell) in tracks.iter().zip(cells) {
            let samples: Vec<f64> = track.elevations.iter().flatten().copied().collect();
            if samples.is_empty() {
                continue;
            }
            drawing.add(
                track.year(),
                Polyline {
                    points: profile(&samples, range, &cell),
                    special: track.special,
                },
            );
        }

        Ok(drawing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_utils::GeoPoint;
    use chrono::{Duration, TimeZone, Utc};

    fn track(elevations: Vec<Vec<f64>>) -> TrackRecord {
        let start = Utc.with_ymd_and_hms(2023, 4, 2, 6, 0, 0).unwrap();
        let polylines: Vec<Vec<GeoPoint>> = elevations
            .iter()
            .map(|e| {
                (0..e.len())
                    .map(|i| GeoPoint::new(i as f64 * 0.01, 0.0))
                    .collect::<Vec<_>>()
            })
            .collect();
        TrackRecord {
            source_files: vec!["hill.gpx".to_string()],
            polylines,
            elevations,
            start_time: start,
            end_time: start + Duration::hours(2),
            length_meters: 10_000.0,
            special: false,
        }
    }

    #[test]
    fn test_shared_vertical_scale() {
        let tracks = vec![
            track(vec![vec![100.0, 200.0], vec![300.0]]),
            track(vec![vec![200.0, 200.0]]),
        ];
        assert_eq!(elevation_range(&tracks), Some((100.0, 300.0)));

        let canvas = Canvas::new(Xy::new(200.0, 100.0), Xy::default());
        let drawing = ElevationRenderer.draw(&tracks, &canvas).unwrap();
        assert_eq!(drawing.polyline_count(), 2);

        // Segments are joined into one profile
        let first = &drawing.groups[0].polylines[0].points;
        let cell = cell_canvases(2, &canvas).unwrap()[0];
        assert_eq!(first.len(), 3);
        assert!((first[0].x - cell.offset.x).abs() < 1e-9);
        assert!((first[0].y - (cell.offset.y + cell.size.y)).abs() < 1e-9);
        assert!((first[1].y - (cell.offset.y + cell.size.y / 2.0)).abs() < 1e-9);
        assert!((first[2].x - (cell.offset.x + cell.size.x)).abs() < 1e-9);
        assert!((first[2].y - cell.offset.y).abs() < 1e-9);
    }

    #[test]
    fn test_tracks_without_samples_are_a_layout_error() {
        let tracks = vec![track(Vec::new())];
        let canvas = Canvas::new(Xy::new(100.0, 100.0), Xy::default());
        let err = ElevationRenderer.draw(&tracks, &canvas).unwrap_err();
        assert!(matches!(err, crate::error::Error::Layout(_)));
    }

    #[test]
    fn test_flat_profile_at_mid_height() {
        let tracks = vec![track(vec![vec![0.0, 0.0, 0.0]])];
        let canvas = Canvas::new(Xy::new(100.0, 100.0), Xy::default());
        let drawing = ElevationRenderer.draw(&tracks, &canvas).unwrap();
        let cell = cell_canvases(1, &canvas).unwrap()[0];
        for p in &drawing.groups[0].polylines[0].points {
            assert!((p.y - (cell.offset.y + cell.size.y / 2.0)).abs() < 1e-9);
        }
    }
}
