//! All tracks projected onto one shared map, optionally framed around a center.

use std::f64::consts::PI;

use log::info;

use crate::bbox::GeoBoundingBox;
use crate::config::HeatmapConfig;
use crate::error::Result;
use crate::projection::project_clipped;
use crate::track::TrackRecord;

use super::{Canvas, Drawing, Polyline, TracksRenderer};

/// Earth radius used to turn a heatmap radius into degrees.
pub const EARTH_RADIUS_KM: f64 = 6378.1;

/// Region shown by a heatmap.
///
/// - center and radius: a box of `radius` km around the center. The longitude
///   extent grows with `1 / cos(latitude)` and is unbounded at the poles.
/// - center only: the smallest box around the center holding every track point.
/// - neither: the union of all track boxes.
pub fn heatmap_bbox(tracks: &[TrackRecord], config: &HeatmapConfig) -> GeoBoundingBox {
    let Some(center) = config.center else {
        return tracks
            .iter()
            .fold(GeoBoundingBox::EMPTY, |acc, track| acc.union(&track.bbox()));
    };

    let (dlat, dlng) = match config.radius_km {
        Some(radius) => {
            let quarter_meridian = EARTH_RADIUS_KM * PI / 2.0;
            let dlat = 90.0 * radius / quarter_meridian;
            (dlat, dlat / center.latitude.to_radians().cos())
        }
        None => tracks
            .iter()
            .flat_map(|track| track.polylines.iter().flatten())
            .fold((0.0_f64, 0.0_f64), |(dlat, dlng), point| {
                let (d_lat, d_lng) = center.angular_distance_to(point);
                (dlat.max(d_lat), dlng.max(d_lng))
            }),
    };

    GeoBoundingBox::from_center_and_span(center, 2.0 * dlat, 2.0 * dlng)
}

/// All tracks on one map.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatmapRenderer {
    pub config: HeatmapConfig,
}

impl HeatmapRenderer {
    pub fn new(config: HeatmapConfig) -> Self {
        Self { config }
    }
}

impl TracksRenderer for HeatmapRenderer {
    fn name(&self) -> &'static str {
        "heatmap"
    }

    fn draw(&self, tracks: &[TrackRecord], canvas: &Canvas) -> Result<Drawing> {
        if let Some(center) = self.config.center {
            info!(
                "[Heatmap] Forcing heatmap center to {},{}",
                center.latitude, center.longitude
            );
        }
        let bbox = heatmap_bbox(tracks, &self.config);

        let mut drawing = Drawing::new();
        for track in tracks {
            for points in project_clipped(&bbox, canvas.size, canvas.offset, &track.polylines) {
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
