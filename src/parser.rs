//! Contract between the loader and activity-file decoders.
//!
//! A parser turns the raw bytes of one file into an [`ActivityDocument`]. It must
//! report failures as [`TrackLoadError`] values; the loader additionally catches
//! panics, so a misbehaving parser cannot take down a batch.

use std::io::Cursor;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackLoadError;
use crate::geo_utils::{polyline_length, GeoPoint};

/// One recorded sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in meters, if the device recorded one
    pub elevation: Option<f64>,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64, elevation: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Decoded content of one activity file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityDocument {
    /// Earliest and latest timestamp found in the file
    pub time_bounds: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// 2D path length in meters, summed over all segments
    pub length_2d: f64,
    /// Point sequences, one per recorded segment
    pub segments: Vec<Vec<TrackPoint>>,
}

/// Decoder for one activity file format.
pub trait ActivityParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<ActivityDocument, TrackLoadError>;
}

/// [`ActivityParser`] for GPX files, backed by the `gpx` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GpxParser;

impl ActivityParser for GpxParser {
    fn parse(&self, bytes: &[u8]) -> Result<ActivityDocument, TrackLoadError> {
        let gpx = gpx::read(Cursor::new(bytes)).map_err(|e| TrackLoadError::Parse(e.to_string()))?;

        let mut segments = Vec::new();
        let mut length_2d = 0.0;
        let mut start: Option<DateTime<Utc>> = None;
        let mut end: Option<DateTime<Utc>> = None;

        for track in gpx.tracks {
            for segment in track.segments {
                let mut points = Vec::with_capacity(segment.points.len());
                for waypoint in segment.points {
                    if let Some(time) = waypoint.time {
                        let iso = time
                            .format()
                            .map_err(|e| TrackLoadError::Parse(e.to_string()))?;
                        let utc = DateTime::parse_from_rfc3339(&iso)
                            .map_err(|e| TrackLoadError::Parse(e.to_string()))?
                            .with_timezone(&Utc);
                        start = Some(start.map_or(utc, |s| s.min(utc)));
                        end = Some(end.map_or(utc, |e| e.max(utc)));
                    }
                    let point = waypoint.point();
                    points.push(TrackPoint::new(point.y(), point.x(), waypoint.elevation));
                }

                let line: Vec<GeoPoint> = points.iter().map(TrackPoint::position).collect();
                length_2d += polyline_length(&line);
                segments.push(points);
            }
        }

        Ok(ActivityDocument {
            time_bounds: start.zip(end),
            length_2d,
            segments,
        })
    }
}
