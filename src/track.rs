//! Validated activity tracks and their merge operation.

use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use chrono::{DateTime, Datelike, Utc};
use geo::{Coord, LineString, SimplifyIdx};
use serde::{Deserialize, Serialize};

use crate::bbox::GeoBoundingBox;
use crate::error::TrackLoadError;
use crate::geo_utils::GeoPoint;
use crate::parser::{ActivityDocument, ActivityParser};

/// Douglas-Peucker tolerance applied to each segment, in degrees (~11 meters).
pub const SIMPLIFICATION_TOLERANCE: f64 = 0.0001;

/// One logical activity, possibly merged from several source files.
///
/// `polylines` and `elevations` are index-aligned: same number of entries, and
/// each elevation sequence has one sample per point of its polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Base names of the files this track was built from
    pub source_files: Vec<String>,
    pub polylines: Vec<Vec<GeoPoint>>,
    /// Elevations in meters
    pub elevations: Vec<Vec<f64>>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// 2D length in meters
    pub length_meters: f64,
    /// User highlighted track
    pub special: bool,
}

impl TrackRecord {
    /// Read and validate one activity file.
    pub fn load<P: ActivityParser + ?Sized>(
        path: &Path,
        parser: &P,
    ) -> Result<Self, TrackLoadError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        // Treadmill exports and the like can be zero bytes
        let bytes = fs::read(path).map_err(|e| TrackLoadError::Io(e.to_string()))?;
        if bytes.is_empty() {
            return Err(TrackLoadError::EmptyFile);
        }

        let document = panic::catch_unwind(AssertUnwindSafe(|| parser.parse(&bytes)))
            .map_err(|payload| TrackLoadError::Unexpected(panic_message(payload.as_ref())))??;
        Self::from_document(file_name, document)
    }

    /// Validate a decoded document and build the track from it.
    ///
    /// Requires time bounds, a positive length and an elevation for every point.
    /// Segments are simplified, keeping elevations aligned with the retained points.
    pub fn from_document(
        file_name: impl Into<String>,
        document: ActivityDocument,
    ) -> Result<Self, TrackLoadError> {
        let (start_time, end_time) = document.time_bounds.ok_or(TrackLoadError::NoTime)?;
        if start_time > end_time {
            return Err(TrackLoadError::NoTime);
        }
        if document.length_2d.is_nan() || document.length_2d <= 0.0 {
            return Err(TrackLoadError::EmptyTrack);
        }

        let mut polylines = Vec::with_capacity(document.segments.len());
        let mut elevations = Vec::with_capacity(document.segments.len());

        for segment in document.segments.iter().filter(|s| !s.is_empty()) {
            let elevation_line: Option<Vec<f64>> = segment
                .iter()
                .map(|p| p.elevation.filter(|e| e.is_finite()))
                .collect();
            let elevation_line = elevation_line.ok_or(TrackLoadError::InvalidElevations)?;

            let line: Vec<GeoPoint> = segment.iter().map(|p| p.position()).collect();
            let keep = simplify_indices(&line);
            polylines.push(keep.iter().map(|&i| line[i]).collect());
            elevations.push(keep.iter().map(|&i| elevation_line[i]).collect());
        }

        if elevations.is_empty() {
            return Err(TrackLoadError::NoElevations);
        }

        Ok(Self {
            source_files: vec![file_name.into()],
            polylines,
            elevations,
            start_time,
            end_time,
            length_meters: document.length_2d,
            special: false,
        })
    }

    /// The file this record was loaded from (the first one, once merged).
    pub fn file_name(&self) -> &str {
        self.source_files.first().map(String::as_str).unwrap_or("")
    }

    pub fn year(&self) -> i32 {
        self.start_time.year()
    }

    /// Smallest box containing every point of the track.
    pub fn bbox(&self) -> GeoBoundingBox {
        GeoBoundingBox::from_points(self.polylines.iter().flatten())
    }

    /// Absorb a later track into this one.
    ///
    /// Only grows the record: time range, length, source files, and `special` once set.
    pub fn append(&mut self, other: TrackRecord) {
        self.end_time = self.end_time.max(other.end_time);
        self.polylines.extend(other.polylines);
        self.elevations.extend(other.elevations);
        self.length_meters += other.length_meters;
        self.source_files.extend(other.source_files);
        self.special = self.special || other.special;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "parser panicked".to_string()
    }
}

/// Indices of the points kept by Douglas-Peucker simplification.
fn simplify_indices(line: &[GeoPoint]) -> Vec<usize> {
    if line.len() < 3 {
        return (0..line.len()).collect();
    }
    let coords: Vec<Coord> = line
        .iter()
        .map(|p| Coord {
            x: p.longitude,
            y: p.latitude,
        })
        .collect();
    LineString::new(coords).simplify_idx(&SIMPLIFICATION_TOLERANCE)
}
