//! Poster layout: track area, year groups and footer statistics.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::track::TrackRecord;
use crate::units::UnitSystem;
use crate::xy::Xy;
use crate::year_range::YearRange;

use super::{Canvas, Drawing, TracksRenderer};

/// Page of a poster. Tracks are drawn inside a margin of [`Poster::MARGIN`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Poster {
    pub width: f64,
    pub height: f64,
}

impl Default for Poster {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 300.0,
        }
    }
}

impl Poster {
    pub const MARGIN: f64 = 10.0;

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Area tracks are drawn into.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(Xy::new(self.width, self.height), Xy::default()).inset(Self::MARGIN)
    }

    pub fn draw<R: TracksRenderer + ?Sized>(
        &self,
        renderer: &R,
        tracks: &[TrackRecord],
    ) -> Result<Drawing> {
        if tracks.is_empty() {
            return Err(Error::layout("No tracks to draw"));
        }
        info!(
            "[Poster] Drawing {} tracks with the {} renderer",
            tracks.len(),
            renderer.name()
        );
        renderer.draw(tracks, &self.canvas())
    }

    /// Tracks keyed by the calendar day they started on.
    pub fn tracks_by_date(tracks: &[TrackRecord]) -> BTreeMap<NaiveDate, Vec<&TrackRecord>> {
        let mut by_date: BTreeMap<NaiveDate, Vec<&TrackRecord>> = BTreeMap::new();
        for track in tracks {
            by_date
                .entry(track.start_time.date_naive())
                .or_default()
                .push(track);
        }
        by_date
    }

    /// Total length per start year, in `units`.
    pub fn total_length_by_year(tracks: &[TrackRecord], units: UnitSystem) -> BTreeMap<i32, f64> {
        let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
        for track in tracks {
            *totals.entry(track.year()).or_insert(0.0) += units.length(track.length_meters);
        }
        totals
    }

    pub fn years(tracks: &[TrackRecord]) -> Option<YearRange> {
        YearRange::from_tracks(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_utils::GeoPoint;
    use crate::render::GridRenderer;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn track(start: DateTime<Utc>, length: f64) -> TrackRecord {
        TrackRecord {
            source_files: vec!["p.gpx".to_string()],
            polylines: vec![vec![GeoPoint::new(5.0, 5.0), GeoPoint::new(5.01, 5.02)]],
            elevations: vec![vec![1.0, 2.0]],
            start_time: start,
            end_time: start + Duration::minutes(40),
            length_meters: length,
            special: false,
        }
    }

    #[test]
    fn test_canvas_and_draw() {
        let poster = Poster::default();
        let canvas = poster.canvas();
        assert_eq!(canvas.size, Xy::new(280.0, 280.0));
        assert_eq!(canvas.offset, Xy::new(10.0, 10.0));

        let tracks = vec![track(Utc.with_ymd_and_hms(2020, 1, 1, 8, 0, 0).unwrap(), 5000.0)];
        let drawing = poster.draw(&GridRenderer, &tracks).unwrap();
        assert_eq!(drawing.polyline_count(), 1);

        assert!(matches!(poster.draw(&GridRenderer, &[]), Err(Error::Layout(_))));
    }

    #[test]
    fn test_statistics() {
        let day = Utc.with_ymd_and_hms(2019, 7, 14, 6, 0, 0).unwrap();
        let tracks = vec![
            track(day, 12_000.0),
            track(day + Duration::hours(8), 3_000.0),
            track(Utc.with_ymd_and_hms(2021, 2, 1, 9, 0, 0).unwrap(), 1_609.344),
        ];

        let by_date = Poster::tracks_by_date(&tracks);
        assert_eq!(by_date.len(), 2);
        let july = NaiveDate::from_ymd_opt(2019, 7, 14).unwrap();
        assert_eq!(by_date[&july].len(), 2);

        let metric = Poster::total_length_by_year(&tracks, UnitSystem::Metric);
        assert_eq!(metric[&2019], 15.0);
        let imperial = Poster::total_length_by_year(&tracks, UnitSystem::Imperial);
        assert!((imperial[&2021] - 1.0).abs() < 1e-12);

        assert_eq!(Poster::years(&tracks), Some(YearRange::between(2019, 2021)));
        assert_eq!(Poster::years(&[]), None);
    }
}
