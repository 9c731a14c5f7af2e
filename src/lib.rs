//! # Track Poster
//!
//! Turns a directory of recorded GPS activities into tracks and canvas geometry
//! for poster, heatmap and elevation renderings.
//!
//! This library provides:
//! - Fault-isolated loading of activity files, in parallel where available
//! - Filtering by year and merging of activities split over several files
//! - Bounding-box arithmetic that handles the antimeridian
//! - Grid packing and aspect-preserving projection onto a canvas
//!
//! ## Features
//!
//! - **`parallel`** - Parse activity files on a rayon thread pool (default)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use track_poster::{GridRenderer, LoaderConfig, Poster, TrackLoader};
//!
//! let config = LoaderConfig {
//!     years: "2019-2021".parse()?,
//!     ..LoaderConfig::default()
//! };
//! let tracks = TrackLoader::new().load(Path::new("activities"), &config)?;
//!
//! let drawing = Poster::default().draw(&GridRenderer, &tracks)?;
//! for group in &drawing.groups {
//!     println!("{}: {} lines", group.year, group.polylines.len());
//! }
//! # Ok::<(), track_poster::Error>(())
//! ```

// Unified error handling
pub mod error;
pub use error::{Error, OptionExt, Result, TrackLoadError};

// Geographic utilities (points, distances, longitude wraparound)
pub mod geo_utils;
pub use geo_utils::{haversine_distance, lng_delta, polyline_length, GeoPoint};

// Latitude/longitude rectangles
pub mod bbox;
pub use bbox::GeoBoundingBox;

// Canvas vectors
pub mod xy;
pub use xy::Xy;

// Grid packing
pub mod grid;
pub use grid::{compute_grid, GridLayout};

// Geographic to canvas projection
pub mod projection;
pub use projection::{project, project_clipped};

// Year filters
pub mod year_range;
pub use year_range::YearRange;

// Length units
pub mod units;
pub use units::UnitSystem;

// Activity file decoding
pub mod parser;
pub use parser::{ActivityDocument, ActivityParser, GpxParser, TrackPoint};

// Validated, mergeable tracks
pub mod track;
pub use track::TrackRecord;

// Directory loading and the filter/merge pipeline
pub mod loader;
pub use loader::{
    discover, filter_and_merge, filter_tracks, merge_tracks, LoadReport, LoaderConfig,
    TrackLoader,
};

// Run configuration
pub mod config;
pub use config::{HeatmapConfig, Settings};

// Renderers producing drawing operations
pub mod render;
pub use render::{
    heatmap_bbox, Canvas, Drawing, ElevationRenderer, GridRenderer, HeatmapRenderer, Polyline,
    Poster, TracksRenderer, YearGroup,
};
