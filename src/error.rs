//! Unified error handling for the track-poster library.
//!
//! Two kinds of failure matter here:
//! - [`Error::Parameter`] for bad configuration, always fatal to a run
//! - [`TrackLoadError`] for a single activity file that could not become a track,
//!   always recovered by the loader (logged, file dropped)

use thiserror::Error;

/// Why a single activity file failed to produce a track.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackLoadError {
    #[error("Empty activity file")]
    EmptyFile,
    #[error("Cannot read activity file: {0}")]
    Io(String),
    #[error("Failed to parse activity file: {0}")]
    Parse(String),
    #[error("Track has no start or end time")]
    NoTime,
    #[error("Track is empty")]
    EmptyTrack,
    #[error("Track has invalid elevations")]
    InvalidElevations,
    #[error("Track has no elevations")]
    NoElevations,
    /// Any other parser failure, including a parser panic.
    #[error("Something went wrong when loading the track: {0}")]
    Unexpected(String),
}

/// Unified error type for track-poster operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid user supplied configuration
    #[error("Parameter error: {0}")]
    Parameter(String),
    /// A track file failed to load
    #[error("Error while loading {file}: {source}")]
    TrackLoad {
        file: String,
        #[source]
        source: TrackLoadError,
    },
    /// Renderer could not lay out its tracks
    #[error("Layout error: {0}")]
    Layout(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parameter(message: impl Into<String>) -> Self {
        Error::Parameter(message.into())
    }

    pub fn layout(message: impl Into<String>) -> Self {
        Error::Layout(message.into())
    }

    /// True for configuration errors, which abort a run before any work starts.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Parameter(_) | Error::Io(_))
    }
}

/// Result type alias for track-poster operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for converting Option to an [`Error`].
pub trait OptionExt<T> {
    /// Convert Option to Result with a parameter error.
    fn ok_or_parameter(self, message: &str) -> Result<T>;

    /// Convert Option to Result with a layout error.
    fn ok_or_layout(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parameter(self, message: &str) -> Result<T> {
        self.ok_or_else(|| Error::parameter(message))
    }

    fn ok_or_layout(self, message: &str) -> Result<T> {
        self.ok_or_else(|| Error::layout(message))
    }
}
