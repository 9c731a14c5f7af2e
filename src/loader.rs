//! Loading a directory of activity files into merged tracks.
//!
//! Loading runs in two phases:
//! 1. Every discovered file is parsed on its own. With the `parallel` feature this
//!    fans out on a rayon pool. A file that fails is logged and dropped; it never
//!    affects its siblings.
//! 2. The surviving tracks go through filter, merge and minimum length, in that
//!    order. Merging can lift short pieces over the minimum, so the length check
//!    has to come last.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::{ActivityParser, GpxParser};
use crate::track::TrackRecord;
use crate::year_range::YearRange;

/// Tracks starting less than this long after the previous one ended are merged.
pub const MERGE_WINDOW_SECONDS: i64 = 3600;

/// Configuration for [`TrackLoader::load`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Only tracks starting in these years are kept.
    /// Default: all years
    pub years: YearRange,

    /// Minimum length of a (possibly merged) track, in meters.
    /// Default: 1000.0
    pub min_length_meters: f64,

    /// Base names of files whose tracks are highlighted.
    /// Default: empty
    pub special_file_names: HashSet<String>,

    /// Extension of activity files. Compared case-insensitively; a leading dot is ignored.
    /// Default: "gpx"
    pub extension: String,

    /// Number of parser threads. `None` uses one per available core.
    /// Ignored without the `parallel` feature. Default: None
    pub workers: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            years: YearRange::all(),
            min_length_meters: 1000.0,
            special_file_names: HashSet::new(),
            extension: "gpx".to_string(),
            workers: None,
        }
    }
}

/// List activity files directly inside `directory`, sorted by name.
///
/// A file matches when its name ends in `.{extension}`, ignoring case. A leading
/// dot on `extension` is ignored. Subdirectories are not searched. Fails with
/// [`Error::Parameter`] if `directory` does not exist or is not a directory, or
/// if the extension is empty.
pub fn discover(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(Error::parameter(format!(
            "Not a directory: {}",
            directory.display()
        )));
    }
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        return Err(Error::parameter("Empty activity file extension"));
    }
    let suffix = format!(".{}", extension.to_ascii_lowercase());

    let mut paths = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        let matches_extension = path.file_name().map_or(false, |name| {
            name.to_string_lossy().to_ascii_lowercase().ends_with(&suffix)
        });
        if matches_extension && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Tracks produced by [`TrackLoader::load_with_failures`], with the files that were dropped.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Filtered and merged tracks, ordered by start time
    pub tracks: Vec<TrackRecord>,
    /// One [`Error::TrackLoad`] per file that could not be loaded, in discovery order
    pub failures: Vec<Error>,
}

impl LoadReport {
    /// Names of the files that failed to load.
    pub fn failed_files(&self) -> Vec<&str> {
        self.failures
            .iter()
            .filter_map(|err| match err {
                Error::TrackLoad { file, .. } => Some(file.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Loads activity files with a pluggable [`ActivityParser`].
#[derive(Debug, Clone, Default)]
pub struct TrackLoader<P: ActivityParser = GpxParser> {
    parser: P,
}

impl TrackLoader<GpxParser> {
    /// Loader for GPX files.
    pub fn new() -> Self {
        Self { parser: GpxParser }
    }
}

impl<P: ActivityParser> TrackLoader<P> {
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    /// Load, filter and merge all activity files in `directory`.
    ///
    /// Only configuration problems are returned as errors. Files that fail to load
    /// are logged and skipped.
    pub fn load(&self, directory: &Path, config: &LoaderConfig) -> Result<Vec<TrackRecord>> {
        Ok(self.load_with_failures(directory, config)?.tracks)
    }

    /// Like [`load`](Self::load), but also hands back the per-file failures.
    pub fn load_with_failures(&self, directory: &Path, config: &LoaderConfig) -> Result<LoadReport> {
        let paths = discover(directory, &config.extension)?;
        info!(
            "[TrackLoader] Found {} {} files in {}",
            paths.len(),
            config.extension,
            directory.display()
        );

        let start = std::time::Instant::now();
        let results = self.parse_all(&paths, config.workers);

        let mut tracks = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(track) => tracks.push(track),
                Err(err) => {
                    error!("[TrackLoader] {}", err);
                    failures.push(err);
                }
            }
        }
        info!(
            "[TrackLoader] Loaded {} tracks ({} failed) in {:?}",
            tracks.len(),
            failures.len(),
            start.elapsed()
        );

        Ok(LoadReport {
            tracks: filter_and_merge(tracks, config),
            failures,
        })
    }

    fn parse_file(&self, path: &Path) -> Result<TrackRecord> {
        TrackRecord::load(path, &self.parser).map_err(|source| Error::TrackLoad {
            file: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            source,
        })
    }

    /// Parse every file; results come back in the order of `paths`.
    #[cfg(feature = "parallel")]
    fn parse_all(&self, paths: &[PathBuf], workers: Option<usize>) -> Vec<Result<TrackRecord>> {
        use rayon::prelude::*;

        let run = || -> Vec<Result<TrackRecord>> {
            paths.par_iter().map(|path| self.parse_file(path)).collect()
        };

        match workers {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => {
                    debug!("[TrackLoader] Parsing on {} threads", threads);
                    pool.install(run)
                }
                Err(e) => {
                    error!("[TrackLoader] Cannot build thread pool, using the global one: {}", e);
                    run()
                }
            },
            None => run(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn parse_all(&self, paths: &[PathBuf], _workers: Option<usize>) -> Vec<Result<TrackRecord>> {
        paths.iter().map(|path| self.parse_file(path)).collect()
    }
}

/// Run filter, merge and minimum length, in that order.
pub fn filter_and_merge(tracks: Vec<TrackRecord>, config: &LoaderConfig) -> Vec<TrackRecord> {
    let filtered = filter_tracks(tracks, config);
    let merged = merge_tracks(filtered);

    let before = merged.len();
    let result: Vec<TrackRecord> = merged
        .into_iter()
        .filter(|t| t.length_meters >= config.min_length_meters)
        .collect();
    info!(
        "[TrackLoader] {} tracks after dropping {} shorter than {} m",
        result.len(),
        before - result.len(),
        config.min_length_meters
    );
    result
}

/// Drop empty, out-of-range and elevation-less tracks and mark special ones.
pub fn filter_tracks(tracks: Vec<TrackRecord>, config: &LoaderConfig) -> Vec<TrackRecord> {
    tracks
        .into_iter()
        .filter_map(|mut track| {
            if track.length_meters <= 0.0 {
                info!("[TrackLoader] {}: skipping empty track", track.file_name());
                return None;
            }
            if !config.years.contains(&track.start_time) {
                info!(
                    "[TrackLoader] {}: skipping track with wrong year {}",
                    track.file_name(),
                    track.year()
                );
                return None;
            }
            if track.elevations.is_empty() {
                info!("[TrackLoader] {}: skipping track without elevations", track.file_name());
                return None;
            }
            if config.special_file_names.contains(track.file_name()) {
                track.special = true;
            }
            Some(track)
        })
        .collect()
}

/// Merge tracks that follow each other within [`MERGE_WINDOW_SECONDS`].
///
/// Tracks are sorted by start time first; ties keep their input order.
pub fn merge_tracks(mut tracks: Vec<TrackRecord>) -> Vec<TrackRecord> {
    tracks.sort_by_key(|t| t.start_time);
    let window = Duration::seconds(MERGE_WINDOW_SECONDS);
    let count = tracks.len();

    let mut merged: Vec<TrackRecord> = Vec::with_capacity(count);
    for track in tracks {
        if let Some(current) = merged.last_mut() {
            let gap = track.start_time - current.end_time;
            if gap > Duration::zero() && gap < window {
                debug!(
                    "[TrackLoader] Merging {} into {} (gap {}s)",
                    track.file_name(),
                    current.file_name(),
                    gap.num_seconds()
                );
                current.append(track);
                continue;
            }
        }
        merged.push(track);
    }

    if merged.len() < count {
        info!("[TrackLoader] Merged {} tracks into {}", count, merged.len());
    }
    merged
}
