//! Run configuration as handed over by a command line or settings file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, OptionExt, Result};
use crate::geo_utils::GeoPoint;
use crate::loader::LoaderConfig;
use crate::units::UnitSystem;
use crate::year_range::YearRange;

/// Validated heatmap framing options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Forced center; `None` frames all tracks.
    pub center: Option<GeoPoint>,
    /// Radius in km that must be visible around `center`.
    pub radius_km: Option<f64>,
}

impl HeatmapConfig {
    /// Validate a `"LAT,LNG"` center and an optional radius.
    ///
    /// A radius must be positive and needs a center.
    pub fn parse(center: Option<&str>, radius_km: Option<f64>) -> Result<Self> {
        let center = center.map(parse_lat_lng).transpose()?;

        if let Some(radius) = radius_km {
            if radius.is_nan() || radius <= 0.0 {
                return Err(Error::parameter(format!(
                    "Not a valid radius: {} (must be > 0)",
                    radius
                )));
            }
            center.ok_or_parameter("Heatmap radius needs a heatmap center")?;
        }

        Ok(Self { center, radius_km })
    }
}

fn parse_lat_lng(value: &str) -> Result<GeoPoint> {
    let bad = || Error::parameter(format!("Not a valid LAT,LNG pair: {}", value));

    let mut parts = value.split(',');
    let (lat, lng) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lng), None) => (lat, lng),
        _ => return Err(bad()),
    };
    let lat: f64 = lat.trim().parse().map_err(|_| bad())?;
    let lng: f64 = lng.trim().parse().map_err(|_| bad())?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(bad());
    }
    Ok(GeoPoint::new(lat, lng))
}

/// Everything a run needs, in its raw user-facing form.
///
/// ```
/// use track_poster::Settings;
///
/// let settings = Settings::from_json_str(r#"{"year": "2019-2020", "min_length": 2.5}"#).unwrap();
/// let config = settings.loader_config().unwrap();
/// assert_eq!(config.min_length_meters, 2500.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the activity files
    pub gpx_dir: PathBuf,
    /// `"all"`, `"YYYY"` or `"YYYY-YYYY"`
    pub year: String,
    /// Minimum track length in `units`
    pub min_length: f64,
    pub units: UnitSystem,
    /// File names of tracks to highlight
    pub special_files: Vec<String>,
    /// `"LAT,LNG"`
    pub heatmap_center: Option<String>,
    pub heatmap_radius_km: Option<f64>,
    pub workers: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gpx_dir: PathBuf::from("."),
            year: "all".to_string(),
            min_length: 1.0,
            units: UnitSystem::Metric,
            special_files: Vec::new(),
            heatmap_center: None,
            heatmap_radius_km: None,
            workers: None,
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parameter(format!("Bad settings: {}", e)))
    }

    pub fn loader_config(&self) -> Result<LoaderConfig> {
        let years: YearRange = self.year.parse()?;
        if !self.min_length.is_finite() || self.min_length < 0.0 {
            return Err(Error::parameter(format!(
                "Not a valid minimum length: {}",
                self.min_length
            )));
        }
        Ok(LoaderConfig {
            years,
            min_length_meters: self.units.to_meters(self.min_length),
            special_file_names: self.special_files.iter().cloned().collect(),
            workers: self.workers,
            ..LoaderConfig::default()
        })
    }

    pub fn heatmap_config(&self) -> Result<HeatmapConfig> {
        HeatmapConfig::parse(self.heatmap_center.as_deref(), self.heatmap_radius_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heatmap_center() {
        let config = HeatmapConfig::parse(Some(" 47.37, 8.54 "), Some(20.0)).unwrap();
        assert_eq!(config.center, Some(GeoPoint::new(47.37, 8.54)));
        assert_eq!(config.radius_km, Some(20.0));

        assert_eq!(HeatmapConfig::parse(None, None).unwrap(), HeatmapConfig::default());
    }

    #[test]
    fn test_heatmap_rejects_bad_center() {
        for bad in ["47.37", "1,2,3", "north,east", "91,0", "0,180.5", "-90.1,0", ""] {
            let err = HeatmapConfig::parse(Some(bad), None).unwrap_err();
            assert!(err.to_string().contains("Not a valid LAT,LNG pair"), "{}", bad);
        }
        assert!(HeatmapConfig::parse(Some("-90,-180"), None).is_ok());
    }

    #[test]
    fn test_heatmap_radius_rules() {
        assert!(matches!(
            HeatmapConfig::parse(Some("0,0"), Some(0.0)),
            Err(Error::Parameter(_))
        ));
        assert!(matches!(
            HeatmapConfig::parse(Some("0,0"), Some(-3.0)),
            Err(Error::Parameter(_))
        ));
        let err = HeatmapConfig::parse(None, Some(5.0)).unwrap_err();
        assert!(err.to_string().contains("needs a heatmap center"));
    }

    #[test]
    fn test_settings_from_json() {
        let settings = Settings::from_json_str(
            r#"{
                "gpx_dir": "/data/activities",
                "year": "2018",
                "min_length": 2,
                "units": "imperial",
                "special_files": ["race.gpx"],
                "heatmap_center": "51.5,-0.12",
                "heatmap_radius_km": 10,
                "workers": 4
            }"#,
        )
        .unwrap();

        let loader = settings.loader_config().unwrap();
        assert_eq!(loader.years, YearRange::between(2018, 2018));
        assert!((loader.min_length_meters - 3218.688).abs() < 1e-9);
        assert!(loader.special_file_names.contains("race.gpx"));
        assert_eq!(loader.workers, Some(4));

        let heatmap = settings.heatmap_config().unwrap();
        assert_eq!(heatmap.center, Some(GeoPoint::new(51.5, -0.12)));
    }

    #[test]
    fn test_settings_defaults_and_errors() {
        let settings = Settings::from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.loader_config().unwrap().min_length_meters, 1000.0);

        let bad_year = Settings {
            year: "last year".to_string(),
            ..Settings::default()
        };
        assert!(bad_year.loader_config().unwrap_err().is_fatal());

        assert!(matches!(
            Settings::from_json_str("{\"year\": 2019}"),
            Err(Error::Parameter(_))
        ));
    }
}
