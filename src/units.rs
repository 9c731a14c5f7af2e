//! Length unit conversions as plain functions of a [`UnitSystem`] value.

use serde::{Deserialize, Serialize};

pub const METERS_PER_KM: f64 = 1000.0;
pub const METERS_PER_MILE: f64 = 1609.344;

/// Display unit system for lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Kilometers
    #[default]
    Metric,
    /// Miles
    Imperial,
}

impl UnitSystem {
    fn meters_per_unit(self) -> f64 {
        match self {
            UnitSystem::Metric => METERS_PER_KM,
            UnitSystem::Imperial => METERS_PER_MILE,
        }
    }

    /// Convert meters into this system's display unit.
    pub fn length(self, meters: f64) -> f64 {
        meters / self.meters_per_unit()
    }

    /// Convert a length in this system's display unit back to meters.
    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }

    pub fn unit_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }
}
