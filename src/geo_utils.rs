//! Geographic utilities: points, great-circle distance and longitude wraparound.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used for haversine distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic coordinate in degrees.
///
/// # Example
/// ```
/// use track_poster::GeoPoint;
/// let point = GeoPoint::new(51.5074, -0.1278); // London
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Same point with latitude clamped to the poles and longitude wrapped into (-180, 180].
    pub fn normalized(&self) -> Self {
        Self {
            latitude: self.latitude.clamp(-90.0, 90.0),
            longitude: normalize_lng(self.longitude),
        }
    }

    /// Absolute latitude and longitude separation in degrees.
    ///
    /// The longitude part takes the short way around, so 179° and -179° are 2° apart.
    pub fn angular_distance_to(&self, other: &GeoPoint) -> (f64, f64) {
        (
            (self.latitude - other.latitude).abs(),
            lng_delta(self.longitude, other.longitude).abs(),
        )
    }
}

/// Wrap a longitude into (-180, 180].
pub fn normalize_lng(lng: f64) -> f64 {
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Signed shortest longitude difference `to - from`, in (-180, 180].
pub fn lng_delta(from: f64, to: f64) -> f64 {
    normalize_lng(to - from)
}

/// Great-circle distance between two points in meters.
pub fn haversine_distance(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let dlat = (p2.latitude - p1.latitude).to_radians();
    let dlng = (p2.longitude - p1.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Total length of a polyline in meters.
pub fn polyline_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_validation() {
        assert!(GeoPoint::new(51.5074, -0.1278).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_normalize_lng() {
        assert_eq!(normalize_lng(0.0), 0.0);
        assert_eq!(normalize_lng(180.0), 180.0);
        assert_eq!(normalize_lng(-180.0), 180.0);
        assert!((normalize_lng(190.0) - (-170.0)).abs() < 1e-9);
        assert!((normalize_lng(-190.0) - 170.0).abs() < 1e-9);
        assert!((normalize_lng(540.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_distance() {
        let east = GeoPoint::new(0.0, 179.0);
        let west = GeoPoint::new(0.0, -179.0);
        let (dlat, dlng) = east.angular_distance_to(&west);
        assert_eq!(dlat, 0.0);
        assert!((dlng - 2.0).abs() < 1e-9);
        assert!((lng_delta(179.0, -179.0) - 2.0).abs() < 1e-9);
        assert!((lng_delta(-179.0, 179.0) + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_distance() {
        let london = GeoPoint::new(51.5074, -0.1278);
        let paris = GeoPoint::new(48.8566, 2.3522);
        let d = haversine_distance(&london, &paris);
        assert!((d - 343_500.0).abs() < 2_000.0);
    }

    #[test]
    fn test_polyline_length() {
        // 0.001° of latitude is about 111m
        let line: Vec<GeoPoint> = (0..11)
            .map(|i| GeoPoint::new(45.0 + i as f64 * 0.001, 7.0))
            .collect();
        let len = polyline_length(&line);
        assert!((len - 1112.0).abs() < 5.0);
        assert_eq!(polyline_length(&line[..1]), 0.0);
    }
}
