//! Latitude/longitude rectangles with antimeridian handling.
//!
//! A box whose `min_lng` is greater than its `max_lng` crosses the antimeridian:
//! it covers `[min_lng, 180]` and `(-180, max_lng]`. Longitudes are kept in (-180, 180],
//! except for the full band, which is `[-180, 180]`.

use serde::{Deserialize, Serialize};

use crate::geo_utils::{normalize_lng, GeoPoint};

/// Smallest latitude/longitude rectangle enclosing a set of points, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Default for GeoBoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl GeoBoundingBox {
    /// The empty box, identity element of [`union`](Self::union).
    pub const EMPTY: GeoBoundingBox = GeoBoundingBox {
        min_lat: 1.0,
        max_lat: -1.0,
        min_lng: 180.0,
        max_lng: -180.0,
    };

    /// Degenerate box holding a single point.
    pub fn from_point(point: GeoPoint) -> Self {
        let p = point.normalized();
        Self {
            min_lat: p.latitude,
            max_lat: p.latitude,
            min_lng: p.longitude,
            max_lng: p.longitude,
        }
    }

    /// Union of the degenerate boxes of all points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |acc, p| acc.union(&Self::from_point(*p)))
    }

    /// Box centered on `center` with the given full spans in degrees.
    ///
    /// Latitude is clipped to the poles. A longitude span of 360° or more gives the full band.
    pub fn from_center_and_span(center: GeoPoint, lat_span: f64, lng_span: f64) -> Self {
        let c = center.normalized();
        let half_lat = lat_span.abs() / 2.0;
        let half_lng = lng_span.abs() / 2.0;

        let (min_lng, max_lng) = if lng_span.abs() >= 360.0 {
            (-180.0, 180.0)
        } else {
            (
                normalize_lng(c.longitude - half_lng),
                normalize_lng(c.longitude + half_lng),
            )
        };

        Self {
            min_lat: (c.latitude - half_lat).max(-90.0),
            max_lat: (c.latitude + half_lat).min(90.0),
            min_lng,
            max_lng,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_lat > self.max_lat
    }

    /// True if the box crosses the antimeridian.
    pub fn is_inverted(&self) -> bool {
        self.min_lng > self.max_lng
    }

    pub fn is_full_lng(&self) -> bool {
        self.min_lng == -180.0 && self.max_lng == 180.0
    }

    pub fn lat_span(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_lat - self.min_lat
        }
    }

    /// Longitude extent in degrees, measured eastward from `min_lng` to `max_lng`.
    pub fn lng_span(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            positive_distance(self.min_lng, self.max_lng)
        }
    }

    /// Center of the box, or `None` for the empty box.
    pub fn center(&self) -> Option<GeoPoint> {
        if self.is_empty() {
            return None;
        }
        Some(GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            normalize_lng(self.min_lng + self.lng_span() / 2.0),
        ))
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        if self.is_empty() {
            return false;
        }
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && self.contains_lng(normalize_lng(point.longitude))
    }

    pub fn contains_box(&self, other: &GeoBoundingBox) -> bool {
        if other.is_empty() {
            return true;
        }
        if self.is_empty() {
            return false;
        }
        other.min_lat >= self.min_lat
            && other.max_lat <= self.max_lat
            && self.contains_lng_interval(other)
    }

    /// Smallest box containing both `self` and `other`.
    ///
    /// Longitudes are joined across whichever gap is shorter, so boxes on either
    /// side of the antimeridian join across it. When both gaps are equal the result
    /// with the smaller `min_lng` is taken, which keeps union commutative. Such ties
    /// make it non-associative: for points at 0°, 120° and -120° the grouping decides
    /// which 120° gap is left open. Every grouping still covers all inputs with the
    /// same span.
    pub fn union(&self, other: &GeoBoundingBox) -> GeoBoundingBox {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let (min_lng, max_lng) = self.union_lng(other);
        GeoBoundingBox {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lng,
            max_lng,
        }
    }

    fn contains_lng(&self, lng: f64) -> bool {
        if self.is_full_lng() {
            return true;
        }
        if self.is_inverted() {
            lng >= self.min_lng || lng <= self.max_lng
        } else {
            lng >= self.min_lng && lng <= self.max_lng
        }
    }

    fn contains_lng_interval(&self, other: &GeoBoundingBox) -> bool {
        if self.is_full_lng() {
            return true;
        }
        match (self.is_inverted(), other.is_inverted()) {
            (true, true) => other.min_lng >= self.min_lng && other.max_lng <= self.max_lng,
            (true, false) => other.min_lng >= self.min_lng || other.max_lng <= self.max_lng,
            (false, true) => false,
            (false, false) => other.min_lng >= self.min_lng && other.max_lng <= self.max_lng,
        }
    }

    fn union_lng(&self, other: &GeoBoundingBox) -> (f64, f64) {
        if self.contains_lng(other.min_lng) {
            if self.contains_lng(other.max_lng) {
                if self.contains_lng_interval(other) {
                    return (self.min_lng, self.max_lng);
                }
                return (-180.0, 180.0);
            }
            return (self.min_lng, other.max_lng);
        }
        if self.contains_lng(other.max_lng) {
            return (other.min_lng, self.max_lng);
        }
        if other.contains_lng(self.min_lng) {
            return (other.min_lng, other.max_lng);
        }

        // Disjoint: close the shorter of the two gaps.
        let west_gap = positive_distance(other.max_lng, self.min_lng);
        let east_gap = positive_distance(self.max_lng, other.min_lng);
        let west = (other.min_lng, self.max_lng);
        let east = (self.min_lng, other.max_lng);
        if west_gap < east_gap {
            west
        } else if east_gap < west_gap {
            east
        } else if west.0 <= east.0 {
            west
        } else {
            east
        }
    }
}

/// Eastward distance from `from` to `to` in [0, 360).
fn positive_distance(from: f64, to: f64) -> f64 {
    let d = to - from;
    if d >= 0.0 {
        d
    } else {
        d + 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> GeoBoundingBox {
        GeoBoundingBox {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    #[test]
    fn test_empty_is_identity() {
        let b = boxed(45.0, 46.0, 7.0, 8.0);
        assert!(GeoBoundingBox::EMPTY.is_empty());
        assert_eq!(b.union(&GeoBoundingBox::EMPTY), b);
        assert_eq!(GeoBoundingBox::EMPTY.union(&b), b);
        assert!(GeoBoundingBox::EMPTY
            .union(&GeoBoundingBox::EMPTY)
            .is_empty());
    }

    #[test]
    fn test_union_commutative_and_associative() {
        let a = boxed(45.0, 46.0, 7.0, 8.0);
        let b = boxed(44.0, 45.5, 9.0, 10.0);
        let c = boxed(47.0, 48.0, 6.0, 6.5);

        assert_eq!(a.union(&b), b.union(&a));
        assert_eq!(a.union(&c), c.union(&a));
        assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
        assert_eq!(a.union(&b).union(&c), boxed(44.0, 48.0, 6.0, 10.0));

        let a = boxed(0.0, 1.0, 170.0, 175.0);
        let b = boxed(2.0, 3.0, 178.0, -178.0);
        let c = boxed(-1.0, 0.0, -175.0, -170.0);
        let all = boxed(-1.0, 3.0, 170.0, -170.0);
        assert_eq!(a.union(&b).union(&c), all);
        assert_eq!(a.union(&b.union(&c)), all);
        assert_eq!(a.union(&c).union(&b), all);
        assert_eq!(c.union(&a), a.union(&c));
    }

    #[test]
    fn test_union_equal_gaps_still_covers_all() {
        let points = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 120.0),
            GeoPoint::new(0.0, -120.0),
        ];
        let [a, b, c] = points.map(GeoBoundingBox::from_point);

        // Three points 120° apart: the grouping picks which gap stays open
        let left = a.union(&b).union(&c);
        let right = a.union(&b.union(&c));
        assert_eq!(left, boxed(0.0, 0.0, -120.0, 120.0));
        assert_eq!(right, boxed(0.0, 0.0, 0.0, -120.0));
        for bbox in [left, right] {
            assert_eq!(bbox.lng_span(), 240.0);
            assert!(points.iter().all(|p| bbox.contains(p)));
        }
    }

    #[test]
    fn test_union_across_antimeridian() {
        let east = GeoBoundingBox::from_point(GeoPoint::new(10.0, 179.0));
        let west = GeoBoundingBox::from_point(GeoPoint::new(11.0, -179.0));

        let joined = east.union(&west);
        assert_eq!(joined, west.union(&east));
        assert!(joined.is_inverted());
        assert_eq!(joined.min_lng, 179.0);
        assert_eq!(joined.max_lng, -179.0);
        assert!((joined.lng_span() - 2.0).abs() < 1e-9);
        assert!(joined.contains(&GeoPoint::new(10.5, 180.0)));
        assert!(!joined.contains(&GeoPoint::new(10.5, 0.0)));
    }

    #[test]
    fn test_union_tie_is_commutative() {
        let a = boxed(0.0, 1.0, -10.0, 10.0);
        let b = boxed(0.0, 1.0, 170.0, -170.0);
        assert_eq!(a.union(&b), b.union(&a));
        assert!((a.union(&b).lng_span() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_union_overlapping_to_full() {
        let a = boxed(0.0, 1.0, -170.0, 170.0);
        let b = boxed(0.0, 1.0, 160.0, -160.0);
        let u = a.union(&b);
        assert!(u.is_full_lng());
        assert_eq!(u, b.union(&a));
    }

    #[test]
    fn test_from_points() {
        let points = vec![
            GeoPoint::new(51.50, -0.12),
            GeoPoint::new(51.52, -0.10),
            GeoPoint::new(51.49, -0.14),
        ];
        let b = GeoBoundingBox::from_points(&points);
        assert_eq!(b, boxed(51.49, 51.52, -0.14, -0.10));
        assert!(points.iter().all(|p| b.contains(p)));
        assert!(GeoBoundingBox::from_points(&Vec::<GeoPoint>::new()).is_empty());
    }

    #[test]
    fn test_from_center_and_span() {
        let b = GeoBoundingBox::from_center_and_span(GeoPoint::new(45.0, 7.0), 2.0, 4.0);
        assert_eq!(b, boxed(44.0, 46.0, 5.0, 9.0));
        let center = b.center().unwrap();
        assert!((center.latitude - 45.0).abs() < 1e-9);
        assert!((center.longitude - 7.0).abs() < 1e-9);

        let wrapped = GeoBoundingBox::from_center_and_span(GeoPoint::new(0.0, 179.0), 2.0, 4.0);
        assert!(wrapped.is_inverted());
        assert!((wrapped.lng_span() - 4.0).abs() < 1e-9);
        assert!(wrapped.contains(&GeoPoint::new(0.0, -179.5)));
        assert!(!wrapped.contains(&GeoPoint::new(0.0, -178.0)));

        let polar = GeoBoundingBox::from_center_and_span(GeoPoint::new(89.0, 0.0), 4.0, 720.0);
        assert_eq!(polar.max_lat, 90.0);
        assert!(polar.is_full_lng());
    }

    #[test]
    fn test_contains_box() {
        let outer = boxed(40.0, 50.0, 170.0, -170.0);
        assert!(outer.contains_box(&boxed(41.0, 42.0, 175.0, 178.0)));
        assert!(outer.contains_box(&boxed(41.0, 42.0, 175.0, -175.0)));
        assert!(!outer.contains_box(&boxed(41.0, 42.0, 0.0, 1.0)));
        assert!(outer.contains_box(&GeoBoundingBox::EMPTY));
        assert!(!GeoBoundingBox::EMPTY.contains_box(&outer));
    }
}
