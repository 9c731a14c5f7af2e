//! Mapping geographic point sequences onto the canvas.
//!
//! Longitude maps to `x` and latitude to `y` (inverted), both linear, with one
//! scale factor for both axes so shapes are not distorted. The bounding box is
//! centered in the target rectangle.

use crate::bbox::GeoBoundingBox;
use crate::geo_utils::{lng_delta, GeoPoint};
use crate::xy::Xy;

/// Canvas placement of a bounding box.
#[derive(Debug, Clone, Copy)]
struct Frame {
    center: GeoPoint,
    origin: Xy,
    /// Canvas units per degree; `None` when the box has no extent on some axis.
    scale: Option<f64>,
}

impl Frame {
    fn new(bbox: &GeoBoundingBox, size: Xy, offset: Xy) -> Self {
        let origin = offset + 0.5 * size;
        let lat_span = bbox.lat_span();
        let lng_span = bbox.lng_span();

        let scale = if bbox.is_empty() || lat_span <= 0.0 || lng_span <= 0.0 {
            None
        } else {
            Some((size.x / lng_span).min(size.y / lat_span))
        };

        Self {
            center: bbox.center().unwrap_or(GeoPoint::new(0.0, 0.0)),
            origin,
            scale,
        }
    }

    fn to_canvas(&self, point: &GeoPoint) -> Xy {
        match self.scale {
            Some(scale) => {
                let dx = lng_delta(self.center.longitude, point.longitude);
                let dy = point.latitude - self.center.latitude;
                self.origin + Xy::new(dx * scale, -dy * scale)
            }
            None => self.origin,
        }
    }
}

/// Project point sequences into the `size` rectangle at `offset`.
///
/// Returns one canvas sequence per input sequence, point for point. A box with
/// zero latitude or longitude span maps every point to the center of the rectangle.
///
/// # Example
/// ```
/// use track_poster::{project, GeoBoundingBox, GeoPoint, Xy};
///
/// let line = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 2.0)];
/// let bbox = GeoBoundingBox::from_points(&line);
/// let out = project(&bbox, Xy::new(200.0, 200.0), Xy::new(0.0, 0.0), &[line]);
/// assert_eq!(out[0][0], Xy::new(0.0, 150.0));
/// assert_eq!(out[0][1], Xy::new(200.0, 50.0));
/// ```
pub fn project<L: AsRef<[GeoPoint]>>(
    bbox: &GeoBoundingBox,
    size: Xy,
    offset: Xy,
    lines: &[L],
) -> Vec<Vec<Xy>> {
    let frame = Frame::new(bbox, size, offset);
    lines
        .iter()
        .map(|line| line.as_ref().iter().map(|p| frame.to_canvas(p)).collect())
        .collect()
}

/// Like [`project`], but only keeps points inside `bbox`.
///
/// A sequence that leaves the box is split there, so the output may hold more
/// (or fewer) sequences than the input. Empty pieces are dropped.
pub fn project_clipped<L: AsRef<[GeoPoint]>>(
    bbox: &GeoBoundingBox,
    size: Xy,
    offset: Xy,
    lines: &[L],
) -> Vec<Vec<Xy>> {
    let frame = Frame::new(bbox, size, offset);
    let mut result = Vec::new();

    for line in lines {
        let mut current = Vec::new();
        for point in line.as_ref() {
            if bbox.contains(point) {
                current.push(frame.to_canvas(point));
            } else if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            result.push(current);
        }
    }

    result
}
