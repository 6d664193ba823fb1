//! Ellipse shape records and their pixel-space geometry.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque stable identity of a shape.
///
/// Generated once at creation and never recomputed. Imported documents may
/// carry arbitrary id strings, which are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Mint a fresh id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ShapeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Shape discriminator. Ellipse is the only variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Ellipse,
}

/// An elliptical region of interest in image-relative unit space.
///
/// Center and radii are normalized to the rendered image size, so the shape
/// stays put across resizes. Radii are stored non-negative; the sign of any
/// incoming value is discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub id: ShapeId,
    #[serde(rename = "type", default)]
    pub kind: ShapeKind,
    /// Normalized center.
    pub nx: f64,
    pub ny: f64,
    /// Normalized radii.
    pub nrx: f64,
    pub nry: f64,
    /// Annotation choice from the host's vocabulary, or empty.
    #[serde(default)]
    pub option: String,
    /// Free-form annotation text, or empty.
    #[serde(default)]
    pub note: String,
}

impl Ellipse {
    /// Create a new ellipse with a fresh id and empty annotations.
    pub fn new(nx: f64, ny: f64, nrx: f64, nry: f64) -> Self {
        Self::reconstruct(
            ShapeId::generate(),
            nx,
            ny,
            nrx,
            nry,
            String::new(),
            String::new(),
        )
    }

    /// Rebuild an ellipse with a specific id (import path). Enforces the
    /// non-negative radius invariant.
    pub fn reconstruct(
        id: ShapeId,
        nx: f64,
        ny: f64,
        nrx: f64,
        nry: f64,
        option: String,
        note: String,
    ) -> Self {
        Self {
            id,
            kind: ShapeKind::Ellipse,
            nx,
            ny,
            nrx: nrx.abs(),
            nry: nry.abs(),
            option,
            note,
        }
    }
}

/// Pixel-space geometry of an ellipse under the current surface bounds.
///
/// This is what gets painted: the committed shapes after the forward
/// transform, and the draft guide while a draw gesture is in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseGeometry {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl EllipseGeometry {
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
        }
    }

    /// Interior hit test. Shapes render filled, so the whole interior
    /// counts as a hit.
    pub fn contains(&self, point: Point) -> bool {
        if self.radius_x <= 0.0 || self.radius_y <= 0.0 {
            return false;
        }
        let dx = (point.x - self.center.x) / self.radius_x;
        let dy = (point.y - self.center.y) / self.radius_y;
        dx * dx + dy * dy <= 1.0
    }

    /// View as a kurbo ellipse.
    pub fn to_kurbo(&self) -> kurbo::Ellipse {
        kurbo::Ellipse::new(self.center, (self.radius_x, self.radius_y), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let a = Ellipse::new(0.5, 0.5, 0.1, 0.1);
        let b = Ellipse::new(0.5, 0.5, 0.1, 0.1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_reconstruct_discards_radius_sign() {
        let shape = Ellipse::reconstruct(
            ShapeId::from("s1"),
            0.5,
            0.5,
            -0.25,
            -0.1,
            String::new(),
            String::new(),
        );
        assert!((shape.nrx - 0.25).abs() < f64::EPSILON);
        assert!((shape.nry - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serialized_field_names() {
        let shape = Ellipse::reconstruct(
            ShapeId::from("s1"),
            0.25,
            0.75,
            0.1,
            0.05,
            "lesion".to_string(),
            "check margins".to_string(),
        );
        let value = serde_json::to_value(&shape).unwrap();
        assert_eq!(value["id"], "s1");
        assert_eq!(value["type"], "ellipse");
        assert_eq!(value["nx"], 0.25);
        assert_eq!(value["ny"], 0.75);
        assert_eq!(value["nrx"], 0.1);
        assert_eq!(value["nry"], 0.05);
        assert_eq!(value["option"], "lesion");
        assert_eq!(value["note"], "check margins");
    }

    #[test]
    fn test_geometry_contains_center_and_edge() {
        let geom = EllipseGeometry::new(Point::new(50.0, 50.0), 30.0, 20.0);
        assert!(geom.contains(Point::new(50.0, 50.0)));
        assert!(geom.contains(Point::new(80.0, 50.0)));
        assert!(!geom.contains(Point::new(81.0, 50.0)));
        assert!(!geom.contains(Point::new(75.0, 68.0)));
    }

    #[test]
    fn test_degenerate_geometry_contains_nothing() {
        let geom = EllipseGeometry::new(Point::new(10.0, 10.0), 0.0, 5.0);
        assert!(!geom.contains(Point::new(10.0, 10.0)));
    }
}
