//! Mapping between viewport pixels and image-relative unit space.

use crate::shape::{Ellipse, EllipseGeometry};
use kurbo::Point;

/// Rendered bounds of the image surface, in viewport pixels.
///
/// The host recomputes these on every resize. A resize never touches a
/// shape's normalized fields; it only changes how they map back to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceBounds {
    /// Viewport position of the surface's top-left corner.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl SurfaceBounds {
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Bounds anchored at the viewport origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(Point::ZERO, width, height)
    }

    /// Convert a viewport point to surface-local pixels.
    pub fn to_local(&self, viewport: Point) -> Point {
        Point::new(viewport.x - self.origin.x, viewport.y - self.origin.y)
    }

    /// Normalize a surface-local x coordinate or horizontal length.
    /// Degenerate bounds yield 0 rather than dividing by zero.
    pub fn normalize_x(&self, x: f64) -> f64 {
        if self.width <= 0.0 { 0.0 } else { x / self.width }
    }

    /// Normalize a surface-local y coordinate or vertical length.
    pub fn normalize_y(&self, y: f64) -> f64 {
        if self.height <= 0.0 { 0.0 } else { y / self.height }
    }

    /// Normalize a surface-local point.
    pub fn normalize_point(&self, local: Point) -> (f64, f64) {
        (self.normalize_x(local.x), self.normalize_y(local.y))
    }

    /// Forward transform: pixel-space geometry of a shape under these
    /// bounds (`cx = nx*w`, `cy = ny*h`, `rx = |nrx|*w`, `ry = |nry|*h`).
    pub fn ellipse_geometry(&self, shape: &Ellipse) -> EllipseGeometry {
        EllipseGeometry::new(
            Point::new(shape.nx * self.width, shape.ny * self.height),
            shape.nrx.abs() * self.width,
            shape.nry.abs() * self.height,
        )
    }
}
