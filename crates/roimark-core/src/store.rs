//! Ordered shape collection with identity lookup.

use crate::shape::{Ellipse, ShapeId};
use serde::{Deserialize, Serialize};

/// Owns every shape record, in insertion order.
///
/// Insertion order is both the display z-order (back to front) and the
/// 1-based numbering order the host labels shapes with. The "changed"
/// signal is synchronous and caller-driven: every mutating call site emits
/// the matching repaint/resync effects immediately, with no batching and no
/// async dispatch.
///
/// Serializes transparently as the bare array of records, which is exactly
/// the export document format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeStore {
    shapes: Vec<Ellipse>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape at the top of the z-order.
    pub fn add(&mut self, shape: Ellipse) {
        self.shapes.push(shape);
    }

    /// Remove a shape. Unknown ids are a no-op, not an error.
    pub fn remove(&mut self, id: &ShapeId) -> Option<Ellipse> {
        let idx = self.shapes.iter().position(|s| &s.id == id)?;
        Some(self.shapes.remove(idx))
    }

    pub fn find(&self, id: &ShapeId) -> Option<&Ellipse> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    pub fn find_mut(&mut self, id: &ShapeId) -> Option<&mut Ellipse> {
        self.shapes.iter_mut().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.find(id).is_some()
    }

    /// Position in insertion order; the host's label for the shape is
    /// `index + 1`.
    pub fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| &s.id == id)
    }

    /// Shapes in insertion order (back to front).
    pub fn iter(&self) -> std::slice::Iter<'_, Ellipse> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Replace the whole collection (import path).
    pub fn replace_all(&mut self, shapes: Vec<Ellipse>) {
        self.shapes = shapes;
    }
}
