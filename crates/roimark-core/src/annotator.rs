//! Facade tying the store, normalizer, gesture engine, and selection
//! binder together behind the host-facing entry points.

use crate::event::Effect;
use crate::gesture::{GestureEngine, HitTarget, LongPressToken, PointerInput};
use crate::persist::{self, ImportError};
use crate::selection::SelectionBinder;
use crate::shape::{Ellipse, EllipseGeometry, ShapeId};
use crate::store::ShapeStore;
use crate::surface::SurfaceBounds;
use kurbo::Point;

/// One image-annotation session: the shapes, the selection, and the
/// gesture state machine, driven by host events.
///
/// Every entry point runs to completion synchronously and returns the
/// effects the host must apply, in order, before feeding the next event.
/// No I/O happens here; rendering, timers, clipboard, and image loading
/// all live on the other side of the [`Effect`] surface.
#[derive(Debug, Default)]
pub struct Annotator {
    store: ShapeStore,
    selection: SelectionBinder,
    gesture: GestureEngine,
    bounds: SurfaceBounds,
    image_ready: bool,
}

impl Annotator {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Collaborator signals in =====

    /// The image finished loading. Normalized coordinates are meaningful
    /// from here on and draw gestures are accepted.
    pub fn image_loaded(&mut self, bounds: SurfaceBounds) -> Vec<Effect> {
        self.image_ready = true;
        self.bounds = bounds;
        vec![Effect::RepaintAll]
    }

    /// The rendered image bounds changed (resize). Normalized fields are
    /// untouched; only the pixel mapping is new.
    pub fn set_bounds(&mut self, bounds: SurfaceBounds) -> Vec<Effect> {
        self.bounds = bounds;
        if self.image_ready {
            vec![Effect::RepaintAll]
        } else {
            Vec::new()
        }
    }

    // ===== Pointer events =====

    pub fn pointer_down(&mut self, input: PointerInput, target: HitTarget) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.gesture.pointer_down(
            input,
            target,
            self.image_ready,
            &self.bounds,
            &self.store,
            &mut self.selection,
            &mut effects,
        );
        effects
    }

    pub fn pointer_move(&mut self, input: PointerInput) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.gesture.pointer_move(
            input,
            &self.bounds,
            &mut self.store,
            &mut self.selection,
            &mut effects,
        );
        effects
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.gesture.pointer_up(
            input,
            &self.bounds,
            &mut self.store,
            &mut self.selection,
            &mut effects,
        );
        effects
    }

    pub fn pointer_cancel(&mut self, input: PointerInput) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.gesture.pointer_cancel(input, &mut effects);
        effects
    }

    /// Right-click (context menu) on a shape: immediate delete on any
    /// pointer type, unless that shape is mid-drag. The host suppresses
    /// the platform menu itself.
    pub fn context_menu(&mut self, id: &ShapeId) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.gesture.is_dragging_shape(id) || !self.store.contains(id) {
            return effects;
        }
        self.gesture.abort_shape(id, &mut effects);
        self.delete_shape(id, &mut effects);
        effects
    }

    /// Host timer callback for a scheduled long-press. Stale tokens are
    /// no-ops.
    pub fn long_press_fired(&mut self, token: LongPressToken) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(id) = self.gesture.long_press_fired(token, &mut effects) {
            self.delete_shape(&id, &mut effects);
        }
        effects
    }

    fn delete_shape(&mut self, id: &ShapeId, effects: &mut Vec<Effect>) {
        if self.store.remove(id).is_some() {
            self.selection.on_removed(id, effects);
            effects.push(Effect::RepaintAll);
            effects.push(Effect::ExportChanged);
        }
    }

    // ===== Editor panel =====

    /// Editor "option" changed. Silently discarded with no selection.
    pub fn set_option(&mut self, value: &str) -> Vec<Effect> {
        if self.selection.apply_option(&mut self.store, value) {
            vec![Effect::ExportChanged]
        } else {
            Vec::new()
        }
    }

    /// Editor "note" changed. Silently discarded with no selection.
    pub fn set_note(&mut self, value: &str) -> Vec<Effect> {
        if self.selection.apply_note(&mut self.store, value) {
            vec![Effect::ExportChanged]
        } else {
            Vec::new()
        }
    }

    // ===== Whole-document operations =====

    /// Remove every shape, drop the selection, and abort any gesture.
    pub fn clear_all(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.gesture.abort(&mut effects);
        self.store.clear();
        self.selection.clear(&mut effects);
        effects.push(Effect::RepaintAll);
        effects.push(Effect::ExportChanged);
        effects
    }

    /// Serialize the current store as pretty-printed JSON, on demand.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        persist::export(&self.store)
    }

    /// Replace the store from JSON text.
    ///
    /// Whitespace-only input is a no-op. A document that fails to parse
    /// (or is not an array) aborts wholesale: the store and selection stay
    /// untouched and the error carries the user-visible message. On
    /// success the store is replaced and the previous selection is
    /// restored when its id survived the import, else cleared.
    pub fn import_json(&mut self, text: &str) -> Result<Vec<Effect>, ImportError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let shapes = persist::import(text)?;
        let mut effects = Vec::new();
        self.gesture.abort(&mut effects);
        let previous = self.selection.selected_id().cloned();
        self.store.replace_all(shapes);
        effects.push(Effect::RepaintAll);
        effects.push(Effect::ExportChanged);
        match previous {
            Some(id) if self.store.contains(&id) => {
                self.selection.select(&id, &self.store, &mut effects);
            }
            _ => self.selection.clear(&mut effects),
        }
        Ok(effects)
    }

    // ===== Queries for the render host =====

    pub fn shapes(&self) -> impl Iterator<Item = &Ellipse> {
        self.store.iter()
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn bounds(&self) -> SurfaceBounds {
        self.bounds
    }

    pub fn is_image_ready(&self) -> bool {
        self.image_ready
    }

    pub fn selected_id(&self) -> Option<&ShapeId> {
        self.selection.selected_id()
    }

    pub fn selected(&self) -> Option<&Ellipse> {
        self.selection.selected_id().and_then(|id| self.store.find(id))
    }

    /// Draft guide geometry while a draw gesture is in flight.
    pub fn draft(&self) -> Option<EllipseGeometry> {
        self.gesture.draft()
    }

    /// Pixel geometry of a shape under the current bounds.
    pub fn geometry(&self, shape: &Ellipse) -> EllipseGeometry {
        self.bounds.ellipse_geometry(shape)
    }

    /// Front-to-back hit test over the current shapes, for hosts without
    /// retained hit-testing. `local` is in surface-local pixels.
    pub fn hit_test(&self, local: Point) -> Option<&ShapeId> {
        self.store
            .iter()
            .rev()
            .find(|s| self.bounds.ellipse_geometry(s).contains(local))
            .map(|s| &s.id)
    }
}
