//! Single-shape selection and its binding to the external editor panel.

use crate::event::Effect;
use crate::shape::ShapeId;
use crate::store::ShapeStore;

/// Keeps at most one shape selected and mirrors its annotation fields to
/// the host's editor widget.
///
/// Holds the selected id only; the store keeps sole ownership of the
/// record.
#[derive(Debug, Clone, Default)]
pub struct SelectionBinder {
    selected: Option<ShapeId>,
}

impl SelectionBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&ShapeId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &ShapeId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Select a shape and push its fields to the editor. Selecting an
    /// unknown id clears instead of leaving a dangling selection.
    pub fn select(&mut self, id: &ShapeId, store: &ShapeStore, effects: &mut Vec<Effect>) {
        match store.find(id) {
            Some(shape) => {
                self.selected = Some(shape.id.clone());
                effects.push(Effect::SelectionChanged(self.selected.clone()));
                effects.push(Effect::EditorPopulate {
                    option: shape.option.clone(),
                    note: shape.note.clone(),
                });
            }
            None => self.clear(effects),
        }
    }

    /// Drop the selection and hide the editor.
    pub fn clear(&mut self, effects: &mut Vec<Effect>) {
        self.selected = None;
        effects.push(Effect::SelectionChanged(None));
        effects.push(Effect::EditorClear);
    }

    /// Re-push the selected shape's current fields after a store mutation,
    /// so the editor never shows stale values. Clears if the shape is gone.
    pub fn resync(&mut self, store: &ShapeStore, effects: &mut Vec<Effect>) {
        let Some(id) = &self.selected else {
            return;
        };
        match store.find(id) {
            Some(shape) => effects.push(Effect::EditorPopulate {
                option: shape.option.clone(),
                note: shape.note.clone(),
            }),
            None => self.clear(effects),
        }
    }

    /// Deletion hook: clear the selection if this shape was selected.
    pub fn on_removed(&mut self, id: &ShapeId, effects: &mut Vec<Effect>) {
        if self.is_selected(id) {
            self.clear(effects);
        }
    }

    /// Editor "option" edit. Writes through to the selected shape; with no
    /// selection the edit is discarded silently. Returns whether a shape
    /// was written.
    pub fn apply_option(&self, store: &mut ShapeStore, value: &str) -> bool {
        match self.selected.as_ref().and_then(|id| store.find_mut(id)) {
            Some(shape) => {
                shape.option = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Editor "note" edit; same write-through rules as [`apply_option`].
    ///
    /// [`apply_option`]: SelectionBinder::apply_option
    pub fn apply_note(&self, store: &mut ShapeStore, value: &str) -> bool {
        match self.selected.as_ref().and_then(|id| store.find_mut(id)) {
            Some(shape) => {
                shape.note = value.to_string();
                true
            }
            None => false,
        }
    }
}
