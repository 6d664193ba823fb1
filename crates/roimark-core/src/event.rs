//! Effects the core emits toward its collaborators.

use crate::gesture::{LongPressToken, PointerId};
use crate::shape::{EllipseGeometry, ShapeId};

/// One outbound signal from a state transition.
///
/// Entry points return these in order; the host applies them synchronously
/// before feeding the next input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The shape set changed; repaint the whole overlay.
    RepaintAll,
    /// Only this shape's geometry changed.
    RepaintShape(ShapeId),
    /// The draft guide changed; `None` removes it.
    DraftChanged(Option<EllipseGeometry>),
    /// A different shape (or none) is selected; restyle accordingly.
    SelectionChanged(Option<ShapeId>),
    /// Show the editor panel populated with the selected shape's fields.
    EditorPopulate { option: String, note: String },
    /// Clear and hide the editor panel.
    EditorClear,
    /// Route subsequent events of this pointer to the active gesture.
    CapturePointer(PointerId),
    /// Release a capture taken by `CapturePointer`.
    ReleasePointer(PointerId),
    /// Start a cancellable timer; call `Annotator::long_press_fired` with
    /// the token once `delay_ms` milliseconds have elapsed.
    ScheduleLongPress { token: LongPressToken, delay_ms: u64 },
    /// Discard the timer for this token, if still pending.
    CancelLongPress(LongPressToken),
    /// The serialized document is stale; refresh any JSON view.
    ExportChanged,
}
