//! Pointer gesture classification: draw, select, drag, long-press delete.

use crate::event::Effect;
use crate::selection::SelectionBinder;
use crate::shape::{Ellipse, EllipseGeometry, ShapeId};
use crate::store::ShapeStore;
use crate::surface::SurfaceBounds;
use kurbo::Point;

/// Displacement (px) below which a pointer-down on a shape stays a tap.
pub const MOVE_THRESHOLD: f64 = 6.0;
/// Hold duration (ms) for a touch/pen long-press delete.
pub const LONG_PRESS_MS: u64 = 600;
/// Minimum committed pixel radius; a draw ending smaller on either axis is
/// discarded as an accidental click.
pub const MIN_COMMIT_RADIUS: f64 = 4.0;
/// Floor applied to draft radii while rubber-banding.
pub const MIN_DRAFT_RADIUS: f64 = 0.5;

/// Host-assigned pointer identity, stable for the lifetime of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub i64);

/// Input device class of a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Long-press delete is offered on direct-manipulation pointers only.
    pub fn supports_long_press(self) -> bool {
        matches!(self, PointerKind::Touch | PointerKind::Pen)
    }
}

/// One pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub pointer: PointerId,
    pub kind: PointerKind,
    /// Viewport-space position.
    pub position: Point,
    /// Aspect-constraining modifier (Shift) held.
    pub shift: bool,
}

/// What the pointer landed on, per the host's hit-testing. A hit shape
/// always wins over starting a draw on the canvas underneath it.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    /// Empty canvas.
    Canvas,
    /// An existing shape.
    Shape(ShapeId),
}

/// Identifies one scheduled long-press timer.
///
/// Tokens are never reused. Cancellation and firing race on the host's
/// event loop, so a fire whose token no longer matches the armed gesture is
/// simply ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LongPressToken(u64);

/// A draw gesture in flight. The draft is not a committed shape; it only
/// becomes one on a large-enough pointer-up.
#[derive(Debug, Clone)]
struct DrawState {
    pointer: PointerId,
    /// Anchor in surface-local pixels.
    anchor: Point,
    /// Current rubber-band geometry in surface-local pixels.
    draft: EllipseGeometry,
}

/// A gesture armed on an existing shape, pending classification as tap,
/// drag, or (touch/pen) long-press delete.
#[derive(Debug, Clone)]
struct ShapeGesture {
    id: ShapeId,
    pointer: PointerId,
    /// Viewport position at pointer-down.
    start: Point,
    /// Most recent viewport position.
    last: Point,
    /// Normalized center when the gesture armed.
    start_nx: f64,
    start_ny: f64,
    moved: bool,
    dragging: bool,
    long_press: Option<LongPressToken>,
}

#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Drawing(DrawState),
    Shape(ShapeGesture),
}

/// Turns raw pointer input into shape-create / select / drag / delete
/// operations against the store.
///
/// Exactly one gesture is in flight at a time: pointer-downs during an
/// active gesture are ignored, and move/up/cancel events are matched
/// against the owning pointer id. All bookkeeping lives here in an explicit
/// in-flight record keyed by shape id — never on render objects.
#[derive(Debug, Default)]
pub struct GestureEngine {
    state: Gesture,
    next_token: u64,
}

impl GestureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, Gesture::Idle)
    }

    /// Current draft guide geometry, if a draw is in flight.
    pub fn draft(&self) -> Option<EllipseGeometry> {
        match &self.state {
            Gesture::Drawing(draw) => Some(draw.draft),
            _ => None,
        }
    }

    /// Whether this shape is mid-drag (which blocks context-menu deletion).
    pub fn is_dragging_shape(&self, id: &ShapeId) -> bool {
        matches!(&self.state, Gesture::Shape(g) if g.dragging && &g.id == id)
    }

    fn take_token(&mut self) -> LongPressToken {
        self.next_token += 1;
        LongPressToken(self.next_token)
    }

    fn owns_pointer(&self, pointer: PointerId) -> bool {
        match &self.state {
            Gesture::Idle => false,
            Gesture::Drawing(draw) => draw.pointer == pointer,
            Gesture::Shape(g) => g.pointer == pointer,
        }
    }

    /// `Idle` pointer-down entry. Landing on a shape arms it; landing on
    /// empty canvas drops the selection and, once the image is ready, also
    /// starts a draw with the same gesture.
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_down(
        &mut self,
        input: PointerInput,
        target: HitTarget,
        image_ready: bool,
        bounds: &SurfaceBounds,
        store: &ShapeStore,
        selection: &mut SelectionBinder,
        effects: &mut Vec<Effect>,
    ) {
        if !self.is_idle() {
            return;
        }
        match target {
            HitTarget::Shape(id) => self.arm_shape(input, id, store, selection, effects),
            HitTarget::Canvas => {
                selection.clear(effects);
                if image_ready {
                    self.begin_draw(input, bounds, effects);
                }
            }
        }
    }

    fn begin_draw(&mut self, input: PointerInput, bounds: &SurfaceBounds, effects: &mut Vec<Effect>) {
        let anchor = bounds.to_local(input.position);
        let draft = EllipseGeometry::new(anchor, 0.0, 0.0);
        self.state = Gesture::Drawing(DrawState {
            pointer: input.pointer,
            anchor,
            draft,
        });
        effects.push(Effect::CapturePointer(input.pointer));
        effects.push(Effect::DraftChanged(Some(draft)));
    }

    fn arm_shape(
        &mut self,
        input: PointerInput,
        id: ShapeId,
        store: &ShapeStore,
        selection: &mut SelectionBinder,
        effects: &mut Vec<Effect>,
    ) {
        let Some(shape) = store.find(&id) else {
            // Host hit-test raced a deletion; nothing to arm.
            return;
        };
        let (start_nx, start_ny) = (shape.nx, shape.ny);
        effects.push(Effect::CapturePointer(input.pointer));
        selection.select(&id, store, effects);
        let long_press = if input.kind.supports_long_press() {
            let token = self.take_token();
            effects.push(Effect::ScheduleLongPress {
                token,
                delay_ms: LONG_PRESS_MS,
            });
            Some(token)
        } else {
            None
        };
        self.state = Gesture::Shape(ShapeGesture {
            id,
            pointer: input.pointer,
            start: input.position,
            last: input.position,
            start_nx,
            start_ny,
            moved: false,
            dragging: false,
            long_press,
        });
    }

    /// Drive the active gesture. Events from other pointers are no-ops.
    pub fn pointer_move(
        &mut self,
        input: PointerInput,
        bounds: &SurfaceBounds,
        store: &mut ShapeStore,
        selection: &mut SelectionBinder,
        effects: &mut Vec<Effect>,
    ) {
        match &mut self.state {
            Gesture::Idle => {}
            Gesture::Drawing(draw) => {
                if draw.pointer != input.pointer {
                    return;
                }
                draw.draft = rubber_band(draw.anchor, bounds.to_local(input.position), input.shift);
                effects.push(Effect::DraftChanged(Some(draw.draft)));
            }
            Gesture::Shape(gesture) => {
                if gesture.pointer != input.pointer {
                    return;
                }
                gesture.last = input.position;
                if !gesture.moved
                    && displacement_sq(gesture.start, input.position)
                        >= MOVE_THRESHOLD * MOVE_THRESHOLD
                {
                    gesture.moved = true;
                    gesture.dragging = true;
                    // A confirmed move is not a delete gesture.
                    if let Some(token) = gesture.long_press.take() {
                        effects.push(Effect::CancelLongPress(token));
                    }
                }
                if gesture.dragging {
                    let Some(shape) = store.find_mut(&gesture.id) else {
                        return;
                    };
                    let dx = input.position.x - gesture.start.x;
                    let dy = input.position.y - gesture.start.y;
                    shape.nx = clamp01(gesture.start_nx + bounds.normalize_x(dx));
                    shape.ny = clamp01(gesture.start_ny + bounds.normalize_y(dy));
                    effects.push(Effect::RepaintShape(gesture.id.clone()));
                    effects.push(Effect::ExportChanged);
                    selection.resync(store, effects);
                }
            }
        }
    }

    /// Finish the active gesture: commit or discard a draw, or end a
    /// tap/drag on a shape. Selection stays open either way.
    pub fn pointer_up(
        &mut self,
        input: PointerInput,
        bounds: &SurfaceBounds,
        store: &mut ShapeStore,
        selection: &mut SelectionBinder,
        effects: &mut Vec<Effect>,
    ) {
        if !self.owns_pointer(input.pointer) {
            return;
        }
        match std::mem::take(&mut self.state) {
            Gesture::Idle => {}
            Gesture::Drawing(draw) => {
                effects.push(Effect::ReleasePointer(draw.pointer));
                effects.push(Effect::DraftChanged(None));
                commit_draw(&draw, bounds, store, selection, effects);
            }
            Gesture::Shape(gesture) => {
                if let Some(token) = gesture.long_press {
                    effects.push(Effect::CancelLongPress(token));
                }
                effects.push(Effect::ReleasePointer(gesture.pointer));
            }
        }
    }

    /// Abort on pointercancel. Dragged shapes keep their last mutated
    /// position; cancel does not revert.
    pub fn pointer_cancel(&mut self, input: PointerInput, effects: &mut Vec<Effect>) {
        if !self.owns_pointer(input.pointer) {
            return;
        }
        self.abort(effects);
    }

    /// Tear down whatever gesture is in flight: release capture, cancel the
    /// timer, drop the draft.
    pub fn abort(&mut self, effects: &mut Vec<Effect>) {
        match std::mem::take(&mut self.state) {
            Gesture::Idle => {}
            Gesture::Drawing(draw) => {
                effects.push(Effect::DraftChanged(None));
                effects.push(Effect::ReleasePointer(draw.pointer));
            }
            Gesture::Shape(gesture) => {
                if let Some(token) = gesture.long_press {
                    effects.push(Effect::CancelLongPress(token));
                }
                effects.push(Effect::ReleasePointer(gesture.pointer));
            }
        }
    }

    /// Tear down the gesture if it is armed on this shape — used when the
    /// shape is deleted by a path outside the gesture (context menu,
    /// clear-all, import).
    pub fn abort_shape(&mut self, id: &ShapeId, effects: &mut Vec<Effect>) {
        if matches!(&self.state, Gesture::Shape(g) if &g.id == id) {
            self.abort(effects);
        }
    }

    /// Host timer callback. Re-validates before acting: the gesture must
    /// still be armed under this exact token with cumulative displacement
    /// under threshold. Returns the shape to delete, if the press held.
    pub fn long_press_fired(
        &mut self,
        token: LongPressToken,
        effects: &mut Vec<Effect>,
    ) -> Option<ShapeId> {
        let Gesture::Shape(gesture) = &self.state else {
            return None;
        };
        if gesture.long_press != Some(token) || gesture.moved {
            return None;
        }
        if displacement_sq(gesture.start, gesture.last) >= MOVE_THRESHOLD * MOVE_THRESHOLD {
            return None;
        }
        let id = gesture.id.clone();
        let pointer = gesture.pointer;
        self.state = Gesture::Idle;
        effects.push(Effect::ReleasePointer(pointer));
        log::debug!("long-press delete: {id}");
        Some(id)
    }
}

/// Commit a finished draw: discard accidental clicks, otherwise normalize
/// the draft, add the shape, and select it (which opens the editor).
fn commit_draw(
    draw: &DrawState,
    bounds: &SurfaceBounds,
    store: &mut ShapeStore,
    selection: &mut SelectionBinder,
    effects: &mut Vec<Effect>,
) {
    let EllipseGeometry {
        center,
        radius_x,
        radius_y,
    } = draw.draft;
    if radius_x < MIN_COMMIT_RADIUS || radius_y < MIN_COMMIT_RADIUS {
        return;
    }
    let shape = Ellipse::new(
        bounds.normalize_x(center.x),
        bounds.normalize_y(center.y),
        bounds.normalize_x(radius_x),
        bounds.normalize_y(radius_y),
    );
    let id = shape.id.clone();
    log::debug!("draw committed: {id} ({radius_x:.1}x{radius_y:.1}px)");
    store.add(shape);
    effects.push(Effect::RepaintAll);
    selection.select(&id, store, effects);
    effects.push(Effect::ExportChanged);
}

/// Midpoint/half-delta rubber-banding with optional square constraint.
fn rubber_band(anchor: Point, current: Point, constrain: bool) -> EllipseGeometry {
    let center = Point::new((anchor.x + current.x) / 2.0, (anchor.y + current.y) / 2.0);
    let mut rx = (current.x - anchor.x).abs() / 2.0;
    let mut ry = (current.y - anchor.y).abs() / 2.0;
    if constrain {
        let r = rx.min(ry);
        rx = r;
        ry = r;
    }
    EllipseGeometry::new(center, rx.max(MIN_DRAFT_RADIUS), ry.max(MIN_DRAFT_RADIUS))
}

fn displacement_sq(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

pub(crate) fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rubber_band_midpoint_and_half_delta() {
        let geom = rubber_band(Point::new(10.0, 20.0), Point::new(110.0, 80.0), false);
        assert!((geom.center.x - 60.0).abs() < f64::EPSILON);
        assert!((geom.center.y - 50.0).abs() < f64::EPSILON);
        assert!((geom.radius_x - 50.0).abs() < f64::EPSILON);
        assert!((geom.radius_y - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rubber_band_direction_independent() {
        let geom = rubber_band(Point::new(110.0, 80.0), Point::new(10.0, 20.0), false);
        assert!((geom.radius_x - 50.0).abs() < f64::EPSILON);
        assert!((geom.radius_y - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rubber_band_shift_constrains_to_min_radius() {
        let geom = rubber_band(Point::new(0.0, 0.0), Point::new(100.0, 40.0), true);
        assert!((geom.radius_x - 20.0).abs() < f64::EPSILON);
        assert!((geom.radius_y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rubber_band_floors_tiny_radii() {
        let geom = rubber_band(Point::new(50.0, 50.0), Point::new(50.2, 50.0), false);
        assert!((geom.radius_x - MIN_DRAFT_RADIUS).abs() < f64::EPSILON);
        assert!((geom.radius_y - MIN_DRAFT_RADIUS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp01() {
        assert!((clamp01(-0.5)).abs() < f64::EPSILON);
        assert!((clamp01(1.5) - 1.0).abs() < f64::EPSILON);
        assert!((clamp01(0.25) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_long_press_support_by_pointer_kind() {
        assert!(!PointerKind::Mouse.supports_long_press());
        assert!(PointerKind::Touch.supports_long_press());
        assert!(PointerKind::Pen.supports_long_press());
    }
}
