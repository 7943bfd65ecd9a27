use crate::{
    edit::state::EditSession,
    foundation::core::{Placement, Point},
};

/// Host redraw scheduling seam.
///
/// A visual host hooks this to its per-frame redraw callback; a headless
/// host substitutes a fixed-interval timer. The controller calls
/// [`FrameClock::request_frame`] at most once per pending provisional write,
/// and expects [`DragController::on_frame`] to be invoked when the frame
/// fires.
pub trait FrameClock {
    /// Ask the host to schedule one redraw.
    fn request_frame(&mut self);
}

/// View zoom for the editing surface. Separate from [`Placement`] and never
/// undoable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom(f64);

impl Zoom {
    /// Minimum zoom factor.
    pub const MIN: f64 = 0.2;
    /// Maximum zoom factor.
    pub const MAX: f64 = 2.0;
    /// Step used by [`Zoom::zoom_in`] / [`Zoom::zoom_out`].
    pub const STEP: f64 = 0.1;

    /// Zoom factor, always within `[MIN, MAX]`.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Set the factor, clamped to the valid range.
    pub fn set(&mut self, z: f64) {
        self.0 = if z.is_finite() {
            z.clamp(Self::MIN, Self::MAX)
        } else {
            1.0
        };
    }

    /// Increase by one step.
    pub fn zoom_in(&mut self) {
        self.set(self.0 + Self::STEP);
    }

    /// Decrease by one step.
    pub fn zoom_out(&mut self) {
        self.set(self.0 - Self::STEP);
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(1.0)
    }
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    start_placement: Placement,
    start_point: Point,
    pending: Option<Placement>,
}

/// Unifies mouse and touch input into drag gestures over the render surface.
///
/// Mid-gesture pointer moves write *provisional* placements directly to the
/// live state, coalesced to at most one write per host frame; the history
/// sees exactly one commit per gesture, on release. Hosts are responsible
/// for normalizing mouse and single-touch events into the same
/// down/move/up calls and for suppressing platform scroll/pan for the
/// duration of a drag.
#[derive(Debug, Default)]
pub struct DragController {
    gesture: Option<Gesture>,
    zoom: Zoom,
}

impl DragController {
    /// Fresh controller at zoom 1.0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view zoom.
    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    /// Mutable view zoom.
    pub fn zoom_mut(&mut self) -> &mut Zoom {
        &mut self.zoom
    }

    /// True while a gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Primary-button press or single-touch start over the render surface.
    ///
    /// Starts a gesture only when an image is loaded; snapshots the current
    /// placement and the initiating pointer coordinate.
    pub fn pointer_down(&mut self, session: &EditSession, at: Point) {
        if self.gesture.is_some() || session.state().source.is_none() {
            return;
        }
        self.gesture = Some(Gesture {
            start_placement: session.state().placement,
            start_point: at,
            pending: None,
        });
    }

    /// Pointer move (mouse or touch, normalized upstream).
    ///
    /// Computes the provisional placement and parks it in the single pending
    /// slot. A redraw is requested only when no write was already in flight,
    /// so arbitrarily fast pointer events never produce more than one state
    /// write per rendered frame; intermediate deltas are dropped.
    pub fn pointer_move(&mut self, at: Point, clock: &mut dyn FrameClock) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        let delta = (at - gesture.start_point) / self.zoom.get();
        let provisional = gesture.start_placement.offset_by(delta);
        if gesture.pending.replace(provisional).is_none() {
            clock.request_frame();
        }
    }

    /// Host frame callback: flush the pending provisional write, if any,
    /// directly into live state (bypassing history). Returns true when a
    /// write happened and the host should redraw.
    pub fn on_frame(&mut self, session: &mut EditSession) -> bool {
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        match gesture.pending.take() {
            Some(p) => {
                session.write_placement_provisional(p);
                true
            }
            None => false,
        }
    }

    /// Pointer release (mouse-up or touch-end/cancel): write the final
    /// provisional value and submit exactly one history commit capturing
    /// start-to-final. A zero-delta gesture still commits.
    pub fn pointer_up(&mut self, session: &mut EditSession, at: Point) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        let delta = (at - gesture.start_point) / self.zoom.get();
        let fin = gesture.start_placement.offset_by(delta);
        session.write_placement_provisional(fin);
        session.commit_placement_gesture(gesture.start_placement, fin);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/drag.rs"]
mod tests;
