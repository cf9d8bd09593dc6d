//! The view-tree capability interface the dispatcher consumes.
//!
//! The engine does not own a view tree. The host supplies one behind
//! [`ViewHost`], addressed by [`ViewId`] handles, and the dispatcher asks it
//! three kinds of questions: where things are (hit-testing and coordinate
//! conversion), what gestures a view wants at a point, and where to deliver
//! finalized touch and gesture events.
//!
//! `ViewId` is a `slotmap` key type, so hosts that keep their views in a
//! slotmap can use their own keys directly; any other storage can mint
//! handles from a side table.

use slotmap::new_key_type;
use tactus_core::{GestureEvent, GestureInterest, Point, TouchSample};

new_key_type! {
    /// Handle to a host-owned view.
    pub struct ViewId;
}

/// The view-tree collaborator contract.
///
/// All positions handed to queries are in the queried view's local
/// coordinate space; the dispatcher performs the parent-to-child offsets
/// itself during hit-testing using [`child_offset`](Self::child_offset).
/// Delivery positions are converted with
/// [`root_to_local`](Self::root_to_local) at delivery time, so views may
/// move while a gesture is in flight.
pub trait ViewHost {
    /// The root view; the fallback direct-touch handler.
    fn root(&self) -> ViewId;

    /// Children of `view`, topmost-drawn first.
    fn children_topmost_first(&self, view: ViewId) -> Vec<ViewId>;

    /// Whether the view accepts input.
    fn is_enabled(&self, view: ViewId) -> bool;

    /// Whether `local` lies inside the view's bounds.
    fn contains(&self, view: ViewId, local: Point) -> bool;

    /// The view's origin within its parent's coordinate space.
    fn child_offset(&self, view: ViewId) -> Point;

    /// Whether `view` is a (transitive) child of `ancestor`.
    fn is_descendant(&self, view: ViewId, ancestor: ViewId) -> bool;

    /// Append the gestures this view wants to claim at `local`.
    fn handled_gestures(&self, view: ViewId, local: Point, out: &mut Vec<GestureInterest>);

    /// Convert a root-space point into the view's local space.
    fn root_to_local(&self, view: ViewId, point: Point) -> Point;

    /// Direct (non-gesture) touch delivery. `event.position` is local.
    fn on_touch_input(&mut self, view: ViewId, event: &TouchSample);

    /// Gesture delivery. `event.position` is local and rounded.
    fn on_gesture_input(&mut self, view: ViewId, event: &GestureEvent);
}
