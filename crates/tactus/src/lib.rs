//! Tactus — platform-independent multi-touch gesture recognition.
//!
//! Tactus turns a stream of raw touch samples into gesture events (swipe,
//! pinch-zoom, rotate, long press, single and double tap) delivered to the
//! view that claimed them. It is a pure state machine: the host owns the
//! clock, the view tree, and the event loop, and drives the engine from its
//! input callbacks and a periodic idle tick.
//!
//! # Architecture
//!
//! - [`GestureInfo`]: one gesture candidate's touch set and tap bookkeeping
//! - [`recognizer`]: the per-kind state machines
//! - [`GestureRecognition`]: feeds touches to all recognizers and
//!   arbitrates, one transition per idle tick, which gesture may fire
//! - [`TouchInputState`]: hit-tests the view tree, assigns gesture
//!   ownership by priority, and relays events to the winning view through
//!   the [`ViewHost`] collaborator trait
//!
//! # Usage
//!
//! ```ignore
//! use tactus::{TouchInputState, ViewHost};
//! use tactus_core::{TouchSample, TouchPhase, TouchId, Point};
//!
//! let mut input = TouchInputState::new();
//!
//! // from the platform input callback:
//! input.on_touch_input(&mut host, &sample);
//!
//! // from a timer, every ~50 ms or better:
//! input.on_idle(&mut host, now_ms);
//!
//! // before detaching a view subtree:
//! input.view_removed(&mut host, view_id);
//! ```
//!
//! The engine is single-threaded by design; all calls must come from the
//! same thread that owns the view tree.

pub mod dispatcher;
pub mod info;
pub mod recognition;
pub mod recognizer;
pub mod view;

pub use dispatcher::{TouchInputState, MAX_ACTIVE_GESTURES};
pub use info::{GestureInfo, MAX_GESTURE_TOUCHES};
pub use recognition::{
    GestureId, GestureRecognition, Transition, MAX_RECOGNIZERS, MAX_RECOGNIZERS_PER_KIND,
};
pub use view::{ViewHost, ViewId};

// re-export the data model so hosts only need one dependency
pub use tactus_core::{
    GestureEvent, GestureEventArgs, GestureInterest, GestureKind, GesturePhase, Point, TouchId,
    TouchPhase, TouchSample, PRIORITY_HIGH, PRIORITY_HIGHEST, PRIORITY_LOW, PRIORITY_NORMAL,
};
