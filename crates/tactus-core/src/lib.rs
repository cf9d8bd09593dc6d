//! Core data model for the Tactus gesture engine.
//!
//! This crate holds the value types shared between the platform layer that
//! produces touch input and the recognition engine that consumes it:
//!
//! - [`Point`]: 2D positions in device-independent units
//! - [`TouchSample`], [`TouchId`], [`TouchPhase`]: the canonical touch event
//! - [`GestureKind`], [`GesturePhase`], [`GestureEvent`], [`GestureInterest`]:
//!   the gesture vocabulary
//!
//! Everything here is a plain value type; the state machines live in the
//! `tactus` crate.

pub mod geometry;
pub mod gesture;
pub mod touch;

pub use geometry::Point;
pub use gesture::{
    GestureEvent, GestureEventArgs, GestureInterest, GestureKind, GesturePhase, PRIORITY_HIGH,
    PRIORITY_HIGHEST, PRIORITY_LOW, PRIORITY_NORMAL,
};
pub use touch::{TouchId, TouchPhase, TouchSample};
