//! The canonical touch sample model.
//!
//! The platform layer translates native input (pointer messages, motion
//! events, TUIO bundles, …) into [`TouchSample`] values and feeds them to the
//! engine. A sample is immutable once constructed; the engine never writes
//! back into it.

use static_assertions::assert_impl_all;

use crate::geometry::Point;

/// Identifies one continuous finger or pointer contact.
///
/// The value is stable from touch-down through every move until touch-up;
/// after that the platform is free to reuse it for a new contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchId(pub u64);

impl std::fmt::Display for TouchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The phase of a touch sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// Contact went down.
    Began,
    /// Contact moved while down.
    Moved,
    /// Contact lifted.
    Ended,
    /// A hovering pointer entered the surface (no contact).
    Entered,
    /// A hovering pointer moved (no contact).
    Hovered,
    /// The pointer left the surface.
    Left,
    /// The platform took the contact away (palm rejection, OS gesture).
    Cancelled,
}

impl TouchPhase {
    /// Whether this phase terminates the contact.
    pub fn is_ending(self) -> bool {
        matches!(self, Self::Ended | Self::Left | Self::Cancelled)
    }

    /// Whether this phase describes a hovering (contact-less) pointer.
    pub fn is_hover(self) -> bool {
        matches!(self, Self::Entered | Self::Hovered)
    }
}

/// One observed contact point.
///
/// `position` is in the root view's coordinate space, device-independent
/// units. `timestamp_ms` is a caller-supplied monotonic millisecond clock;
/// the engine only ever compares timestamps, it never reads a clock itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub phase: TouchPhase,
    pub id: TouchId,
    pub position: Point,
    pub timestamp_ms: u64,
}

impl TouchSample {
    /// Create a new touch sample.
    pub const fn new(phase: TouchPhase, id: TouchId, position: Point, timestamp_ms: u64) -> Self {
        Self {
            phase,
            id,
            position,
            timestamp_ms,
        }
    }
}

assert_impl_all!(TouchSample: Copy, Send, Sync);
