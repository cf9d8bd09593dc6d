//! Gesture kinds, lifecycle phases, and the event payloads delivered to
//! views.
//!
//! The gesture type set is closed by design: the engine arbitrates between
//! exactly these six kinds and there is no plugin extensibility. Code that
//! needs per-kind behavior matches on [`GestureKind`] directly.

use crate::geometry::Point;

/// Lowest gesture claim priority.
pub const PRIORITY_LOW: i32 = 0;
/// Default gesture claim priority.
pub const PRIORITY_NORMAL: i32 = 1;
/// Boosted priority, e.g. for a control's main scroll axis.
pub const PRIORITY_HIGH: i32 = 2;
/// Reserved for views that must win over everything else.
pub const PRIORITY_HIGHEST: i32 = 3;

/// The kind of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// One finger dragging; reports velocity.
    Swipe,
    /// Two fingers pinching; reports a distance ratio.
    Zoom,
    /// Two fingers rotating; reports an angle delta.
    Rotate,
    /// One finger held in place past a configurable delay.
    LongPress,
    /// One quick tap.
    SingleTap,
    /// Two taps in quick succession at (nearly) the same spot.
    DoubleTap,
}

impl GestureKind {
    /// All kinds, in arbitration-relevant order.
    pub const ALL: [GestureKind; 6] = [
        GestureKind::Swipe,
        GestureKind::Zoom,
        GestureKind::Rotate,
        GestureKind::LongPress,
        GestureKind::SingleTap,
        GestureKind::DoubleTap,
    ];

    /// Continuous gestures report a live `Changed` stream between `Began`
    /// and `Ended`; tap gestures are single-shot.
    pub fn is_continuous(self) -> bool {
        !self.is_tap()
    }

    /// Whether this is one of the two tap kinds.
    pub fn is_tap(self) -> bool {
        matches!(self, Self::SingleTap | Self::DoubleTap)
    }

    /// The minimum number of simultaneous touches the gesture needs.
    pub fn min_touches(self) -> usize {
        match self {
            Self::Zoom | Self::Rotate | Self::DoubleTap => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Swipe => "Swipe",
            Self::Zoom => "Zoom",
            Self::Rotate => "Rotate",
            Self::LongPress => "LongPress",
            Self::SingleTap => "Tap",
            Self::DoubleTap => "Double Tap",
        };
        f.write_str(name)
    }
}

/// Lifecycle phase of a gesture.
///
/// The normal progression is `Possible → Began → Changed* → Ended`, with an
/// escape to `Failed` while still in `Possible`. Phases are carried next to
/// the kind, never folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// Candidate; recognition criteria not yet met.
    Possible,
    /// Criteria met, gesture is starting.
    Began,
    /// Continuous gesture updated.
    Changed,
    /// Gesture finished.
    Ended,
    /// Criteria can no longer be met.
    Failed,
}

/// The gesture-specific output parameters of a recognizer.
///
/// The amounts are neutral (1.0) unless the kind defines them: Swipe reports
/// velocity in units/second per axis, Zoom the current/initial distance
/// ratio on both axes, Rotate the angle delta in radians on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEventArgs {
    pub center: Point,
    pub amount_x: f32,
    pub amount_y: f32,
}

impl GestureEventArgs {
    /// Args with a center and neutral amounts.
    pub const fn new(center: Point) -> Self {
        Self {
            center,
            amount_x: 1.0,
            amount_y: 1.0,
        }
    }

    /// Args with explicit amounts.
    pub const fn with_amounts(center: Point, amount_x: f32, amount_y: f32) -> Self {
        Self {
            center,
            amount_x,
            amount_y,
        }
    }
}

impl Default for GestureEventArgs {
    fn default() -> Self {
        Self::new(Point::ZERO)
    }
}

/// A gesture event as delivered to a view's gesture-input handler.
///
/// `position` is in the receiving view's local coordinate space, rounded to
/// whole units. `user_data` is the opaque value the view attached to its
/// [`GestureInterest`] when it claimed the gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub phase: GesturePhase,
    pub position: Point,
    pub amount_x: f32,
    pub amount_y: f32,
    pub user_data: u64,
}

/// A view's claim on a gesture kind at a hit-tested point.
///
/// Returned from the view capability query. `priority` decides ownership
/// when several views along the hit chain want the same kind; a strictly
/// greater value takes the gesture over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureInterest {
    pub kind: GestureKind,
    pub priority: i32,
    pub user_data: u64,
}

impl GestureInterest {
    /// An interest at [`PRIORITY_NORMAL`] with no user data.
    pub const fn new(kind: GestureKind) -> Self {
        Self {
            kind,
            priority: PRIORITY_NORMAL,
            user_data: 0,
        }
    }

    /// An interest with an explicit priority.
    pub const fn with_priority(kind: GestureKind, priority: i32) -> Self {
        Self {
            kind,
            priority,
            user_data: 0,
        }
    }

    /// Attach an opaque value that is passed back in every delivered event.
    pub const fn with_user_data(mut self, user_data: u64) -> Self {
        self.user_data = user_data;
        self
    }
}
