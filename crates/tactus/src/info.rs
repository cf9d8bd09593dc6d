//! Per-gesture candidate bookkeeping.

use tactus_core::{GestureKind, TouchId};

/// The most touches a single gesture will track.
pub const MAX_GESTURE_TOUCHES: usize = 16;

/// Describes one in-progress gesture candidate: its kind, the touch IDs
/// currently contributing to it, and tap-count bookkeeping for double-tap
/// detection.
///
/// Invariants: `touch_ids` never contains duplicates, and `tap_count` only
/// increments through [`add_touch`](Self::add_touch) when the ID was not
/// already present.
#[derive(Debug, Clone)]
pub struct GestureInfo {
    kind: GestureKind,
    touch_ids: Vec<TouchId>,
    tap_count: u32,
}

impl GestureInfo {
    /// Create an empty candidate of the given kind.
    pub fn new(kind: GestureKind) -> Self {
        Self {
            kind,
            touch_ids: Vec::with_capacity(2),
            tap_count: 0,
        }
    }

    /// The gesture kind.
    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    /// The touch IDs currently contributing, in the order they were added.
    pub fn touch_ids(&self) -> &[TouchId] {
        &self.touch_ids
    }

    /// Number of taps accumulated. Only meaningful for the tap kinds.
    pub fn tap_count(&self) -> u32 {
        self.tap_count
    }

    /// Whether the given touch contributes to this gesture.
    pub fn contains_touch(&self, id: TouchId) -> bool {
        self.touch_ids.contains(&id)
    }

    /// Add a touch if it is not already tracked, incrementing the tap count.
    ///
    /// Returns whether the touch was newly added. A duplicate add or one past
    /// the per-gesture capacity is a no-op returning `false`.
    pub fn add_touch(&mut self, id: TouchId) -> bool {
        if self.touch_ids.contains(&id) || self.touch_ids.len() >= MAX_GESTURE_TOUCHES {
            return false;
        }
        self.touch_ids.push(id);
        self.tap_count += 1;
        true
    }

    /// Remove a touch. Returns whether it was tracked.
    pub fn remove_touch(&mut self, id: TouchId) -> bool {
        if let Some(index) = self.touch_ids.iter().position(|&t| t == id) {
            self.touch_ids.remove(index);
            true
        } else {
            false
        }
    }

    /// Whether this gesture is interested in the given touch.
    ///
    /// True for touches already tracked. A double tap additionally wants any
    /// touch while its tap count is at most 2, so a second contact with a
    /// different ID (another finger) can complete the pair.
    pub fn wants_touch(&self, id: TouchId) -> bool {
        if self.touch_ids.contains(&id) {
            return true;
        }
        self.kind == GestureKind::DoubleTap && self.tap_count <= 2
    }

    /// Whether the gesture has not yet reached its minimum touch count.
    ///
    /// A single tap needs its one touch only while no tap has been counted;
    /// afterwards it waits, touchless, for possible promotion past the
    /// double-tap window.
    pub fn needs_more_touches(&self) -> bool {
        if self.kind == GestureKind::SingleTap && self.tap_count > 0 {
            return false;
        }
        self.touch_ids.len() < self.kind.min_touches()
    }

    /// Whether the gesture can be torn down.
    ///
    /// True once no touches remain, except for a double tap that has not yet
    /// collected both taps: it must survive its own touch ending so a second
    /// tap can still arrive.
    pub fn can_remove(&self) -> bool {
        if !self.touch_ids.is_empty() {
            return false;
        }
        self.kind != GestureKind::DoubleTap || self.tap_count >= 2
    }

    /// See [`GestureKind::is_continuous`].
    pub fn is_continuous(&self) -> bool {
        self.kind.is_continuous()
    }

    /// See [`GestureKind::is_tap`].
    pub fn is_tap(&self) -> bool {
        self.kind.is_tap()
    }
}
