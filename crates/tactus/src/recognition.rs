//! The gesture arbitration engine.
//!
//! [`GestureRecognition`] owns the live touch list and the active recognizer
//! set. It feeds every touch event to all recognizers and decides, on each
//! idle tick, which single recognizer may fire an externally visible
//! transition, applying the priority and mutual-suppression rules between
//! competing gesture kinds (a tap yields to a long press, single-touch
//! gestures yield to a pinch once a second finger lands, a finished tap
//! waits out the double-tap window).
//!
//! The engine reports transitions by return value rather than through a sink
//! callback: [`process_idle`](GestureRecognition::process_idle) returns at
//! most one [`Transition`] per call, and the touch-ingestion entry points
//! return the transitions their implicit idle pass produced. A caller that
//! needs every pending transition flushed keeps calling until `None`.

use slotmap::new_key_type;
use static_assertions::assert_impl_all;
use tactus_core::{GestureEventArgs, GestureKind, GesturePhase, TouchId, TouchSample};

use crate::recognizer::{Recognizer, MAX_TIME_DOUBLE_TAP_MS};

new_key_type! {
    /// Handle to a dispatcher-owned gesture. The engine never dereferences
    /// it; it only hands it back in transitions.
    pub struct GestureId;
}

/// Total recognizer capacity.
pub const MAX_RECOGNIZERS: usize = 64;

/// Recognizer capacity per gesture kind.
pub const MAX_RECOGNIZERS_PER_KIND: usize = 16;

const TARGET: &str = "tactus::recognition";

/// One externally visible gesture state transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub gesture: GestureId,
    pub kind: GestureKind,
    pub phase: GesturePhase,
    pub args: GestureEventArgs,
}

/// Which gesture kinds currently have a live recognizer; used as
/// suppression signals during arbitration.
#[derive(Debug, Default, Clone, Copy)]
struct ActiveKinds {
    swipe: bool,
    zoom: bool,
    rotate: bool,
    long_press: bool,
    double_tap: bool,
}

/// The arbitration engine. See the module docs.
#[derive(Debug, Default)]
pub struct GestureRecognition {
    touches: Vec<TouchSample>,
    recognizers: Vec<Recognizer>,
    long_press_delay_ms: u64,
}

impl GestureRecognition {
    pub fn new() -> Self {
        Self {
            touches: Vec::new(),
            recognizers: Vec::new(),
            long_press_delay_ms: 500,
        }
    }

    /// Minimum hold time before a long press may fire. Default 500 ms.
    pub fn set_long_press_delay(&mut self, delay_ms: u64) {
        self.long_press_delay_ms = delay_ms;
    }

    /// Number of live recognizers.
    pub fn recognizer_count(&self) -> usize {
        self.recognizers.len()
    }

    /// Number of live contacts.
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Allocate a recognizer for the gesture. A no-op when the total or
    /// per-kind capacity is exhausted; that gesture kind simply goes
    /// unrecognized for this interaction.
    pub fn start_recognizing(&mut self, gesture: GestureId, kind: GestureKind) {
        if self.recognizers.len() >= MAX_RECOGNIZERS
            || self
                .recognizers
                .iter()
                .filter(|r| r.kind() == kind)
                .count()
                >= MAX_RECOGNIZERS_PER_KIND
        {
            tracing::debug!(target: TARGET, %kind, "recognizer capacity exhausted");
            return;
        }
        let mut recognizer = Recognizer::new(gesture, kind);
        if kind == GestureKind::LongPress {
            recognizer.set_minimum_time(self.long_press_delay_ms);
        }
        tracing::trace!(target: TARGET, %kind, "start recognizing");
        self.recognizers.push(recognizer);
    }

    /// Release the recognizer bound to the gesture, if any.
    pub fn stop_recognizing(&mut self, gesture: GestureId) {
        if let Some(index) = self.recognizers.iter().position(|r| r.gesture() == gesture) {
            let recognizer = self.recognizers.remove(index);
            tracing::trace!(target: TARGET, kind = %recognizer.kind(), "stop recognizing");
        }
    }

    /// Whether a recognizer is bound to the gesture.
    pub fn is_recognizing(&self, gesture: GestureId) -> bool {
        self.recognizers.iter().any(|r| r.gesture() == gesture)
    }

    /// A contact went down. Feeds every recognizer, then runs one idle pass
    /// so instantaneous transitions (a rotation acquiring its second finger)
    /// report without waiting for a timer tick.
    pub fn on_touch_began(&mut self, touch: &TouchSample) -> Option<Transition> {
        for recognizer in &mut self.recognizers {
            recognizer.add_touch(touch);
        }
        if !self.touches.iter().any(|t| t.id == touch.id) {
            self.touches.push(*touch);
        }
        self.process_idle(touch.timestamp_ms)
    }

    /// A contact moved. Continuous gestures report every move, not just on
    /// idle ticks, so this may produce several `Changed` transitions.
    pub fn on_touch_changed(&mut self, touch: &TouchSample) -> Vec<Transition> {
        for recognizer in &mut self.recognizers {
            recognizer.change_touch(touch);
        }

        let mut transitions = Vec::new();
        for recognizer in &mut self.recognizers {
            if recognizer.contains_touch(touch.id)
                && recognizer.internal() == GesturePhase::Changed
            {
                recognizer.set_external(GesturePhase::Changed);
                transitions.push(Transition {
                    gesture: recognizer.gesture(),
                    kind: recognizer.kind(),
                    phase: GesturePhase::Changed,
                    args: recognizer.event_args(),
                });
            }
        }
        transitions
    }

    /// A contact lifted.
    pub fn on_touch_ended(&mut self, touch: &TouchSample) -> Option<Transition> {
        for recognizer in &mut self.recognizers {
            recognizer.remove_touch(touch);
        }
        self.touches.retain(|t| t.id != touch.id);
        self.process_idle(touch.timestamp_ms)
    }

    fn active_kinds(&self) -> ActiveKinds {
        let mut kinds = ActiveKinds::default();
        for recognizer in &self.recognizers {
            match recognizer.kind() {
                GestureKind::Swipe => kinds.swipe = true,
                GestureKind::Zoom => kinds.zoom = true,
                GestureKind::Rotate => kinds.rotate = true,
                GestureKind::LongPress => kinds.long_press = true,
                GestureKind::DoubleTap => {
                    if recognizer.internal() != GesturePhase::Failed {
                        kinds.double_tap = true;
                    }
                }
                GestureKind::SingleTap => {}
            }
        }
        kinds
    }

    /// Run one arbitration pass, reporting at most one transition.
    ///
    /// Called periodically by the host (through the dispatcher's `on_idle`)
    /// and after every touch-down/up; time-gated transitions (long press,
    /// the single-tap grace period, the double-tap window) resolve here even
    /// without new touch input.
    pub fn process_idle(&mut self, now_ms: u64) -> Option<Transition> {
        let active = self.active_kinds();
        let current_touches = self.touches.len();

        let mut index = 0;
        while index < self.recognizers.len() {
            let recognizer = &self.recognizers[index];
            let kind = recognizer.kind();
            let state = recognizer.internal();
            let ignore_timing = kind == GestureKind::SingleTap
                && !active.swipe
                && !active.zoom
                && !active.rotate
                && !active.long_press
                && !active.double_tap;

            // a single-shot gesture must never sit at Changed
            if !kind.is_continuous() && state == GesturePhase::Changed {
                let recognizer = &mut self.recognizers[index];
                recognizer.set_external(GesturePhase::Possible);
                return Some(Self::report(recognizer, GesturePhase::Ended));
            }

            if state == GesturePhase::Began
                && (ignore_timing || recognizer.minimum_time_elapsed(now_ms))
            {
                if kind == GestureKind::SingleTap && active.long_press {
                    index += 1;
                    continue;
                }
                if kind == GestureKind::Swipe && active.zoom && current_touches > 1 {
                    index += 1;
                    continue;
                }
                if kind == GestureKind::LongPress && active.zoom && current_touches > 1 {
                    index += 1;
                    continue;
                }
                let recognizer = &mut self.recognizers[index];
                recognizer.set_external(if kind.is_continuous() {
                    GesturePhase::Changed
                } else {
                    GesturePhase::Ended
                });
                return Some(Self::report(recognizer, GesturePhase::Began));
            }

            if state == GesturePhase::Ended {
                if kind == GestureKind::SingleTap
                    && recognizer.external() == GesturePhase::Possible
                {
                    let window_expired = now_ms.saturating_sub(recognizer.time_started())
                        > MAX_TIME_DOUBLE_TAP_MS;
                    if !active.double_tap || window_expired {
                        // When a single tap fires, any still-armed long press
                        // must be cancelled, or it goes off later while the
                        // tap's action (say, a popup with its own run loop)
                        // is in progress.
                        if let Some(lp) = self
                            .recognizers
                            .iter()
                            .position(|r| r.kind() == GestureKind::LongPress)
                        {
                            self.recognizers.remove(lp);
                            if lp < index {
                                index -= 1;
                            }
                        }
                        let recognizer = &mut self.recognizers[index];
                        recognizer.set_external(GesturePhase::Changed);
                        return Some(Self::report(recognizer, GesturePhase::Began));
                    }
                } else if recognizer.external() != GesturePhase::Ended {
                    let recognizer = &mut self.recognizers[index];
                    recognizer.set_external(GesturePhase::Possible);
                    return Some(Self::report(recognizer, GesturePhase::Ended));
                }
            }

            index += 1;
        }
        None
    }

    fn report(recognizer: &mut Recognizer, phase: GesturePhase) -> Transition {
        let transition = Transition {
            gesture: recognizer.gesture(),
            kind: recognizer.kind(),
            phase,
            args: recognizer.event_args(),
        };
        tracing::trace!(
            target: TARGET,
            kind = %transition.kind,
            ?phase,
            "transition"
        );
        transition
    }
}

// single-threaded by design; ownership may still move between threads
assert_impl_all!(GestureRecognition: Send);
