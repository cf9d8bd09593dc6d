//! Per-kind gesture recognizer state machines.
//!
//! Each recognizer consumes touch add/change/remove events for one gesture
//! candidate and advances an internal lifecycle:
//! `Possible → Began → Changed* → Ended`, escaping to `Failed` if the
//! recognition criteria cannot be met. The *external* state tracks what has
//! actually been reported to the gesture sink; internal and external diverge
//! because competing recognizers are arbitrated by
//! [`GestureRecognition`](crate::recognition::GestureRecognition) and only
//! one transition goes external per idle tick.
//!
//! The gesture type set is closed, so per-kind behavior is a plain sum type
//! rather than trait objects.

use tactus_core::{GestureEventArgs, GestureKind, GesturePhase, Point, TouchId, TouchSample};

use crate::recognition::GestureId;

/// A second tap must arrive within this many milliseconds of the first.
pub const MAX_TIME_DOUBLE_TAP_MS: u64 = 500;

/// A second tap must land within this Chebyshev distance of the first.
pub const MAX_DIST_DOUBLE_TAP: f32 = 50.0;

/// Displacement on either axis before a swipe leaves `Possible`.
const SWIPE_MARGIN: f32 = 10.0;

/// Axis movement below this between two samples is treated as jitter.
const SWIPE_JITTER: f32 = 1.0;

/// If the recent position history stayed inside this tolerance of the
/// release point, the released drag reports zero velocity on that axis.
const SWIPE_REST_TOLERANCE: f32 = 4.0;

/// How many recent positions a swipe keeps for the rest check.
const SWIPE_HISTORY: usize = 3;

/// Deviation of the distance ratio from 1.0 before a zoom begins.
const ZOOM_MARGIN: f32 = 0.05;

/// Angle margin before a rotation re-arms out of `Possible`, in radians.
const ROTATE_MARGIN: f32 = std::f32::consts::PI / 180.0 * 5.0;

/// Default minimum hold time before a single tap may go external. The delay
/// gives a second tap the chance to be recognized as a double tap instead.
const SINGLE_TAP_MINIMUM_TIME_MS: u64 = 200;

/// Swipe-specific state: velocity tracking and a short position history.
#[derive(Debug, Default)]
struct SwipeDetail {
    last_point: Point,
    last_point_time: u64,
    velocity: Point,
    history: Vec<Point>,
    history_index: usize,
}

/// Zoom-specific state. Center and amount are cached so the terminal report
/// after a finger lifts reuses the last computed values.
#[derive(Debug)]
struct ZoomDetail {
    initial_distance: f32,
    center: Point,
    amount: f32,
}

impl Default for ZoomDetail {
    fn default() -> Self {
        Self {
            initial_distance: 0.0,
            center: Point::ZERO,
            amount: 1.0,
        }
    }
}

#[derive(Debug, Default)]
struct RotateDetail {
    initial_angle: f32,
}

#[derive(Debug, Default)]
struct DoubleTapDetail {
    taps: u32,
}

/// Per-kind private state.
#[derive(Debug)]
enum Detail {
    Swipe(SwipeDetail),
    Zoom(ZoomDetail),
    Rotate(RotateDetail),
    LongPress,
    SingleTap,
    DoubleTap(DoubleTapDetail),
}

impl Detail {
    fn for_kind(kind: GestureKind) -> Self {
        match kind {
            GestureKind::Swipe => Self::Swipe(SwipeDetail::default()),
            GestureKind::Zoom => Self::Zoom(ZoomDetail::default()),
            GestureKind::Rotate => Self::Rotate(RotateDetail::default()),
            GestureKind::LongPress => Self::LongPress,
            GestureKind::SingleTap => Self::SingleTap,
            GestureKind::DoubleTap => Self::DoubleTap(DoubleTapDetail::default()),
        }
    }
}

/// One recognizer, bound to one gesture candidate.
#[derive(Debug)]
pub struct Recognizer {
    gesture: GestureId,
    kind: GestureKind,
    touches: Vec<TouchSample>,
    internal: GesturePhase,
    external: GesturePhase,
    minimum_time_ms: u64,
    time_started_ms: u64,
    detail: Detail,
}

impl Recognizer {
    pub fn new(gesture: GestureId, kind: GestureKind) -> Self {
        let minimum_time_ms = match kind {
            GestureKind::SingleTap => SINGLE_TAP_MINIMUM_TIME_MS,
            _ => 0,
        };
        Self {
            gesture,
            kind,
            touches: Vec::with_capacity(2),
            internal: GesturePhase::Possible,
            external: GesturePhase::Possible,
            minimum_time_ms,
            time_started_ms: 0,
            detail: Detail::for_kind(kind),
        }
    }

    pub fn gesture(&self) -> GestureId {
        self.gesture
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn internal(&self) -> GesturePhase {
        self.internal
    }

    pub fn external(&self) -> GesturePhase {
        self.external
    }

    /// Force both states, used when the arbitration engine accepts a
    /// transition for external reporting.
    pub fn set_external(&mut self, phase: GesturePhase) {
        self.external = phase;
        self.internal = phase;
    }

    pub fn set_minimum_time(&mut self, ms: u64) {
        self.minimum_time_ms = ms;
    }

    pub fn time_started(&self) -> u64 {
        self.time_started_ms
    }

    pub fn minimum_time_elapsed(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.time_started_ms) > self.minimum_time_ms
    }

    pub fn contains_touch(&self, id: TouchId) -> bool {
        self.touches.iter().any(|t| t.id == id)
    }

    /// Centroid of the tracked touches.
    fn center(&self) -> Point {
        match self.touches.len() {
            0 => Point::ZERO,
            1 => self.touches[0].position,
            n => {
                let mut center = Point::ZERO;
                for touch in &self.touches {
                    center += touch.position;
                }
                center * (1.0 / n as f32)
            }
        }
    }

    fn base_add(&mut self, touch: &TouchSample) -> bool {
        if self.contains_touch(touch.id) {
            return false;
        }
        self.touches.push(*touch);
        true
    }

    fn base_change(&mut self, touch: &TouchSample) -> bool {
        for stored in &mut self.touches {
            if stored.id == touch.id {
                *stored = *touch;
                return true;
            }
        }
        false
    }

    fn base_remove(&mut self, id: TouchId) -> bool {
        if let Some(index) = self.touches.iter().position(|t| t.id == id) {
            self.touches.remove(index);
            true
        } else {
            false
        }
    }

    /// Offer a new touch. Returns whether the recognizer took it.
    pub fn add_touch(&mut self, touch: &TouchSample) -> bool {
        match self.kind {
            GestureKind::Swipe => self.swipe_add(touch),
            GestureKind::Zoom => self.zoom_add(touch),
            GestureKind::Rotate => self.rotate_add(touch),
            GestureKind::LongPress | GestureKind::SingleTap => self.press_add(touch),
            GestureKind::DoubleTap => self.double_tap_add(touch),
        }
    }

    /// Feed an updated sample for a tracked touch. Returns relevance.
    pub fn change_touch(&mut self, touch: &TouchSample) -> bool {
        match self.kind {
            GestureKind::Swipe => self.swipe_change(touch),
            GestureKind::Zoom => self.zoom_change(touch),
            GestureKind::Rotate => self.rotate_change(touch),
            GestureKind::LongPress | GestureKind::SingleTap => self.press_change(touch),
            GestureKind::DoubleTap => self.base_change(touch),
        }
    }

    /// A tracked touch lifted. Returns relevance.
    pub fn remove_touch(&mut self, touch: &TouchSample) -> bool {
        match self.kind {
            GestureKind::Swipe => self.swipe_remove(touch),
            GestureKind::Zoom => self.zoom_remove(touch),
            GestureKind::Rotate => self.rotate_remove(touch),
            GestureKind::LongPress => self.long_press_remove(touch),
            GestureKind::SingleTap => self.single_tap_remove(touch),
            GestureKind::DoubleTap => self.double_tap_remove(touch),
        }
    }

    /// The gesture-specific output parameters in their current state.
    pub fn event_args(&mut self) -> GestureEventArgs {
        match &mut self.detail {
            Detail::Swipe(swipe) => {
                let velocity = swipe.velocity;
                GestureEventArgs::with_amounts(self.center(), velocity.x, velocity.y)
            }
            Detail::Zoom(zoom) => {
                if self.touches.len() == 2 && zoom.initial_distance != 0.0 {
                    zoom.amount = self.touches[0].position.distance(self.touches[1].position)
                        / zoom.initial_distance;
                    // recompute lazily; an Ended report reuses the cache
                    let mut center = Point::ZERO;
                    for touch in &self.touches {
                        center += touch.position;
                    }
                    zoom.center = center * 0.5;
                }
                GestureEventArgs::with_amounts(zoom.center, zoom.amount, zoom.amount)
            }
            Detail::Rotate(rotate) => {
                if self.touches.len() == 2 {
                    let delta = self.touches[0].position.angle_to(self.touches[1].position)
                        - rotate.initial_angle;
                    GestureEventArgs::with_amounts(self.center(), delta, delta)
                } else {
                    GestureEventArgs::new(self.center())
                }
            }
            Detail::LongPress | Detail::SingleTap | Detail::DoubleTap(_) => {
                GestureEventArgs::new(self.center())
            }
        }
    }

    // --- Swipe -----------------------------------------------------------

    fn swipe_add(&mut self, touch: &TouchSample) -> bool {
        if !self.touches.is_empty() || self.internal != GesturePhase::Possible {
            return false;
        }
        self.base_add(touch);
        let Detail::Swipe(swipe) = &mut self.detail else {
            return false;
        };
        swipe.last_point = touch.position;
        swipe.last_point_time = touch.timestamp_ms;
        swipe.history.clear();
        swipe.history_index = 0;
        swipe.velocity = Point::ZERO;
        true
    }

    fn swipe_change(&mut self, touch: &TouchSample) -> bool {
        if !self.base_change(touch) {
            return false;
        }
        let external = self.external;
        let Detail::Swipe(swipe) = &mut self.detail else {
            return false;
        };

        if self.internal == GesturePhase::Possible {
            let moved_x = (touch.position.x - swipe.last_point.x).abs() > SWIPE_MARGIN;
            let moved_y = (touch.position.y - swipe.last_point.y).abs() > SWIPE_MARGIN;
            if moved_x || moved_y {
                self.internal = GesturePhase::Began;
                self.time_started_ms = touch.timestamp_ms;
            }
        } else if self.internal == GesturePhase::Began && external == GesturePhase::Began {
            self.internal = GesturePhase::Changed;
        }

        if self.internal != GesturePhase::Possible {
            let delta_t = touch.timestamp_ms.saturating_sub(swipe.last_point_time);
            let delta_p = touch.position - swipe.last_point;
            if delta_t != 0 {
                swipe.velocity = delta_p * (1000.0 / delta_t as f32);
                if delta_p.x.abs() < SWIPE_JITTER {
                    swipe.velocity.x = 0.0;
                }
                if delta_p.y.abs() < SWIPE_JITTER {
                    swipe.velocity.y = 0.0;
                }
            }

            // keep a short ring of recent positions
            if swipe.history.len() < SWIPE_HISTORY {
                swipe.history.push(touch.position);
            } else {
                if swipe.history_index >= SWIPE_HISTORY {
                    swipe.history_index = 0;
                }
                swipe.history[swipe.history_index] = touch.position;
                swipe.history_index += 1;
            }

            swipe.last_point = touch.position;
            swipe.last_point_time = touch.timestamp_ms;
        }
        true
    }

    fn swipe_remove(&mut self, touch: &TouchSample) -> bool {
        if !self.contains_touch(touch.id) {
            return false;
        }
        self.internal = if self.external != GesturePhase::Possible {
            GesturePhase::Ended
        } else {
            GesturePhase::Failed
        };

        let Detail::Swipe(swipe) = &mut self.detail else {
            return false;
        };

        // a drag that came to rest must not report a residual fling
        let mut moved_x = false;
        let mut moved_y = false;
        for p in &swipe.history {
            if (touch.position.x - p.x).abs() > SWIPE_REST_TOLERANCE {
                moved_x = true;
            }
            if (touch.position.y - p.y).abs() > SWIPE_REST_TOLERANCE {
                moved_y = true;
            }
        }
        if !moved_x {
            swipe.velocity.x = 0.0;
        }
        if !moved_y {
            swipe.velocity.y = 0.0;
        }

        swipe.last_point = Point::ZERO;
        swipe.last_point_time = 0;
        self.time_started_ms = 0;
        true
    }

    // --- Zoom ------------------------------------------------------------

    fn zoom_add(&mut self, touch: &TouchSample) -> bool {
        let mut result = false;
        if self.touches.len() < 2 {
            result = self.base_add(touch);
            let center = self.center();
            if let Detail::Zoom(zoom) = &mut self.detail {
                zoom.center = center;
                zoom.amount = 1.0;
            }
        }
        if self.touches.len() == 2
            && let Detail::Zoom(zoom) = &mut self.detail
        {
            zoom.initial_distance = self.touches[0].position.distance(self.touches[1].position);
        }
        result
    }

    fn zoom_change(&mut self, touch: &TouchSample) -> bool {
        if !self.base_change(touch) {
            return false;
        }
        if self.touches.len() == 2
            && self.internal == GesturePhase::Possible
            && let Detail::Zoom(zoom) = &self.detail
            && zoom.initial_distance != 0.0
        {
            let ratio = self.touches[0].position.distance(self.touches[1].position)
                / zoom.initial_distance;
            if (1.0 - ratio).abs() > ZOOM_MARGIN {
                self.internal = GesturePhase::Began;
                self.time_started_ms = touch.timestamp_ms;
            }
        }
        if self.internal == GesturePhase::Began && self.external == GesturePhase::Began {
            self.internal = GesturePhase::Changed;
        }
        true
    }

    fn zoom_remove(&mut self, touch: &TouchSample) -> bool {
        let result = self.base_remove(touch.id);
        if result && self.touches.len() == 1 {
            if let Detail::Zoom(zoom) = &mut self.detail {
                zoom.initial_distance = 0.0;
            }
            self.time_started_ms = 0;
            if self.external != GesturePhase::Possible {
                self.internal = GesturePhase::Ended;
            }
        }
        result
    }

    // --- Rotate ----------------------------------------------------------

    fn rotate_add(&mut self, touch: &TouchSample) -> bool {
        let mut result = false;
        if self.touches.len() < 2 {
            result = self.base_add(touch);
        }
        if self.touches.len() == 2 {
            let angle = self.touches[0].position.angle_to(self.touches[1].position);
            if let Detail::Rotate(rotate) = &mut self.detail {
                rotate.initial_angle = angle;
            }
            self.internal = GesturePhase::Began;
            self.time_started_ms = touch.timestamp_ms;
        }
        result
    }

    fn rotate_change(&mut self, touch: &TouchSample) -> bool {
        if !self.base_change(touch) {
            return false;
        }
        if self.touches.len() == 2
            && self.internal == GesturePhase::Possible
            && let Detail::Rotate(rotate) = &self.detail
        {
            let angle = self.touches[0].position.angle_to(self.touches[1].position);
            if (angle - rotate.initial_angle).abs() > ROTATE_MARGIN {
                self.internal = GesturePhase::Began;
                self.time_started_ms = touch.timestamp_ms;
            }
        }
        if self.internal == GesturePhase::Began && self.external == GesturePhase::Began {
            self.internal = GesturePhase::Changed;
        }
        true
    }

    fn rotate_remove(&mut self, touch: &TouchSample) -> bool {
        let result = self.base_remove(touch.id);
        if result && self.touches.len() == 1 {
            if let Detail::Rotate(rotate) = &mut self.detail {
                rotate.initial_angle = 0.0;
            }
            self.time_started_ms = 0;
            if self.external != GesturePhase::Possible {
                self.internal = GesturePhase::Ended;
            }
        }
        result
    }

    // --- LongPress / SingleTap -------------------------------------------

    fn press_add(&mut self, touch: &TouchSample) -> bool {
        if !self.touches.is_empty() || self.internal != GesturePhase::Possible {
            return false;
        }
        self.base_add(touch);
        self.internal = GesturePhase::Began;
        self.time_started_ms = touch.timestamp_ms;
        true
    }

    fn press_change(&mut self, touch: &TouchSample) -> bool {
        let result = self.base_change(touch);
        if result
            && self.internal == GesturePhase::Began
            && self.external == GesturePhase::Began
        {
            self.internal = GesturePhase::Changed;
        }
        result
    }

    fn long_press_remove(&mut self, touch: &TouchSample) -> bool {
        let result = self.contains_touch(touch.id);
        if result && self.external != GesturePhase::Possible {
            self.internal = GesturePhase::Ended;
        }
        result
    }

    fn single_tap_remove(&mut self, touch: &TouchSample) -> bool {
        if self.contains_touch(touch.id) {
            self.internal = GesturePhase::Ended;
            true
        } else {
            false
        }
    }

    // --- DoubleTap -------------------------------------------------------

    fn double_tap_add(&mut self, touch: &TouchSample) -> bool {
        if self.internal != GesturePhase::Possible {
            return false;
        }
        if self.touches.is_empty() {
            self.base_add(touch);
            self.time_started_ms = touch.timestamp_ms;
            if let Detail::DoubleTap(detail) = &mut self.detail {
                detail.taps = 1;
            }
            return true;
        }
        if self.touches.len() == 1
            && touch.timestamp_ms.saturating_sub(self.time_started_ms) <= MAX_TIME_DOUBLE_TAP_MS
        {
            // second tap must land near the first
            let distance = touch.position.chebyshev_distance(self.touches[0].position);
            if distance <= MAX_DIST_DOUBLE_TAP {
                self.base_add(touch);
                if let Detail::DoubleTap(detail) = &mut self.detail {
                    detail.taps += 1;
                }
                return true;
            }
        }
        // time or distance budget exceeded
        self.internal = GesturePhase::Failed;
        false
    }

    fn double_tap_remove(&mut self, touch: &TouchSample) -> bool {
        let taps = match &self.detail {
            Detail::DoubleTap(detail) => detail.taps,
            _ => 0,
        };
        if self.contains_touch(touch.id) && taps == 2 {
            self.internal = GesturePhase::Began;
            true
        } else {
            false
        }
    }
}
