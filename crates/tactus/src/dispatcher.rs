//! Touch dispatch: hit-testing, gesture ownership, and event delivery.
//!
//! [`TouchInputState`] sits above the recognition engine. On every
//! touch-down it hit-tests the host's view tree to discover which views want
//! which gestures at that point, arbitrates gesture ownership across views
//! by priority, and assigns a direct (non-gesture) handler when nothing
//! declared interest. Transitions produced by the engine are translated into
//! [`GestureEvent`]s and relayed to the winning view, with mutual exclusion
//! between gestures that share fingers: once one gesture begins, every
//! competing candidate referencing the same touches is torn down before the
//! winner's event is delivered.
//!
//! The dispatcher holds no view references, only [`ViewId`] handles; every
//! view interaction goes through the [`ViewHost`] passed into each call.

use slotmap::SlotMap;
use static_assertions::assert_impl_all;
use tactus_core::{
    GestureEvent, GestureInterest, GestureKind, GesturePhase, Point, TouchId, TouchPhase,
    TouchSample,
};

use crate::info::GestureInfo;
use crate::recognition::{GestureId, GestureRecognition, Transition};
use crate::view::{ViewHost, ViewId};

/// How many gestures can be in flight at once.
pub const MAX_ACTIVE_GESTURES: usize = 8;

const TARGET: &str = "tactus::dispatch";

/// Per-contact bookkeeping.
#[derive(Debug)]
struct TouchItem {
    id: TouchId,
    position: Point,
    /// The view accepted as the direct (non-gesture) handler, if any.
    view: Option<ViewId>,
}

/// A gesture candidate with its handler assignment.
#[derive(Debug)]
struct Gesture {
    info: GestureInfo,
    view: Option<ViewId>,
    priority: i32,
    user_data: u64,
    /// Last delivered payload, for the duplicate filter and the synthetic
    /// final end of a torn-down continuous gesture.
    last_delivered: Option<(GesturePhase, Point, f32, f32)>,
    /// Zoom center compensation, accumulated as fingers join or leave.
    offset: Point,
}

impl Gesture {
    fn new(kind: GestureKind) -> Self {
        Self {
            info: GestureInfo::new(kind),
            view: None,
            priority: 0,
            user_data: 0,
            last_delivered: None,
            offset: Point::ZERO,
        }
    }
}

/// The touch dispatcher. See the module docs.
#[derive(Debug, Default)]
pub struct TouchInputState {
    recognition: GestureRecognition,
    gestures: SlotMap<GestureId, Gesture>,
    touch_items: Vec<TouchItem>,
}

impl TouchInputState {
    pub fn new() -> Self {
        Self {
            recognition: GestureRecognition::new(),
            gestures: SlotMap::with_key(),
            touch_items: Vec::new(),
        }
    }

    /// Minimum hold time before a long press fires. Default 500 ms.
    pub fn set_long_press_delay(&mut self, delay_ms: u64) {
        self.recognition.set_long_press_delay(delay_ms);
    }

    /// Number of gestures currently in flight.
    pub fn active_gesture_count(&self) -> usize {
        self.gestures.len()
    }

    /// Number of live contacts.
    pub fn active_touch_count(&self) -> usize {
        self.touch_items.len()
    }

    /// Single entry point for touch input. `sample.position` is in the root
    /// view's coordinate space.
    pub fn on_touch_input<H: ViewHost>(&mut self, host: &mut H, sample: &TouchSample) {
        match sample.phase {
            TouchPhase::Began => self.on_touch_began(host, sample),
            TouchPhase::Moved => self.on_touch_changed(host, sample),
            TouchPhase::Ended => self.on_touch_ended(host, sample),
            TouchPhase::Left => {
                // a leave for a contact that is still down ends it first
                if self.find_item(sample.id).is_some() {
                    let ended = TouchSample::new(
                        TouchPhase::Ended,
                        sample.id,
                        sample.position,
                        sample.timestamp_ms,
                    );
                    self.on_touch_ended(host, &ended);
                }
            }
            TouchPhase::Cancelled => self.cancel_touches(host, sample.timestamp_ms),
            TouchPhase::Entered | TouchPhase::Hovered => {}
        }
    }

    /// Periodic tick; resolves time-gated transitions (long press, tap grace
    /// period, double-tap timeout). The host should call this at a cadence
    /// fine enough for the shortest window, 50 ms or better.
    pub fn on_idle<H: ViewHost>(&mut self, host: &mut H, now_ms: u64) {
        if let Some(transition) = self.recognition.process_idle(now_ms) {
            self.apply_transition(host, &transition);
        }
    }

    /// Must be called synchronously before a view or subtree is detached.
    /// Tears down every gesture and touch item referencing the view or any
    /// descendant; later touch events for those contacts are ignored.
    pub fn view_removed<H: ViewHost>(&mut self, host: &mut H, view: ViewId) {
        let doomed: Vec<GestureId> = self
            .gestures
            .iter()
            .filter(|(_, gesture)| match gesture.view {
                Some(owner) => owner == view || host.is_descendant(owner, view),
                None => false,
            })
            .map(|(id, _)| id)
            .collect();
        for id in doomed {
            self.remove_gesture(host, id, true, false);
        }

        self.touch_items.retain(|item| match item.view {
            Some(owner) => owner != view && !host.is_descendant(owner, view),
            None => true,
        });
    }

    fn find_item(&self, id: TouchId) -> Option<usize> {
        self.touch_items.iter().position(|item| item.id == id)
    }

    /// Centroid of the live contacts contributing to a gesture.
    fn touch_centroid(&self, info: &GestureInfo) -> Point {
        let mut center = Point::ZERO;
        let mut count = 0;
        for &id in info.touch_ids() {
            if let Some(index) = self.find_item(id) {
                center += self.touch_items[index].position;
                count += 1;
            }
        }
        if count > 0 {
            center = center * (1.0 / count as f32);
        }
        center
    }

    /// Shift a zoom gesture's offset so its reported center does not jump
    /// when a finger joins or leaves mid-gesture.
    fn compensate_zoom_center(&mut self, id: GestureId, old_center: Point, touch_added: bool) {
        let Some(gesture) = self.gestures.get(id) else {
            return;
        };
        if gesture.info.kind() != GestureKind::Zoom {
            return;
        }
        let delivered = gesture.last_delivered.is_some();
        let min_remaining = if touch_added { 1 } else { 0 };
        if delivered && gesture.info.touch_ids().len() > min_remaining {
            let new_center = self.touch_centroid(&gesture.info);
            let gesture = &mut self.gestures[id];
            gesture.offset += old_center - new_center;
        }
    }

    fn on_touch_began<H: ViewHost>(&mut self, host: &mut H, sample: &TouchSample) {
        if self.find_item(sample.id).is_some() {
            // a duplicate down for a live contact is just a move
            self.on_touch_changed(host, sample);
            return;
        }

        self.touch_items.push(TouchItem {
            id: sample.id,
            position: sample.position,
            view: None,
        });

        // offer the touch to gestures still waiting for more fingers
        let waiting: Vec<GestureId> = self
            .gestures
            .iter()
            .filter(|(_, gesture)| gesture.info.needs_more_touches())
            .map(|(id, _)| id)
            .collect();
        for id in waiting {
            let old_center = self.touch_centroid(&self.gestures[id].info);
            if self.gestures[id].info.add_touch(sample.id) {
                self.compensate_zoom_center(id, old_center, true);
            }
        }

        // discover gesture claims along the hit chain, children first
        let mut claims: Vec<(ViewId, GestureInterest)> = Vec::new();
        let root = host.root();
        Self::collect_interests(host, root, sample.position, &mut claims);

        for (view, interest) in claims {
            let id = match self.find_or_create_gesture(interest.kind, sample.id) {
                Some(id) => id,
                None => continue,
            };
            let gesture = &mut self.gestures[id];
            if gesture.view.is_none() || interest.priority > gesture.priority {
                gesture.view = Some(view);
                gesture.priority = interest.priority;
                gesture.user_data = interest.user_data;
            }
            gesture.info.add_touch(sample.id);
        }

        let has_gesture = self
            .gestures
            .values()
            .any(|gesture| gesture.info.contains_touch(sample.id));
        if !has_gesture {
            // nothing wants a gesture here: the root view takes the touch
            // directly, bypassing recognition
            let root = host.root();
            if let Some(index) = self.find_item(sample.id) {
                self.touch_items[index].view = Some(root);
            }
            let local = TouchSample::new(
                sample.phase,
                sample.id,
                host.root_to_local(root, sample.position),
                sample.timestamp_ms,
            );
            tracing::debug!(target: TARGET, touch = %sample.id, "direct touch accepted by root");
            host.on_touch_input(root, &local);
            return;
        }

        self.notify_possible_candidate(host, sample);

        // hand new gestures to the recognition engine
        let unregistered: Vec<(GestureId, GestureKind)> = self
            .gestures
            .iter()
            .filter(|(id, _)| !self.recognition.is_recognizing(*id))
            .map(|(id, gesture)| (id, gesture.info.kind()))
            .collect();
        for (id, kind) in unregistered {
            self.recognition.start_recognizing(id, kind);
        }

        if let Some(transition) = self.recognition.on_touch_began(sample) {
            self.apply_transition(host, &transition);
        }
    }

    /// Depth-first interest collection: children before parents, topmost
    /// child first, so the frontmost view wins priority ties.
    fn collect_interests<H: ViewHost>(
        host: &H,
        view: ViewId,
        local: Point,
        out: &mut Vec<(ViewId, GestureInterest)>,
    ) {
        for child in host.children_topmost_first(view) {
            if !host.is_enabled(child) {
                continue;
            }
            let child_local = local - host.child_offset(child);
            if host.contains(child, child_local) {
                Self::collect_interests(host, child, child_local, out);
            }
        }

        let mut interests = Vec::new();
        host.handled_gestures(view, local, &mut interests);
        out.extend(interests.into_iter().map(|interest| (view, interest)));
    }

    fn find_or_create_gesture(&mut self, kind: GestureKind, touch: TouchId) -> Option<GestureId> {
        let existing = self
            .gestures
            .iter()
            .find(|(_, gesture)| gesture.info.kind() == kind && gesture.info.wants_touch(touch))
            .map(|(id, _)| id);
        if existing.is_some() {
            return existing;
        }
        if self.gestures.len() >= MAX_ACTIVE_GESTURES {
            tracing::debug!(target: TARGET, %kind, "gesture capacity exhausted");
            return None;
        }
        tracing::trace!(target: TARGET, %kind, "add gesture");
        Some(self.gestures.insert(Gesture::new(kind)))
    }

    /// If exactly one view is the candidate for every gesture this touch
    /// just created, give it an advisory heads-up so it can prepare without
    /// the engine committing to anything.
    fn notify_possible_candidate<H: ViewHost>(&self, host: &mut H, sample: &TouchSample) {
        let mut common: Option<(ViewId, u64)> = None;
        let mut unique = true;
        for gesture in self.gestures.values() {
            let single_touch = gesture.info.touch_ids() == [sample.id];
            if !single_touch {
                continue;
            }
            match (gesture.view, common) {
                (None, _) => unique = false,
                (Some(view), None) => common = Some((view, gesture.user_data)),
                (Some(view), Some((seen, _))) => {
                    if view != seen {
                        unique = false;
                    }
                }
            }
        }
        if let (true, Some((view, user_data))) = (unique, common) {
            let event = GestureEvent {
                kind: GestureKind::Swipe,
                phase: GesturePhase::Possible,
                position: host.root_to_local(view, sample.position).rounded(),
                amount_x: 1.0,
                amount_y: 1.0,
                user_data,
            };
            host.on_gesture_input(view, &event);
        }
    }

    fn on_touch_changed<H: ViewHost>(&mut self, host: &mut H, sample: &TouchSample) {
        let Some(index) = self.find_item(sample.id) else {
            return;
        };
        self.touch_items[index].position = sample.position;

        if let Some(view) = self.touch_items[index].view {
            let local = TouchSample::new(
                sample.phase,
                sample.id,
                host.root_to_local(view, sample.position),
                sample.timestamp_ms,
            );
            host.on_touch_input(view, &local);
        }

        for transition in self.recognition.on_touch_changed(sample) {
            self.apply_transition(host, &transition);
        }
    }

    fn on_touch_ended<H: ViewHost>(&mut self, host: &mut H, sample: &TouchSample) {
        let Some(index) = self.find_item(sample.id) else {
            return;
        };
        self.touch_items[index].position = sample.position;

        // the recognition layer first: a release can complete a gesture
        // (double tap, swipe end) that must be reported before cleanup
        if let Some(transition) = self.recognition.on_touch_ended(sample) {
            self.apply_transition(host, &transition);
        }

        if let Some(index) = self.find_item(sample.id) {
            if let Some(view) = self.touch_items[index].view {
                let local = TouchSample::new(
                    sample.phase,
                    sample.id,
                    host.root_to_local(view, sample.position),
                    sample.timestamp_ms,
                );
                host.on_touch_input(view, &local);
            }
        }

        // old centroids for zoom compensation, while the item still exists
        let zoom_centers: Vec<(GestureId, Point)> = self
            .gestures
            .iter()
            .filter(|(_, gesture)| {
                gesture.info.kind() == GestureKind::Zoom
                    && gesture.info.contains_touch(sample.id)
            })
            .map(|(id, gesture)| (id, self.touch_centroid(&gesture.info)))
            .collect();

        self.touch_items.retain(|item| item.id != sample.id);

        let mut is_last = self.touch_items.is_empty();

        // a pending double tap must survive its touch ending
        let double_tap_pending = self.gestures.values().any(|gesture| {
            gesture.info.kind() == GestureKind::DoubleTap
                && gesture.info.contains_touch(sample.id)
                && !gesture.info.can_remove()
        });
        if double_tap_pending {
            is_last = false;
        }

        let referencing: Vec<GestureId> = self
            .gestures
            .iter()
            .filter(|(_, gesture)| gesture.info.contains_touch(sample.id))
            .map(|(id, _)| id)
            .collect();
        for id in referencing {
            if !self.gestures[id].info.remove_touch(sample.id) {
                continue;
            }
            if let Some(&(_, old_center)) = zoom_centers.iter().find(|(zoom, _)| *zoom == id) {
                self.compensate_zoom_center(id, old_center, false);
            }

            let waiting_for_double_tap =
                double_tap_pending && self.gestures[id].info.kind() == GestureKind::SingleTap;
            if waiting_for_double_tap {
                // the first tap is done; a second may still arrive. Give the
                // double-tap candidate a heads-up, like the advisory sent on
                // touch-down.
                self.notify_double_tap_possible(host, sample);
            }

            if self.gestures[id].info.can_remove() && !waiting_for_double_tap {
                self.remove_gesture(host, id, false, true);
            } else {
                is_last = false;
            }
        }

        if is_last {
            // nothing pending: make sure no gesture outlives its touches
            let remaining: Vec<GestureId> = self.gestures.keys().collect();
            for id in remaining {
                self.remove_gesture(host, id, false, true);
            }
        }
    }

    fn notify_double_tap_possible<H: ViewHost>(&self, host: &mut H, sample: &TouchSample) {
        let candidate = self.gestures.values().find_map(|gesture| {
            if gesture.info.kind() == GestureKind::DoubleTap && !gesture.info.can_remove() {
                gesture.view.map(|view| (view, gesture.user_data))
            } else {
                None
            }
        });
        if let Some((view, user_data)) = candidate {
            let event = GestureEvent {
                kind: GestureKind::DoubleTap,
                phase: GesturePhase::Possible,
                position: host.root_to_local(view, sample.position).rounded(),
                amount_x: 1.0,
                amount_y: 1.0,
                user_data,
            };
            host.on_gesture_input(view, &event);
        }
    }

    fn cancel_touches<H: ViewHost>(&mut self, host: &mut H, timestamp_ms: u64) {
        let live: Vec<(TouchId, Point)> = self
            .touch_items
            .iter()
            .map(|item| (item.id, item.position))
            .collect();
        for (id, position) in live {
            let ended = TouchSample::new(TouchPhase::Ended, id, position, timestamp_ms);
            self.on_touch_ended(host, &ended);
        }
    }

    /// The gesture-sink logic: translate an engine transition into view
    /// delivery, enforcing mutual exclusion and tap-cycle cleanup.
    fn apply_transition<H: ViewHost>(&mut self, host: &mut H, transition: &Transition) {
        let Some(gesture) = self.gestures.get(transition.gesture) else {
            return;
        };

        let mut position = transition.args.center;
        if transition.kind == GestureKind::Zoom {
            position += gesture.offset;
        }
        let payload = (
            transition.phase,
            position,
            transition.args.amount_x,
            transition.args.amount_y,
        );

        // swallow successive identical Changed events
        if transition.phase == GesturePhase::Changed && gesture.last_delivered == Some(payload) {
            return;
        }

        if transition.phase == GesturePhase::Began {
            // this gesture won: competing candidates sharing any of its
            // fingers are discarded before the event goes out
            let ids: Vec<TouchId> = gesture.info.touch_ids().to_vec();
            let losers: Vec<GestureId> = self
                .gestures
                .iter()
                .filter(|(id, other)| {
                    *id != transition.gesture
                        && ids.iter().any(|&touch| other.info.contains_touch(touch))
                })
                .map(|(id, _)| id)
                .collect();
            for id in losers {
                self.remove_gesture(host, id, true, true);
            }
        }

        let gesture = &mut self.gestures[transition.gesture];
        gesture.last_delivered = Some(payload);
        let view = gesture.view;
        let user_data = gesture.user_data;
        let is_tap = gesture.info.is_tap();

        if let Some(view) = view {
            let event = GestureEvent {
                kind: transition.kind,
                phase: transition.phase,
                position: host.root_to_local(view, position).rounded(),
                amount_x: transition.args.amount_x,
                amount_y: transition.args.amount_y,
                user_data,
            };
            tracing::trace!(
                target: TARGET,
                kind = %event.kind,
                phase = ?event.phase,
                "deliver gesture"
            );
            host.on_gesture_input(view, &event);
        }

        // a fired tap closes the whole tap cycle: tap gestures whose
        // touches are gone (including a single tap kept alive for a double
        // tap that never came, or the one waiting while this double tap
        // completed) are swept
        if transition.phase != GesturePhase::Failed && is_tap {
            let swept: Vec<GestureId> = self
                .gestures
                .iter()
                .filter(|(_, other)| other.info.is_tap() && other.info.touch_ids().is_empty())
                .map(|(id, _)| id)
                .collect();
            for id in swept {
                self.remove_gesture(host, id, false, true);
            }
        }
    }

    /// Tear a gesture down, sending the missing final end of a continuous
    /// gesture that is still in flight. `notify` is false when the owning
    /// view is going away.
    fn remove_gesture<H: ViewHost>(
        &mut self,
        host: &mut H,
        id: GestureId,
        aborted: bool,
        notify: bool,
    ) {
        let Some(gesture) = self.gestures.remove(id) else {
            return;
        };
        tracing::trace!(target: TARGET, kind = %gesture.info.kind(), "remove gesture");

        if notify
            && gesture.info.is_continuous()
            && let Some(view) = gesture.view
            && let Some((last_phase, last_position, amount_x, amount_y)) = gesture.last_delivered
            && matches!(last_phase, GesturePhase::Began | GesturePhase::Changed)
        {
            let (amount_x, amount_y) = if aborted {
                (1.0, 1.0)
            } else {
                (amount_x, amount_y)
            };
            let event = GestureEvent {
                kind: gesture.info.kind(),
                phase: GesturePhase::Ended,
                position: host.root_to_local(view, last_position).rounded(),
                amount_x,
                amount_y,
                user_data: gesture.user_data,
            };
            host.on_gesture_input(view, &event);
        }

        self.recognition.stop_recognizing(id);
    }
}

assert_impl_all!(TouchInputState: Send);
