//! A scripted view tree for driving the dispatcher in tests.

use slotmap::SlotMap;
use tactus::{
    GestureEvent, GestureInterest, GestureKind, GesturePhase, Point, TouchId, TouchPhase,
    TouchSample, ViewHost, ViewId,
};

pub struct MockView {
    origin: Point,
    size: (f32, f32),
    enabled: bool,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    interests: Vec<GestureInterest>,
}

/// Records every delivery so tests can assert on the exact event stream.
pub struct MockHost {
    views: SlotMap<ViewId, MockView>,
    root: ViewId,
    pub touch_log: Vec<(ViewId, TouchSample)>,
    pub gesture_log: Vec<(ViewId, GestureEvent)>,
}

impl MockHost {
    pub fn new(width: f32, height: f32) -> Self {
        let mut views = SlotMap::with_key();
        let root = views.insert(MockView {
            origin: Point::ZERO,
            size: (width, height),
            enabled: true,
            parent: None,
            children: Vec::new(),
            interests: Vec::new(),
        });
        Self {
            views,
            root,
            touch_log: Vec::new(),
            gesture_log: Vec::new(),
        }
    }

    pub fn root_view(&self) -> ViewId {
        self.root
    }

    pub fn add_view(
        &mut self,
        parent: ViewId,
        origin: Point,
        size: (f32, f32),
        interests: Vec<GestureInterest>,
    ) -> ViewId {
        let view = self.views.insert(MockView {
            origin,
            size,
            enabled: true,
            parent: Some(parent),
            children: Vec::new(),
            interests,
        });
        self.views[parent].children.push(view);
        view
    }

    pub fn set_enabled(&mut self, view: ViewId, enabled: bool) {
        self.views[view].enabled = enabled;
    }

    fn root_origin(&self, view: ViewId) -> Point {
        let mut origin = Point::ZERO;
        let mut current = Some(view);
        while let Some(id) = current {
            let v = &self.views[id];
            origin += v.origin;
            current = v.parent;
        }
        origin
    }

    /// Gesture events delivered to `view`, any phase.
    pub fn gestures_for(&self, view: ViewId) -> Vec<GestureEvent> {
        self.gesture_log
            .iter()
            .filter(|(target, _)| *target == view)
            .map(|(_, event)| *event)
            .collect()
    }

    /// Number of events of the given kind and phase across all views.
    pub fn count(&self, kind: GestureKind, phase: GesturePhase) -> usize {
        self.gesture_log
            .iter()
            .filter(|(_, event)| event.kind == kind && event.phase == phase)
            .count()
    }
}

impl ViewHost for MockHost {
    fn root(&self) -> ViewId {
        self.root
    }

    fn children_topmost_first(&self, view: ViewId) -> Vec<ViewId> {
        let mut children = self.views[view].children.clone();
        children.reverse();
        children
    }

    fn is_enabled(&self, view: ViewId) -> bool {
        self.views[view].enabled
    }

    fn contains(&self, view: ViewId, local: Point) -> bool {
        let (width, height) = self.views[view].size;
        local.x >= 0.0 && local.y >= 0.0 && local.x < width && local.y < height
    }

    fn child_offset(&self, view: ViewId) -> Point {
        self.views[view].origin
    }

    fn is_descendant(&self, view: ViewId, ancestor: ViewId) -> bool {
        let mut current = self.views[view].parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.views[id].parent;
        }
        false
    }

    fn handled_gestures(&self, view: ViewId, _local: Point, out: &mut Vec<GestureInterest>) {
        out.extend(self.views[view].interests.iter().copied());
    }

    fn root_to_local(&self, view: ViewId, point: Point) -> Point {
        point - self.root_origin(view)
    }

    fn on_touch_input(&mut self, view: ViewId, event: &TouchSample) {
        self.touch_log.push((view, *event));
    }

    fn on_gesture_input(&mut self, view: ViewId, event: &GestureEvent) {
        self.gesture_log.push((view, *event));
    }
}

/// Shorthand sample constructors.
pub fn down(id: u64, x: f32, y: f32, t: u64) -> TouchSample {
    TouchSample::new(TouchPhase::Began, TouchId(id), Point::new(x, y), t)
}

pub fn moved(id: u64, x: f32, y: f32, t: u64) -> TouchSample {
    TouchSample::new(TouchPhase::Moved, TouchId(id), Point::new(x, y), t)
}

pub fn up(id: u64, x: f32, y: f32, t: u64) -> TouchSample {
    TouchSample::new(TouchPhase::Ended, TouchId(id), Point::new(x, y), t)
}

pub fn cancel(t: u64) -> TouchSample {
    TouchSample::new(TouchPhase::Cancelled, TouchId(0), Point::ZERO, t)
}
