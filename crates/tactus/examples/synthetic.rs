//! Synthetic input walkthrough.
//!
//! Drives the dispatcher with a scripted touch sequence against a small
//! two-view tree (a canvas that wants swipe/zoom, a button that wants taps
//! and long press) and prints every event the views receive. No window and
//! no real input device; the clock is a hand-advanced millisecond counter.
//!
//! Run with: cargo run -p tactus --example synthetic

use slotmap::SlotMap;
use tactus::{
    GestureEvent, GestureInterest, GestureKind, Point, TouchId, TouchInputState, TouchPhase,
    TouchSample, ViewHost, ViewId, PRIORITY_NORMAL,
};

struct DemoView {
    name: &'static str,
    origin: Point,
    size: (f32, f32),
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    interests: Vec<GestureInterest>,
}

struct DemoHost {
    views: SlotMap<ViewId, DemoView>,
    root: ViewId,
}

impl DemoHost {
    fn new() -> Self {
        let mut views = SlotMap::with_key();
        let root = views.insert(DemoView {
            name: "root",
            origin: Point::ZERO,
            size: (800.0, 600.0),
            parent: None,
            children: Vec::new(),
            interests: Vec::new(),
        });
        Self { views, root }
    }

    fn add_view(
        &mut self,
        name: &'static str,
        origin: Point,
        size: (f32, f32),
        interests: Vec<GestureInterest>,
    ) -> ViewId {
        let view = self.views.insert(DemoView {
            name,
            origin,
            size,
            parent: Some(self.root),
            children: Vec::new(),
            interests,
        });
        self.views[self.root].children.push(view);
        view
    }
}

impl ViewHost for DemoHost {
    fn root(&self) -> ViewId {
        self.root
    }

    fn children_topmost_first(&self, view: ViewId) -> Vec<ViewId> {
        let mut children = self.views[view].children.clone();
        children.reverse();
        children
    }

    fn is_enabled(&self, _view: ViewId) -> bool {
        true
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
        point - self.views[view].origin
    }

    fn on_touch_input(&mut self, view: ViewId, event: &TouchSample) {
        println!(
            "  {:<8} touch   {:?} at ({:.0}, {:.0})",
            self.views[view].name, event.phase, event.position.x, event.position.y
        );
    }

    fn on_gesture_input(&mut self, view: ViewId, event: &GestureEvent) {
        println!(
            "  {:<8} gesture {} {:?} at ({:.0}, {:.0}) amounts ({:.2}, {:.2})",
            self.views[view].name,
            event.kind,
            event.phase,
            event.position.x,
            event.position.y,
            event.amount_x,
            event.amount_y
        );
    }
}

fn sample(phase: TouchPhase, id: u64, x: f32, y: f32, t: u64) -> TouchSample {
    TouchSample::new(phase, TouchId(id), Point::new(x, y), t)
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut host = DemoHost::new();
    let _canvas = host.add_view(
        "canvas",
        Point::new(0.0, 0.0),
        (800.0, 400.0),
        vec![
            GestureInterest::new(GestureKind::Swipe),
            GestureInterest::new(GestureKind::Zoom),
        ],
    );
    let _button = host.add_view(
        "button",
        Point::new(300.0, 450.0),
        (200.0, 100.0),
        vec![
            GestureInterest::new(GestureKind::SingleTap),
            GestureInterest::new(GestureKind::DoubleTap),
            GestureInterest::with_priority(GestureKind::LongPress, PRIORITY_NORMAL),
        ],
    );

    let mut input = TouchInputState::new();

    println!("\n=== Single tap on the button ===");
    input.on_touch_input(&mut host, &sample(TouchPhase::Began, 1, 400.0, 500.0, 0));
    input.on_touch_input(&mut host, &sample(TouchPhase::Ended, 1, 400.0, 500.0, 60));
    // the tap is promoted once the double-tap window closes
    for t in [100, 200, 300, 400, 500, 550] {
        input.on_idle(&mut host, t);
    }

    println!("\n=== Double tap on the button ===");
    input.on_touch_input(&mut host, &sample(TouchPhase::Began, 1, 400.0, 500.0, 1000));
    input.on_touch_input(&mut host, &sample(TouchPhase::Ended, 1, 400.0, 500.0, 1050));
    input.on_touch_input(&mut host, &sample(TouchPhase::Began, 2, 402.0, 500.0, 1200));
    input.on_touch_input(&mut host, &sample(TouchPhase::Ended, 2, 402.0, 500.0, 1250));
    input.on_idle(&mut host, 1300);

    println!("\n=== Long press on the button ===");
    input.on_touch_input(&mut host, &sample(TouchPhase::Began, 1, 400.0, 500.0, 2000));
    for t in [2100, 2300, 2502, 2600] {
        input.on_idle(&mut host, t);
    }
    input.on_touch_input(&mut host, &sample(TouchPhase::Ended, 1, 400.0, 500.0, 2650));

    println!("\n=== Swipe across the canvas ===");
    input.on_touch_input(&mut host, &sample(TouchPhase::Began, 1, 100.0, 200.0, 3000));
    input.on_touch_input(&mut host, &sample(TouchPhase::Moved, 1, 150.0, 200.0, 3030));
    input.on_idle(&mut host, 3040);
    input.on_touch_input(&mut host, &sample(TouchPhase::Moved, 1, 250.0, 200.0, 3060));
    input.on_touch_input(&mut host, &sample(TouchPhase::Moved, 1, 380.0, 200.0, 3090));
    input.on_touch_input(&mut host, &sample(TouchPhase::Ended, 1, 420.0, 200.0, 3110));

    println!("\n=== Pinch zoom on the canvas ===");
    input.on_touch_input(&mut host, &sample(TouchPhase::Began, 1, 300.0, 200.0, 4000));
    input.on_touch_input(&mut host, &sample(TouchPhase::Began, 2, 400.0, 200.0, 4020));
    input.on_touch_input(&mut host, &sample(TouchPhase::Moved, 2, 460.0, 200.0, 4080));
    input.on_idle(&mut host, 4090);
    input.on_touch_input(&mut host, &sample(TouchPhase::Moved, 2, 500.0, 200.0, 4140));
    input.on_touch_input(&mut host, &sample(TouchPhase::Ended, 2, 500.0, 200.0, 4200));
    input.on_touch_input(&mut host, &sample(TouchPhase::Ended, 1, 300.0, 200.0, 4220));

    println!(
        "\ndone: {} gestures, {} touches still live",
        input.active_gesture_count(),
        input.active_touch_count()
    );
}
