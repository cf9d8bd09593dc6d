//! Integration tests for the full dispatcher stack, driven through a mock
//! view tree.
//!
//! These exercise the public surface only: `on_touch_input`, `on_idle`, and
//! `view_removed`, with assertions on the exact event stream each view
//! receives and on full cleanup after every interaction.

mod common;

use common::{cancel, down, moved, up, MockHost};
use tactus::{
    GestureInterest, GestureKind, GesturePhase, Point, TouchInputState, PRIORITY_HIGH,
};

#[test]
fn test_direct_touch_goes_to_root() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 100.0, 100.0, 0));
    input.on_touch_input(&mut host, &moved(1, 120.0, 100.0, 20));
    input.on_touch_input(&mut host, &up(1, 120.0, 100.0, 40));

    // no view declared any interest: the root takes the raw touch stream
    assert_eq!(host.touch_log.len(), 3);
    assert!(host.touch_log.iter().all(|(view, _)| *view == root));
    assert!(host.gesture_log.is_empty());
    assert_eq!(input.active_touch_count(), 0);
    assert_eq!(input.active_gesture_count(), 0);
}

#[test]
fn test_disabled_view_is_skipped() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let child = host.add_view(
        root,
        Point::ZERO,
        (200.0, 200.0),
        vec![GestureInterest::new(GestureKind::SingleTap)],
    );
    host.set_enabled(child, false);
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 50.0, 50.0, 0));
    input.on_touch_input(&mut host, &up(1, 50.0, 50.0, 40));

    assert!(host.gestures_for(child).is_empty());
    assert_eq!(host.touch_log.first().map(|(view, _)| *view), Some(root));
}

#[test]
fn test_possible_advisory_precedes_everything() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let child = host.add_view(
        root,
        Point::ZERO,
        (200.0, 200.0),
        vec![GestureInterest::new(GestureKind::SingleTap)],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 50.0, 50.0, 0));

    let events = host.gestures_for(child);
    assert!(!events.is_empty());
    assert_eq!(events[0].phase, GesturePhase::Possible);
}

#[test]
fn test_lone_tap_delivers_one_begin() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let child = host.add_view(
        root,
        Point::ZERO,
        (200.0, 200.0),
        vec![GestureInterest::new(GestureKind::SingleTap)],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 50.0, 50.0, 0));
    input.on_touch_input(&mut host, &up(1, 50.0, 50.0, 40));
    input.on_idle(&mut host, 300);

    assert_eq!(host.count(GestureKind::SingleTap, GesturePhase::Began), 1);
    assert_eq!(input.active_gesture_count(), 0);
    assert_eq!(input.active_touch_count(), 0);
    // the tap went to the claiming view, not the root
    assert!(host
        .gesture_log
        .iter()
        .all(|(view, _)| *view == child));
}

#[test]
fn test_single_tap_waits_out_double_tap_window() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let _child = host.add_view(
        root,
        Point::ZERO,
        (200.0, 200.0),
        vec![
            GestureInterest::new(GestureKind::SingleTap),
            GestureInterest::new(GestureKind::DoubleTap),
        ],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 50.0, 50.0, 0));
    input.on_touch_input(&mut host, &up(1, 50.0, 50.0, 40));

    // inside the double-tap window nothing fires
    input.on_idle(&mut host, 300);
    assert_eq!(host.count(GestureKind::SingleTap, GesturePhase::Began), 0);

    // once the window closes the tap is promoted, exactly once
    input.on_idle(&mut host, 520);
    input.on_idle(&mut host, 600);
    input.on_idle(&mut host, 2000);
    assert_eq!(host.count(GestureKind::SingleTap, GesturePhase::Began), 1);
    assert_eq!(host.count(GestureKind::DoubleTap, GesturePhase::Began), 0);
    assert_eq!(input.active_gesture_count(), 0);
}

#[test]
fn test_double_tap_within_budget() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let _child = host.add_view(
        root,
        Point::ZERO,
        (200.0, 200.0),
        vec![
            GestureInterest::new(GestureKind::SingleTap),
            GestureInterest::new(GestureKind::DoubleTap),
        ],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 50.0, 50.0, 0));
    input.on_touch_input(&mut host, &up(1, 50.0, 50.0, 40));
    input.on_touch_input(&mut host, &down(2, 52.0, 50.0, 200));
    input.on_touch_input(&mut host, &up(2, 52.0, 50.0, 240));
    input.on_idle(&mut host, 800);

    assert_eq!(host.count(GestureKind::DoubleTap, GesturePhase::Began), 1);
    // the double tap consumed both contacts; no single tap may also fire
    assert_eq!(host.count(GestureKind::SingleTap, GesturePhase::Began), 0);
    assert_eq!(input.active_gesture_count(), 0);
    assert_eq!(input.active_touch_count(), 0);
}

#[test]
fn test_late_second_tap_gives_two_single_taps() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let _child = host.add_view(
        root,
        Point::ZERO,
        (200.0, 200.0),
        vec![
            GestureInterest::new(GestureKind::SingleTap),
            GestureInterest::new(GestureKind::DoubleTap),
        ],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 50.0, 50.0, 0));
    input.on_touch_input(&mut host, &up(1, 50.0, 50.0, 40));
    input.on_idle(&mut host, 520);

    // 600 ms later: too late to pair up, this is a fresh tap cycle
    input.on_touch_input(&mut host, &down(2, 50.0, 50.0, 600));
    input.on_touch_input(&mut host, &up(2, 50.0, 50.0, 640));
    input.on_idle(&mut host, 1150);

    assert_eq!(host.count(GestureKind::SingleTap, GesturePhase::Began), 2);
    assert_eq!(host.count(GestureKind::DoubleTap, GesturePhase::Began), 0);
    assert_eq!(input.active_gesture_count(), 0);
}

#[test]
fn test_long_press_suppresses_single_tap() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let _child = host.add_view(
        root,
        Point::ZERO,
        (200.0, 200.0),
        vec![
            GestureInterest::new(GestureKind::SingleTap),
            GestureInterest::new(GestureKind::LongPress),
        ],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 50.0, 50.0, 0));
    input.on_idle(&mut host, 400);
    assert_eq!(host.count(GestureKind::LongPress, GesturePhase::Began), 0);

    input.on_idle(&mut host, 501);
    assert_eq!(host.count(GestureKind::LongPress, GesturePhase::Began), 1);
    assert_eq!(host.count(GestureKind::SingleTap, GesturePhase::Began), 0);

    input.on_touch_input(&mut host, &up(1, 50.0, 50.0, 550));
    assert_eq!(host.count(GestureKind::LongPress, GesturePhase::Ended), 1);
    assert_eq!(host.count(GestureKind::SingleTap, GesturePhase::Began), 0);
    assert_eq!(input.active_gesture_count(), 0);
}

#[test]
fn test_configurable_long_press_delay() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let _child = host.add_view(
        root,
        Point::ZERO,
        (200.0, 200.0),
        vec![GestureInterest::new(GestureKind::LongPress)],
    );
    let mut input = TouchInputState::new();
    input.set_long_press_delay(100);

    input.on_touch_input(&mut host, &down(1, 50.0, 50.0, 0));
    input.on_idle(&mut host, 90);
    assert_eq!(host.count(GestureKind::LongPress, GesturePhase::Began), 0);
    input.on_idle(&mut host, 150);
    assert_eq!(host.count(GestureKind::LongPress, GesturePhase::Began), 1);

    input.on_touch_input(&mut host, &up(1, 50.0, 50.0, 200));
    assert_eq!(input.active_gesture_count(), 0);
}

#[test]
fn test_swipe_begin_precedes_changed_and_rest_kills_fling() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let child = host.add_view(
        root,
        Point::ZERO,
        (400.0, 400.0),
        vec![GestureInterest::new(GestureKind::Swipe)],
    );
    let mut input = TouchInputState::new();

    // drag right 100 units over 200 ms
    input.on_touch_input(&mut host, &down(1, 0.0, 100.0, 0));
    input.on_touch_input(&mut host, &moved(1, 100.0, 100.0, 200));
    input.on_idle(&mut host, 210);

    // hold still for three samples, then release
    input.on_touch_input(&mut host, &moved(1, 100.0, 100.0, 220));
    input.on_touch_input(&mut host, &moved(1, 101.0, 100.0, 240));
    input.on_touch_input(&mut host, &moved(1, 100.0, 100.0, 260));
    input.on_touch_input(&mut host, &up(1, 100.0, 100.0, 280));

    let events: Vec<_> = host
        .gestures_for(child)
        .into_iter()
        .filter(|event| event.kind == GestureKind::Swipe && event.phase != GesturePhase::Possible)
        .collect();

    assert_eq!(events[0].phase, GesturePhase::Began);
    assert!(events
        .iter()
        .skip(1)
        .take(events.len() - 2)
        .all(|event| event.phase == GesturePhase::Changed));

    // the drag came to rest: no residual fling velocity on release
    let last = events.last().unwrap();
    assert_eq!(last.phase, GesturePhase::Ended);
    assert_eq!(last.amount_x, 0.0);
    assert_eq!(last.amount_y, 0.0);

    assert_eq!(input.active_gesture_count(), 0);
    assert_eq!(input.active_touch_count(), 0);
}

#[test]
fn test_short_drag_never_begins() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let _child = host.add_view(
        root,
        Point::ZERO,
        (400.0, 400.0),
        vec![GestureInterest::new(GestureKind::Swipe)],
    );
    let mut input = TouchInputState::new();

    // 8 units of travel stays inside the 10-unit margin
    input.on_touch_input(&mut host, &down(1, 100.0, 100.0, 0));
    input.on_touch_input(&mut host, &moved(1, 108.0, 100.0, 50));
    input.on_idle(&mut host, 60);
    input.on_touch_input(&mut host, &up(1, 108.0, 100.0, 80));
    input.on_idle(&mut host, 100);

    assert_eq!(host.count(GestureKind::Swipe, GesturePhase::Began), 0);
    assert_eq!(input.active_gesture_count(), 0);
}

#[test]
fn test_zoom_wins_over_swipe_and_reports_ratio() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let child = host.add_view(
        root,
        Point::ZERO,
        (400.0, 400.0),
        vec![
            GestureInterest::new(GestureKind::Swipe),
            GestureInterest::new(GestureKind::Zoom),
        ],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 100.0, 100.0, 0));
    input.on_touch_input(&mut host, &down(2, 200.0, 100.0, 10));
    // spread from distance 100 to 150: past the 5% margin, ratio 1.5
    input.on_touch_input(&mut host, &moved(2, 250.0, 100.0, 60));
    input.on_idle(&mut host, 70);

    assert_eq!(host.count(GestureKind::Zoom, GesturePhase::Began), 1);
    let began = host
        .gestures_for(child)
        .into_iter()
        .find(|event| event.kind == GestureKind::Zoom && event.phase == GesturePhase::Began)
        .unwrap();
    assert!((began.amount_x - 1.5).abs() < 1e-4);
    assert_eq!(began.amount_x, began.amount_y);

    // mutual exclusion: the swipe candidates sharing these fingers are gone
    // before the zoom is delivered, so no swipe event ever surfaces
    assert_eq!(host.count(GestureKind::Swipe, GesturePhase::Began), 0);
    assert_eq!(host.count(GestureKind::Swipe, GesturePhase::Changed), 0);
    assert_eq!(host.count(GestureKind::Swipe, GesturePhase::Ended), 0);

    // the terminal report reuses the last computed ratio
    input.on_touch_input(&mut host, &up(2, 250.0, 100.0, 100));
    let ended = host
        .gestures_for(child)
        .into_iter()
        .find(|event| event.kind == GestureKind::Zoom && event.phase == GesturePhase::Ended)
        .unwrap();
    assert!((ended.amount_x - 1.5).abs() < 1e-4);

    input.on_touch_input(&mut host, &up(1, 100.0, 100.0, 150));
    assert_eq!(input.active_gesture_count(), 0);
    assert_eq!(input.active_touch_count(), 0);
}

#[test]
fn test_rotate_reports_angle_delta() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let child = host.add_view(
        root,
        Point::ZERO,
        (400.0, 400.0),
        vec![GestureInterest::new(GestureKind::Rotate)],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 100.0, 100.0, 0));
    input.on_touch_input(&mut host, &down(2, 200.0, 100.0, 10));
    // armed on the second down itself; the next idle pass reports it
    input.on_idle(&mut host, 11);
    assert_eq!(host.count(GestureKind::Rotate, GesturePhase::Began), 1);

    // quarter turn of the second finger around the first
    input.on_touch_input(&mut host, &moved(2, 100.0, 200.0, 60));
    let changed = host
        .gestures_for(child)
        .into_iter()
        .find(|event| event.kind == GestureKind::Rotate && event.phase == GesturePhase::Changed)
        .unwrap();
    assert!((changed.amount_x - std::f32::consts::FRAC_PI_2).abs() < 1e-4);

    input.on_touch_input(&mut host, &up(2, 100.0, 200.0, 100));
    input.on_touch_input(&mut host, &up(1, 100.0, 100.0, 120));
    assert_eq!(host.count(GestureKind::Rotate, GesturePhase::Ended), 1);
    assert_eq!(input.active_gesture_count(), 0);
}

#[test]
fn test_priority_overrides_depth() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let outer = host.add_view(
        root,
        Point::ZERO,
        (400.0, 400.0),
        vec![GestureInterest::with_priority(
            GestureKind::Swipe,
            PRIORITY_HIGH,
        )],
    );
    let inner = host.add_view(
        outer,
        Point::ZERO,
        (200.0, 200.0),
        vec![GestureInterest::new(GestureKind::Swipe)],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 50.0, 50.0, 0));
    input.on_touch_input(&mut host, &moved(1, 150.0, 50.0, 50));
    input.on_idle(&mut host, 60);

    // the outer view outbids the innermost hit: the swipe is delivered to it
    assert!(host
        .gestures_for(outer)
        .iter()
        .any(|event| event.phase == GesturePhase::Began));
    assert!(host
        .gestures_for(inner)
        .iter()
        .all(|event| event.phase == GesturePhase::Possible));

    input.on_touch_input(&mut host, &up(1, 150.0, 50.0, 80));
    assert_eq!(input.active_gesture_count(), 0);
}

#[test]
fn test_view_removed_tears_down_in_flight_gesture() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let child = host.add_view(
        root,
        Point::ZERO,
        (400.0, 400.0),
        vec![GestureInterest::new(GestureKind::Swipe)],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 100.0, 100.0, 0));
    input.on_touch_input(&mut host, &moved(1, 150.0, 100.0, 50));
    input.on_idle(&mut host, 60);
    assert_eq!(host.count(GestureKind::Swipe, GesturePhase::Began), 1);

    input.view_removed(&mut host, child);
    assert_eq!(input.active_gesture_count(), 0);

    // nothing further reaches the detached view, and the stale touch
    // resolves without incident
    let logged = host.gesture_log.len();
    input.on_touch_input(&mut host, &moved(1, 200.0, 100.0, 80));
    input.on_touch_input(&mut host, &up(1, 200.0, 100.0, 100));
    input.on_idle(&mut host, 200);
    assert_eq!(host.gesture_log.len(), logged);
    assert_eq!(input.active_touch_count(), 0);
}

#[test]
fn test_view_removed_covers_descendants() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let panel = host.add_view(root, Point::ZERO, (400.0, 400.0), Vec::new());
    let _button = host.add_view(
        panel,
        Point::ZERO,
        (200.0, 200.0),
        vec![GestureInterest::new(GestureKind::LongPress)],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 50.0, 50.0, 0));
    assert_eq!(input.active_gesture_count(), 1);

    // removing the panel takes the button's gesture with it
    input.view_removed(&mut host, panel);
    assert_eq!(input.active_gesture_count(), 0);

    input.on_touch_input(&mut host, &up(1, 50.0, 50.0, 100));
    input.on_idle(&mut host, 700);
    assert_eq!(host.count(GestureKind::LongPress, GesturePhase::Began), 0);
}

#[test]
fn test_cancel_ends_everything() {
    let mut host = MockHost::new(800.0, 600.0);
    let root = host.root_view();
    let _child = host.add_view(
        root,
        Point::ZERO,
        (400.0, 400.0),
        vec![GestureInterest::new(GestureKind::Swipe)],
    );
    let mut input = TouchInputState::new();

    input.on_touch_input(&mut host, &down(1, 100.0, 100.0, 0));
    input.on_touch_input(&mut host, &moved(1, 160.0, 100.0, 50));
    input.on_idle(&mut host, 60);
    assert_eq!(host.count(GestureKind::Swipe, GesturePhase::Began), 1);

    // palm rejection: the platform takes the contact away
    input.on_touch_input(&mut host, &cancel(80));

    assert_eq!(host.count(GestureKind::Swipe, GesturePhase::Ended), 1);
    assert_eq!(input.active_gesture_count(), 0);
    assert_eq!(input.active_touch_count(), 0);
}
