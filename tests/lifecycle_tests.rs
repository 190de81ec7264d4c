// Host-side tests for the animation loop bookkeeping.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod lifecycle {
    include!("../src/lifecycle.rs");
}

use lifecycle::FrameSchedule;

#[test]
fn running_loop_keeps_rescheduling() {
    let mut schedule = FrameSchedule::new();
    assert!(schedule.can_request());
    schedule.requested(1);
    assert!(schedule.fired());
    schedule.requested(2);
    assert!(schedule.is_running());
}

#[test]
fn stop_returns_pending_request_once() {
    let mut schedule = FrameSchedule::new();
    schedule.requested(7);
    assert_eq!(schedule.stop(), Some(7));
    assert_eq!(schedule.stop(), None);
    assert!(!schedule.is_running());
}

#[test]
fn stopped_loop_neither_renders_nor_reschedules() {
    let mut schedule = FrameSchedule::new();
    schedule.requested(3);
    schedule.stop();
    // A callback already queued by the browser still fires once.
    assert!(!schedule.fired());
    assert!(!schedule.can_request());
    schedule.requested(4);
    assert_eq!(schedule.stop(), None);
}

#[test]
fn stop_between_frames_has_nothing_to_cancel() {
    let mut schedule = FrameSchedule::new();
    schedule.requested(5);
    assert!(schedule.fired());
    assert_eq!(schedule.stop(), None);
}
