#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::TOUCH_MOUSE_SUPPRESS_MS;

// --- PointerEvent ---

#[test]
fn mouse_event_has_client_point() {
    let e = PointerEvent::mouse(4.0, 5.0, 10.0);
    assert_eq!(e.source, PointerSource::Mouse);
    assert_eq!(e.client, Some(Point::new(4.0, 5.0)));
    assert!(!e.is_touch());
}

#[test]
fn touch_event_uses_first_touch() {
    let e = PointerEvent::touch(&[Point::new(1.0, 2.0), Point::new(9.0, 9.0)], 0.0);
    assert_eq!(e.client, Some(Point::new(1.0, 2.0)));
    assert!(e.is_touch());
}

#[test]
fn touch_event_without_touches_has_no_coordinate() {
    let e = PointerEvent::touch(&[], 0.0);
    assert!(e.client.is_none());
}

#[test]
fn zero_force_means_unreported() {
    let e = PointerEvent::touch(&[Point::new(0.0, 0.0)], 0.0).with_pressure(0.0);
    assert!(e.pressure.is_none());
}

// --- normalize_pressure ---

#[test]
fn missing_pressure_defaults_to_half() {
    assert_eq!(normalize_pressure(None), 0.5);
}

#[test]
fn pressure_is_clamped() {
    assert_eq!(normalize_pressure(Some(0.01)), 0.1);
    assert_eq!(normalize_pressure(Some(3.0)), 1.0);
    assert_eq!(normalize_pressure(Some(0.7)), 0.7);
}

#[test]
fn nan_pressure_defaults() {
    assert_eq!(normalize_pressure(Some(f64::NAN)), 0.5);
}

// --- StrokePoint ---

#[test]
fn stroke_point_round_trips_position() {
    let sp = StrokePoint::new(Point::new(3.0, 4.0), Some(0.8));
    assert_eq!(sp.point(), Point::new(3.0, 4.0));
    assert_eq!(sp.pressure, 0.8);
}

// --- TouchGuard ---

#[test]
fn mouse_accepted_without_prior_touch() {
    let mut guard = TouchGuard::default();
    assert!(guard.accept(&PointerEvent::mouse(0.0, 0.0, 5.0), TOUCH_MOUSE_SUPPRESS_MS));
}

#[test]
fn mouse_shortly_after_touch_is_rejected() {
    let mut guard = TouchGuard::default();
    assert!(guard.accept(&PointerEvent::touch(&[Point::new(0.0, 0.0)], 1000.0), TOUCH_MOUSE_SUPPRESS_MS));
    assert!(!guard.accept(&PointerEvent::mouse(0.0, 0.0, 1499.0), TOUCH_MOUSE_SUPPRESS_MS));
}

#[test]
fn mouse_at_window_edge_is_accepted() {
    let mut guard = TouchGuard::default();
    guard.accept(&PointerEvent::touch(&[Point::new(0.0, 0.0)], 1000.0), TOUCH_MOUSE_SUPPRESS_MS);
    assert!(guard.accept(&PointerEvent::mouse(0.0, 0.0, 1500.0), TOUCH_MOUSE_SUPPRESS_MS));
}

#[test]
fn touch_after_mouse_is_always_accepted() {
    let mut guard = TouchGuard::default();
    guard.accept(&PointerEvent::mouse(0.0, 0.0, 1000.0), TOUCH_MOUSE_SUPPRESS_MS);
    assert!(guard.accept(&PointerEvent::touch(&[Point::new(0.0, 0.0)], 1001.0), TOUCH_MOUSE_SUPPRESS_MS));
}
