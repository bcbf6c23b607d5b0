#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_midpoint() {
    let m = Point::new(0.0, 0.0).midpoint(Point::new(10.0, -4.0));
    assert!(point_approx_eq(m, Point::new(5.0, -2.0)));
}

#[test]
fn point_distance() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
}

// --- SurfaceBounds ---

#[test]
fn bounds_zero_width_is_not_usable() {
    assert!(!SurfaceBounds::new(0.0, 0.0, 0.0, 100.0).is_usable());
}

#[test]
fn bounds_nan_is_not_usable() {
    assert!(!SurfaceBounds::new(0.0, 0.0, f64::NAN, 100.0).is_usable());
}

#[test]
fn bounds_center() {
    let b = SurfaceBounds::new(10.0, 20.0, 100.0, 50.0);
    assert!(point_approx_eq(b.center(), Point::new(60.0, 45.0)));
}

// --- client_to_surface ---

#[test]
fn identity_when_css_matches_bitmap() {
    let b = SurfaceBounds::new(0.0, 0.0, 200.0, 100.0);
    let p = client_to_surface(Point::new(50.0, 75.0), b, 200, 100).unwrap();
    assert!(point_approx_eq(p, Point::new(50.0, 75.0)));
}

#[test]
fn subtracts_bounding_rect_origin() {
    let b = SurfaceBounds::new(30.0, 40.0, 200.0, 100.0);
    let p = client_to_surface(Point::new(30.0, 40.0), b, 200, 100).unwrap();
    assert!(point_approx_eq(p, Point::new(0.0, 0.0)));
}

#[test]
fn scales_per_axis_independently() {
    // Displayed at 100x100, backed by 400x200.
    let b = SurfaceBounds::new(0.0, 0.0, 100.0, 100.0);
    let p = client_to_surface(Point::new(25.0, 50.0), b, 400, 200).unwrap();
    assert!(point_approx_eq(p, Point::new(100.0, 100.0)));
}

#[test]
fn center_maps_to_center_for_all_css_scales() {
    let bitmap_w = 800;
    let bitmap_h = 600;
    for css_scale in [1.0, 0.5, 2.0] {
        let b = SurfaceBounds::new(17.0, 33.0, 800.0 * css_scale, 600.0 * css_scale);
        let p = client_to_surface(b.center(), b, bitmap_w, bitmap_h).unwrap();
        assert!(point_approx_eq(p, Point::new(400.0, 300.0)), "css scale {css_scale} mapped center to {p:?}");
    }
}

#[test]
fn degenerate_bounds_yield_none() {
    let b = SurfaceBounds::new(0.0, 0.0, 0.0, 0.0);
    assert!(client_to_surface(Point::new(1.0, 1.0), b, 100, 100).is_none());
}

#[test]
fn non_finite_client_yields_none() {
    let b = SurfaceBounds::new(0.0, 0.0, 100.0, 100.0);
    assert!(client_to_surface(Point::new(f64::INFINITY, 1.0), b, 100, 100).is_none());
}
