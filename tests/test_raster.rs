use microcosm::raster::Raster;
use microcosm::surface::*;

use std::f32::consts::TAU;

const RED: Color = Color::rgb(255, 0, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

fn rgb(raster: &Raster, x: usize, y: usize) -> (u8, u8, u8) {
    let c = raster.pixel(x, y).unwrap();
    (c.r, c.g, c.b)
}

// ── buffer ────────────────────────────────────────────────────────────────────

#[test]
fn new_raster_is_black() {
    let r = Raster::new(4, 3);
    assert_eq!((r.width(), r.height()), (4, 3));
    for y in 0..3 {
        for x in 0..4 {
            assert_eq!(rgb(&r, x, y), (0, 0, 0));
        }
    }
}

#[test]
fn pixel_out_of_range_is_none() {
    let r = Raster::new(4, 3);
    assert!(r.pixel(4, 0).is_none());
    assert!(r.pixel(0, 3).is_none());
}

#[test]
fn resize_clears() {
    let mut r = Raster::new(4, 4);
    r.set_fill(RED.into());
    r.fill_rect(0.0, 0.0, 4.0, 4.0);
    r.resize(6, 2);
    assert_eq!((r.width(), r.height()), (6, 2));
    assert_eq!(rgb(&r, 1, 1), (0, 0, 0));
}

// ── fill_rect ─────────────────────────────────────────────────────────────────

#[test]
fn fill_rect_covers_pixel_centres() {
    let mut r = Raster::new(8, 8);
    r.set_fill(RED.into());
    r.fill_rect(0.0, 0.0, 4.0, 4.0);
    assert_eq!(rgb(&r, 0, 0), (255, 0, 0));
    assert_eq!(rgb(&r, 3, 3), (255, 0, 0));
    assert_eq!(rgb(&r, 4, 4), (0, 0, 0));
    assert_eq!(rgb(&r, 7, 0), (0, 0, 0));
}

#[test]
fn fill_rect_clips_to_buffer() {
    let mut r = Raster::new(4, 4);
    r.set_fill(RED.into());
    r.fill_rect(-10.0, -10.0, 100.0, 100.0);
    assert_eq!(rgb(&r, 0, 0), (255, 0, 0));
    assert_eq!(rgb(&r, 3, 3), (255, 0, 0));
}

#[test]
fn translucent_fill_blends_source_over() {
    let mut r = Raster::new(2, 2);
    r.set_fill(Color::WHITE.into());
    r.fill_rect(0.0, 0.0, 2.0, 2.0);
    r.set_fill(Color::BLACK.with_alpha(0.5).into());
    r.fill_rect(0.0, 0.0, 2.0, 2.0);
    assert_eq!(rgb(&r, 0, 0), (128, 128, 128));
}

#[test]
fn transparent_fill_changes_nothing() {
    let mut r = Raster::new(2, 2);
    r.set_fill(Color::WHITE.with_alpha(0.0).into());
    r.fill_rect(0.0, 0.0, 2.0, 2.0);
    assert_eq!(rgb(&r, 0, 0), (0, 0, 0));
}

#[test]
fn stroke_rect_outlines_only() {
    let mut r = Raster::new(10, 10);
    r.set_stroke(BLUE.into());
    r.stroke_rect(1.0, 1.0, 8.0, 8.0);
    assert_eq!(rgb(&r, 1, 1), (0, 0, 255));
    assert_eq!(rgb(&r, 8, 5), (0, 0, 255));
    assert_eq!(rgb(&r, 5, 5), (0, 0, 0));
}

// ── paths ─────────────────────────────────────────────────────────────────────

#[test]
fn filled_circle() {
    let mut r = Raster::new(20, 20);
    r.set_fill(RED.into());
    r.fill_circle(10.0, 10.0, 5.0);
    assert_eq!(rgb(&r, 10, 10), (255, 0, 0));
    assert_eq!(rgb(&r, 7, 10), (255, 0, 0));
    assert_eq!(rgb(&r, 0, 0), (0, 0, 0));
    assert_eq!(rgb(&r, 10, 17), (0, 0, 0));
}

#[test]
fn overlapping_subpaths_paint_once() {
    let mut r = Raster::new(12, 8);
    r.set_fill(Color::WHITE.with_alpha(0.5).into());
    r.begin_path();
    for x0 in [0.0, 3.0] {
        r.move_to(x0, 0.0);
        r.line_to(x0 + 6.0, 0.0);
        r.line_to(x0 + 6.0, 6.0);
        r.line_to(x0, 6.0);
        r.close_path();
    }
    r.fill();
    assert_eq!(rgb(&r, 4, 3), (128, 128, 128));
    assert_eq!(rgb(&r, 1, 3), (128, 128, 128));
    assert_eq!(rgb(&r, 10, 3), (0, 0, 0));
}

#[test]
fn stroke_draws_line() {
    let mut r = Raster::new(20, 10);
    r.set_stroke(BLUE.into());
    r.set_line_width(1.0);
    r.begin_path();
    r.move_to(0.0, 5.0);
    r.line_to(19.0, 5.0);
    r.stroke();
    assert_eq!(rgb(&r, 10, 5), (0, 0, 255));
    assert_eq!(rgb(&r, 10, 8), (0, 0, 0));
}

#[test]
fn stroked_arc_leaves_centre_empty() {
    let mut r = Raster::new(30, 30);
    r.set_stroke(BLUE.into());
    r.set_line_width(1.0);
    r.begin_path();
    r.arc(15.0, 15.0, 10.0, 0.0, TAU);
    r.stroke();
    assert_eq!(rgb(&r, 15, 15), (0, 0, 0));
    assert_eq!(rgb(&r, 25, 15), (0, 0, 255));
}

#[test]
fn fill_without_path_is_noop() {
    let mut r = Raster::new(4, 4);
    r.set_fill(RED.into());
    r.begin_path();
    r.fill();
    r.stroke();
    assert_eq!(rgb(&r, 1, 1), (0, 0, 0));
}

// ── transforms ────────────────────────────────────────────────────────────────

#[test]
fn save_restore_scopes_transform_and_paint() {
    let mut r = Raster::new(10, 10);
    r.set_fill(BLUE.into());
    r.save();
    r.translate(5.0, 5.0);
    r.set_fill(RED.into());
    r.fill_rect(0.0, 0.0, 2.0, 2.0);
    r.restore();
    r.fill_rect(0.0, 0.0, 1.0, 1.0);

    assert_eq!(rgb(&r, 5, 5), (255, 0, 0));
    assert_eq!(rgb(&r, 0, 0), (0, 0, 255));
    assert_eq!(rgb(&r, 2, 2), (0, 0, 0));
}

#[test]
fn restore_without_save_is_harmless() {
    let mut r = Raster::new(4, 4);
    r.restore();
    r.set_fill(RED.into());
    r.fill_rect(0.0, 0.0, 1.0, 1.0);
    assert_eq!(rgb(&r, 0, 0), (255, 0, 0));
}

#[test]
fn scale_maps_simulation_units_to_pixels() {
    let mut r = Raster::new(8, 8);
    r.scale(0.5, 0.5);
    r.set_fill(RED.into());
    r.fill_rect(0.0, 0.0, 8.0, 8.0);
    assert_eq!(rgb(&r, 3, 3), (255, 0, 0));
    assert_eq!(rgb(&r, 4, 4), (0, 0, 0));
}

// ── gradients ─────────────────────────────────────────────────────────────────

#[test]
fn linear_gradient_runs_dark_to_light() {
    let mut r = Raster::new(10, 1);
    r.set_fill(
        Paint::linear(0.0, 0.0, 10.0, 0.0)
            .stop(0.0, Color::BLACK)
            .stop(1.0, Color::WHITE),
    );
    r.fill_rect(0.0, 0.0, 10.0, 1.0);
    let left = rgb(&r, 0, 0).0;
    let right = rgb(&r, 9, 0).0;
    assert!(left < 30, "left {left}");
    assert!(right > 220, "right {right}");
    for x in 1..10 {
        assert!(rgb(&r, x, 0).0 >= rgb(&r, x - 1, 0).0);
    }
}

#[test]
fn gradient_follows_transform() {
    let mut r = Raster::new(20, 1);
    r.translate(10.0, 0.0);
    r.set_fill(
        Paint::linear(0.0, 0.0, 10.0, 0.0)
            .stop(0.0, Color::BLACK)
            .stop(1.0, Color::WHITE),
    );
    r.fill_rect(-10.0, 0.0, 20.0, 1.0);
    // Left of the gradient start clamps to the first stop.
    assert_eq!(rgb(&r, 5, 0), (0, 0, 0));
    assert!(rgb(&r, 19, 0).0 > 220);
}

#[test]
fn radial_gradient_centre_to_rim() {
    let paint = Paint::radial(0.0, 0.0, 0.0, 0.0, 0.0, 10.0)
        .stop(0.0, Color::WHITE)
        .stop(1.0, Color::BLACK);
    assert_eq!(paint.color_at(0.0, 0.0), Color::WHITE);
    assert_eq!(paint.color_at(10.0, 0.0), Color::BLACK);
    assert_eq!(paint.color_at(50.0, 0.0), Color::BLACK);
    let mid = paint.color_at(5.0, 0.0);
    assert!((120..=135).contains(&mid.r));
}
