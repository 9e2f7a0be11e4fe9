// Host-side tests for the pure front-end helpers.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod input {
    include!("../src/input.rs");
}

use constants::*;
use glam::Vec2;
use input::*;

#[test]
fn backing_size_scales_by_device_pixel_ratio() {
    assert_eq!(backing_size(800.0, 600.0, 2.0), (1600, 1200));
    assert_eq!(backing_size(333.3, 100.0, 1.5), (500, 150));
}

#[test]
fn backing_size_never_collapses_to_zero() {
    assert_eq!(backing_size(0.0, 0.0, 2.0), (1, 1));
    assert_eq!(backing_size(-10.0, 50.0, 1.0), (1, 50));
}

#[test]
fn backing_size_ignores_bad_ratios() {
    assert_eq!(backing_size(100.0, 50.0, 0.0), (100, 50));
    assert_eq!(backing_size(100.0, 50.0, f64::NAN), (100, 50));
}

#[test]
fn ndc_maps_corners_and_centre() {
    let w = 400.0;
    let h = 200.0;
    assert_eq!(css_to_ndc(0.0, 0.0, w, h), Some(Vec2::new(-1.0, 1.0)));
    assert_eq!(css_to_ndc(w, h, w, h), Some(Vec2::new(1.0, -1.0)));
    assert_eq!(css_to_ndc(200.0, 100.0, w, h), Some(Vec2::ZERO));
}

#[test]
fn ndc_needs_an_element_with_area() {
    assert_eq!(css_to_ndc(10.0, 10.0, 0.0, 100.0), None);
    assert_eq!(css_to_ndc(10.0, 10.0, 100.0, f32::NAN), None);
}

#[test]
fn short_drag_is_a_click() {
    let mut drag = DragState::default();
    drag.begin(Vec2::new(10.0, 10.0));
    drag.drag_to(Vec2::new(11.0, 11.0));
    assert!(!drag.is_rotating());
    assert!(drag.end());
    assert!(!drag.active);
}

#[test]
fn long_drag_rotates_and_is_not_a_click() {
    let mut drag = DragState::default();
    drag.begin(Vec2::ZERO);
    let d = drag.drag_to(Vec2::new(30.0, 0.0));
    assert_eq!(d, Vec2::new(30.0, 0.0));
    assert!(drag.is_rotating());
    assert!(!drag.end());
}

#[test]
fn drag_accumulates_path_length() {
    let mut drag = DragState::default();
    drag.begin(Vec2::ZERO);
    // back and forth never strays far but still travels
    drag.drag_to(Vec2::new(3.0, 0.0));
    drag.drag_to(Vec2::new(0.0, 0.0));
    assert!(drag.travelled >= CLICK_SLOP_PX);
    assert!(!drag.end());
}

#[test]
fn moves_without_a_press_do_nothing() {
    let mut drag = DragState::default();
    assert_eq!(drag.drag_to(Vec2::new(50.0, 50.0)), Vec2::ZERO);
    assert!(!drag.end());
}

#[test]
fn orbit_delta_uses_drag_sensitivity() {
    let (az, polar) = orbit_delta(Vec2::new(100.0, -40.0));
    assert!((az - 100.0 * ORBIT_RADIANS_PER_PX).abs() < 1e-6);
    assert!((polar + 40.0 * ORBIT_RADIANS_PER_PX).abs() < 1e-6);
}

#[test]
fn wheel_zoom_direction_and_neutral_cases() {
    assert!(wheel_zoom_factor(120.0) > 1.0);
    assert!(wheel_zoom_factor(-120.0) < 1.0);
    assert_eq!(wheel_zoom_factor(0.0), 1.0);
    assert_eq!(wheel_zoom_factor(f64::INFINITY), 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn atlas_has_a_cell_for_every_skill() {
    assert!((ATLAS_COLS * ATLAS_ROWS) as usize >= folio_core::SKILLS.len());
    assert_eq!(ATLAS_CELL_PX, folio_core::constants::LABEL_TEXTURE_SIZE);
}

#[test]
fn element_ids_are_distinct() {
    let ids = [
        PARTICLE_CANVAS_ID,
        SNOW_CANVAS_ID,
        KEYBOARD_CANVAS_ID,
        CURSOR_DOT_ID,
        CURSOR_FOLLOWER_ID,
    ];
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn cursor_selector_covers_links_buttons_and_opt_in_elements() {
    let parts: Vec<&str> = INTERACTIVE_SELECTOR.split(',').map(str::trim).collect();
    for wanted in ["a", "button", "[data-cursor-hover]"] {
        assert!(parts.contains(&wanted), "missing {wanted}");
    }
}
