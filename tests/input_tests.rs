// Host-side tests for keyboard shortcuts, panel clamping and the orbit camera.

use cake_web::camera::OrbitCamera;
use cake_web::constants::{CANDLE_COUNT_MAX, ORBIT_PERIOD_SEC};
use cake_web::core::{ParamChange, SceneParameters};
use cake_web::input::{
    action_for_key, candle_change, clamp_to_panel_range, key_reaches_shortcuts, KeyAction,
};
use std::f32::consts::{FRAC_PI_2, TAU};

#[test]
fn key_mapping() {
    assert_eq!(action_for_key("m"), Some(KeyAction::ToggleMusic));
    assert_eq!(action_for_key("M"), Some(KeyAction::ToggleMusic));
    assert_eq!(action_for_key(" "), Some(KeyAction::ToggleMusic));
    assert_eq!(action_for_key("]"), Some(KeyAction::AddCandle));
    assert_eq!(action_for_key("["), Some(KeyAction::RemoveCandle));
    assert_eq!(action_for_key("h"), Some(KeyAction::ToggleHud));
    assert_eq!(action_for_key("x"), None);
    assert_eq!(action_for_key("Enter"), None);
}

#[test]
fn focused_form_controls_keep_their_keys() {
    for tag in ["INPUT", "BUTTON", "TEXTAREA", "SELECT", "button"] {
        assert!(!key_reaches_shortcuts(Some(tag)), "{tag} should swallow keys");
    }
    for tag in ["BODY", "CANVAS", "DIV"] {
        assert!(key_reaches_shortcuts(Some(tag)), "{tag} should pass keys on");
    }
    assert!(key_reaches_shortcuts(None));
}

#[test]
fn candle_shortcuts_respect_limits() {
    let mut params = SceneParameters {
        candle_count: 0,
        ..Default::default()
    };
    assert_eq!(candle_change(&params, KeyAction::RemoveCandle), None);
    assert_eq!(
        candle_change(&params, KeyAction::AddCandle),
        Some(ParamChange::CandleCount(1))
    );

    params.candle_count = CANDLE_COUNT_MAX;
    assert_eq!(candle_change(&params, KeyAction::AddCandle), None);
    assert_eq!(
        candle_change(&params, KeyAction::RemoveCandle),
        Some(ParamChange::CandleCount(CANDLE_COUNT_MAX - 1))
    );
    assert_eq!(candle_change(&params, KeyAction::ToggleMusic), None);
}

#[test]
fn panel_edits_are_clamped() {
    assert_eq!(
        clamp_to_panel_range(ParamChange::RotationSpeed(-3.0)),
        ParamChange::RotationSpeed(0.0)
    );
    assert_eq!(
        clamp_to_panel_range(ParamChange::BloomStrength(10.0)),
        ParamChange::BloomStrength(3.0)
    );
    assert_eq!(
        clamp_to_panel_range(ParamChange::CandleCount(99)),
        ParamChange::CandleCount(CANDLE_COUNT_MAX)
    );
    assert_eq!(
        clamp_to_panel_range(ParamChange::ParticleSize(0.4)),
        ParamChange::ParticleSize(0.4)
    );
}

#[test]
fn camera_orbits_once_per_period() {
    let mut cam = OrbitCamera::default();
    let start = cam.eye();
    cam.advance(ORBIT_PERIOD_SEC / 4.0, 1.0);
    assert!((cam.angle - FRAC_PI_2).abs() < 1e-4);
    let quarter = cam.eye();
    assert!((quarter.x - cam.distance).abs() < 1e-3);
    assert!(quarter.z.abs() < 1e-3);
    assert_eq!(quarter.y, start.y);

    cam.advance(ORBIT_PERIOD_SEC * 3.0 / 4.0, 1.0);
    assert!(cam.angle < 1e-3 || (TAU - cam.angle) < 1e-3);
}

#[test]
fn zero_speed_holds_the_camera_still() {
    let mut cam = OrbitCamera::default();
    cam.advance(10.0, 0.0);
    assert_eq!(cam.angle, 0.0);
}

#[test]
fn viewport_sets_aspect_and_ignores_zero_sizes() {
    let mut cam = OrbitCamera::default();
    cam.set_viewport(800, 400);
    assert_eq!(cam.aspect, 2.0);
    cam.set_viewport(0, 400);
    assert_eq!(cam.aspect, 2.0);
    let proj = cam.projection_matrix();
    assert!(proj.is_finite());
    let view = cam.view_matrix();
    // Origin lands in front of the camera at the orbit distance
    let origin = view.transform_point3(glam::Vec3::ZERO);
    assert!((origin.length() - cam.eye().length()).abs() < 1e-3);
    assert!(origin.z < 0.0);
}
