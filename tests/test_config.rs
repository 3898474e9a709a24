use std::time::Duration;

use microcosm::{logging, Config, ConfigError};

#[test]
fn defaults_are_valid() {
    let c = Config::default();
    assert_eq!(c.validate(), Ok(()));
    assert_eq!(c.fps, 60);
    assert_eq!(c.transition_frames, 25);
    assert_eq!(c.seed, None);
}

#[test]
fn default_switch_interval_is_fifteen_seconds() {
    assert_eq!(Config::default().switch_interval_frames(), 900);
}

#[test]
fn switch_interval_is_at_least_one_frame() {
    let c = Config { scene_interval_secs: 0.001, ..Config::default() };
    assert_eq!(c.switch_interval_frames(), 1);
}

#[test]
fn frame_duration_matches_fps() {
    let c = Config { fps: 50, ..Config::default() };
    assert_eq!(c.frame_duration(), Duration::from_millis(20));
}

#[test]
fn rejects_zero_fps() {
    let c = Config { fps: 0, ..Config::default() };
    assert_eq!(c.validate(), Err(ConfigError::ZeroFrameRate));
}

#[test]
fn rejects_bad_interval() {
    let c = Config { scene_interval_secs: -1.0, ..Config::default() };
    assert_eq!(c.validate(), Err(ConfigError::InvalidSceneInterval(-1.0)));
    let c = Config { scene_interval_secs: f32::NAN, ..Config::default() };
    assert!(matches!(c.validate(), Err(ConfigError::InvalidSceneInterval(_))));
}

#[test]
fn rejects_zero_transition() {
    let c = Config { transition_frames: 0, ..Config::default() };
    assert_eq!(c.validate(), Err(ConfigError::ZeroTransitionFrames));
}

#[test]
fn rejects_bad_scale_and_radius() {
    let c = Config { pixel_scale: 0.0, ..Config::default() };
    assert_eq!(c.validate(), Err(ConfigError::InvalidPixelScale(0.0)));
    let c = Config { pointer_radius: f32::INFINITY, ..Config::default() };
    assert_eq!(c.validate(), Err(ConfigError::InvalidPointerRadius(f32::INFINITY)));
}

#[test]
fn error_messages_name_the_value() {
    let msg = ConfigError::InvalidPixelScale(-2.0).to_string();
    assert!(msg.contains("-2"), "{msg}");
}

#[test]
fn logging_init_is_idempotent() {
    assert!(logging::init(false, None).is_ok());
    assert!(logging::init(true, None).is_ok());
}
