use thiserror::Error;

/// Rejected [`Config`](crate::config::Config) values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("frame rate must be at least 1 FPS")]
    ZeroFrameRate,
    #[error("scene interval must be a positive number of seconds, got {0}")]
    InvalidSceneInterval(f32),
    #[error("transitions must last at least one frame")]
    ZeroTransitionFrames,
    #[error("pixel scale must be a positive finite number, got {0}")]
    InvalidPixelScale(f32),
    #[error("pointer radius must be a positive finite number, got {0}")]
    InvalidPointerRadius(f32),
}
