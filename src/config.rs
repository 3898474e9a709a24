use std::time::Duration;

use crate::error::ConfigError;

/// Runtime tuning for the engine and its host.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Simulation frames per second; every per-frame constant assumes 60.
    pub fps: u32,
    /// Seconds between automatic scene switches.
    pub scene_interval_secs: f32,
    /// Frames spent in each half of a transition.
    pub transition_frames: u32,
    /// Seed for the simulation RNG.  `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Simulation units per raster pixel.
    pub pixel_scale: f32,
    /// Pointer influence radius in simulation units.
    pub pointer_radius: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fps: 60,
            scene_interval_secs: 15.0,
            transition_frames: 25,
            seed: None,
            pixel_scale: 6.0,
            pointer_radius: 80.0,
        }
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if !positive(self.scene_interval_secs) {
            return Err(ConfigError::InvalidSceneInterval(self.scene_interval_secs));
        }
        if self.transition_frames == 0 {
            return Err(ConfigError::ZeroTransitionFrames);
        }
        if !positive(self.pixel_scale) {
            return Err(ConfigError::InvalidPixelScale(self.pixel_scale));
        }
        if !positive(self.pointer_radius) {
            return Err(ConfigError::InvalidPointerRadius(self.pointer_radius));
        }
        Ok(())
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    /// Automatic switch period expressed in frames (at least one).
    pub fn switch_interval_frames(&self) -> u64 {
        (f64::from(self.scene_interval_secs) * f64::from(self.fps)).round().max(1.0) as u64
    }
}
