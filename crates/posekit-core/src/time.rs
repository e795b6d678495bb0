//! Playback timing for the viewer
//!
//! Pose playback runs at a fixed nominal frame rate. The host's animation
//! callback may fire faster or slower than that; the scheduler compares real
//! elapsed time against [`PlaybackConfig::frame_period`] instead of counting
//! callbacks.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_FRAME_RATE: f32 = 30.0;

/// Configuration for pose playback timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Nominal playback rate in frames per second
    pub frame_rate: f32,
    /// Timeline length used for models that only carry embedded clips
    pub embedded_clip_frames: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            embedded_clip_frames: 100,
        }
    }
}

impl PlaybackConfig {
    /// Time one frame is held before the cursor may advance.
    /// Rates that are not positive and finite, or too small to express as a
    /// period, fall back to the default 30 fps.
    pub fn frame_period(&self) -> Duration {
        let fallback = Duration::from_secs_f64(1.0 / DEFAULT_FRAME_RATE as f64);
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return fallback;
        }
        Duration::try_from_secs_f64(1.0 / self.frame_rate as f64).unwrap_or(fallback)
    }

    /// Seconds into an embedded clip at the given frame index
    pub fn clip_time(&self, frame: usize) -> f32 {
        self.frame_period().as_secs_f32() * frame as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_period() {
        let config = PlaybackConfig::default();
        let period = config.frame_period();
        assert!(period > Duration::from_millis(33));
        assert!(period < Duration::from_millis(34));
    }

    #[test]
    fn test_invalid_rate_falls_back() {
        let config = PlaybackConfig {
            frame_rate: 0.0,
            ..Default::default()
        };
        assert_eq!(config.frame_period(), PlaybackConfig::default().frame_period());
    }

    #[test]
    fn test_degenerate_rates_fall_back() {
        let default = PlaybackConfig::default().frame_period();
        for frame_rate in [1e-30, f32::MIN_POSITIVE, f32::NAN, f32::INFINITY, -5.0] {
            let config = PlaybackConfig {
                frame_rate,
                ..Default::default()
            };
            assert_eq!(config.frame_period(), default, "rate {frame_rate}");
        }
    }

    #[test]
    fn test_clip_time() {
        let config = PlaybackConfig {
            frame_rate: 10.0,
            ..Default::default()
        };
        assert!((config.clip_time(5) - 0.5).abs() < 1e-6);
    }
}
