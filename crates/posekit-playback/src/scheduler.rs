//! Time-gated frame cursor.
//!
//! The host calls [`FrameScheduler::tick`] once per animation callback with
//! a monotonic timestamp. The cursor moves one step only once more than a
//! nominal frame period has elapsed since the last step, so playback speed
//! does not depend on how often the host calls back.

use std::time::Duration;

use posekit_core::PlaybackConfig;
use serde::Serialize;
use tracing::debug;

/// Cursor position and play flag observed by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlaybackState {
    pub current_frame: usize,
    pub is_playing: bool,
    /// Timestamp of the last advance (or of the seeding tick after `play`)
    pub last_tick: Option<Duration>,
}

/// Idle/Playing state machine over a timeline of `total_frames` frames.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    period: Duration,
    total_frames: usize,
    state: PlaybackState,
}

impl FrameScheduler {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            period: config.frame_period(),
            total_frames: 0,
            state: PlaybackState::default(),
        }
    }

    /// Start a fresh timeline: cursor at 0, paused.
    pub fn load(&mut self, total_frames: usize) {
        self.total_frames = total_frames;
        self.state = PlaybackState::default();
    }

    /// Deregister from the tick source. Nothing advances until the next
    /// [`load`](Self::load).
    pub fn stop(&mut self) {
        if self.state.is_playing {
            debug!("Playback stopped at frame {}", self.state.current_frame);
        }
        self.load(0);
    }

    /// Idle → Playing. Returns whether the state changed; no-op when already
    /// playing or when there is nothing to play.
    pub fn play(&mut self) -> bool {
        if self.state.is_playing || self.total_frames == 0 {
            return false;
        }
        self.state.is_playing = true;
        self.state.last_tick = None;
        debug!("Playback started at frame {}", self.state.current_frame);
        true
    }

    /// Playing → Idle, keeping the cursor where it is.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_playing {
            return false;
        }
        self.state.is_playing = false;
        self.state.last_tick = None;
        debug!("Playback paused at frame {}", self.state.current_frame);
        true
    }

    /// Play when idle, pause when playing.
    pub fn toggle(&mut self) -> bool {
        if self.state.is_playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Advance at most one frame. Returns the new frame index when the
    /// cursor moved.
    pub fn tick(&mut self, now: Duration) -> Option<usize> {
        if !self.state.is_playing || self.total_frames == 0 {
            return None;
        }

        let Some(last) = self.state.last_tick else {
            self.state.last_tick = Some(now);
            return None;
        };

        if now.saturating_sub(last) <= self.period {
            return None;
        }

        self.state.current_frame = (self.state.current_frame + 1) % self.total_frames;
        self.state.last_tick = Some(now);
        Some(self.state.current_frame)
    }

    /// Jump straight to `frame`, wrapped into the timeline. Leaves the play
    /// flag alone.
    pub fn scrub_to(&mut self, frame: usize) -> usize {
        self.state.current_frame = if self.total_frames == 0 {
            0
        } else {
            frame % self.total_frames
        };
        self.state.current_frame
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_frame(&self) -> usize {
        self.state.current_frame
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn frame_period(&self) -> Duration {
        self.period
    }
}
