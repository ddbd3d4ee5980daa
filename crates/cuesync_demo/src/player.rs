// SPDX-License-Identifier: MIT OR Apache-2.0
//! Simulated media element.
//!
//! Behaves like a browser media element as far as the session can tell:
//! - attaching a source resets the clock and queues a zero-time update
//! - while playing, time advances in jittered steps with an update per step
//! - reaching the duration emits a final update, then `Ended`

use crate::playlist::MediaSource;
use cuesync_core::{MediaElement, MediaEvent};
use rand::Rng;

/// Player state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// Nothing attached, or paused
    #[default]
    Idle,
    /// Advancing the clock
    Playing,
    /// The attached source reached its end
    Finished,
}

/// A media element driven by a random clock
#[derive(Debug)]
pub struct SimulatedPlayer {
    source: Option<MediaSource>,
    time: f64,
    state: PlayerState,
    autoplay: bool,
    /// Mean spacing between time updates, in seconds
    tick: f64,
    pending_initial_update: bool,
}

impl SimulatedPlayer {
    /// Create a player emitting updates roughly every `tick` seconds
    pub fn new(tick: f64) -> Self {
        Self {
            source: None,
            time: 0.0,
            state: PlayerState::Idle,
            autoplay: false,
            tick: tick.max(0.001),
            pending_initial_update: false,
        }
    }

    /// Start playing the attached source
    pub fn play(&mut self) {
        if self.source.is_some() && self.state == PlayerState::Idle {
            self.state = PlayerState::Playing;
        }
    }

    /// Current state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// The attached source
    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    /// Produce the next notification, or `None` once nothing is playing
    pub fn poll<R: Rng>(&mut self, rng: &mut R) -> Option<MediaEvent> {
        if self.pending_initial_update {
            self.pending_initial_update = false;
            return Some(MediaEvent::TimeUpdate);
        }

        match self.state {
            PlayerState::Idle | PlayerState::Finished => None,
            PlayerState::Playing => {
                let duration = self.duration();
                if self.time >= duration {
                    self.state = PlayerState::Finished;
                    return Some(MediaEvent::Ended);
                }
                let step = self.tick * rng.random_range(0.5..1.5);
                self.time = (self.time + step).min(duration);
                Some(MediaEvent::TimeUpdate)
            }
        }
    }
}

impl MediaElement<MediaSource> for SimulatedPlayer {
    fn current_time(&self) -> f64 {
        self.time
    }

    fn duration(&self) -> f64 {
        self.source.as_ref().map_or(f64::NAN, |s| s.duration)
    }

    fn attach(&mut self, source: &MediaSource) {
        tracing::debug!(path = %source.path, duration = source.duration, "Attached source");
        self.source = Some(source.clone());
        self.time = 0.0;
        self.pending_initial_update = true;
        self.state = if self.autoplay {
            PlayerState::Playing
        } else {
            PlayerState::Idle
        };
    }

    fn set_autoplay(&mut self, autoplay: bool) {
        self.autoplay = autoplay;
    }
}
