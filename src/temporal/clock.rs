//! Playback clock state machine
//!
//! Pure and timer-free: the caller (usually `ClockDriver`) calls `tick()` once
//! per period.

use super::timeline::LinkTimeline;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockState {
    Paused,
    Running,
}

/// What the presentation layer sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockStatus {
    pub instant: DateTime<Utc>,
    pub running: bool,
}

/// Time cursor bounded by `[min, max]`
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    min: DateTime<Utc>,
    max: DateTime<Utc>,
    cursor: DateTime<Utc>,
    step: TimeDelta,
    state: ClockState,
}

impl PlaybackClock {
    /// Paused clock at `min` that sweeps to `max` in `steps` ticks
    pub fn new(min: DateTime<Utc>, max: DateTime<Utc>, steps: u32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let steps = i32::try_from(steps.max(1)).unwrap_or(i32::MAX);
        // nonzero so a zero-width range still terminates
        let step = ((max - min) / steps).max(TimeDelta::nanoseconds(1));

        PlaybackClock {
            min,
            max,
            cursor: min,
            step,
            state: ClockState::Paused,
        }
    }

    /// Clock over the timeline's start instants; `None` when it has none
    pub fn for_timeline(timeline: &LinkTimeline<'_>, steps: u32) -> Option<Self> {
        let (min, max) = timeline.bounds()?;
        Some(Self::new(min, max, steps))
    }

    pub fn min(&self) -> DateTime<Utc> {
        self.min
    }

    pub fn max(&self) -> DateTime<Utc> {
        self.max
    }

    pub fn step(&self) -> TimeDelta {
        self.step
    }

    pub fn cursor(&self) -> DateTime<Utc> {
        self.cursor
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn status(&self) -> ClockStatus {
        ClockStatus {
            instant: self.cursor,
            running: self.is_running(),
        }
    }

    pub fn play(&mut self) {
        if self.state == ClockState::Paused {
            info!(instant = %self.cursor, "playback started");
            self.state = ClockState::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            info!(instant = %self.cursor, "playback paused");
            self.state = ClockState::Paused;
        }
    }

    pub fn toggle(&mut self) {
        match self.state {
            ClockState::Paused => self.play(),
            ClockState::Running => self.pause(),
        }
    }

    /// Move the cursor (clamped to the bounds); always pauses.
    pub fn seek(&mut self, t: DateTime<Utc>) {
        self.cursor = t.clamp(self.min, self.max);
        self.pause();
    }

    /// Advance one step while running. Reaching `max` pauses.
    pub fn tick(&mut self) -> ClockStatus {
        if self.is_running() {
            if self.cursor < self.max {
                self.cursor = (self.cursor + self.step).min(self.max);
            }
            if self.cursor >= self.max {
                self.pause();
            }
        }
        self.status()
    }
}
