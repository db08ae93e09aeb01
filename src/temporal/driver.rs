//! Timer-owning wrapper around `PlaybackClock`
//!
//! One tokio task owns the clock and its only interval. Commands arrive over
//! an mpsc channel and every state change is published on a watch channel.
//! Dropping the driver aborts the task, so replacing a driver never leaves a
//! second timer advancing the cursor.

use super::clock::{ClockStatus, PlaybackClock};
use crate::config::PlaybackConfig;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClockError {
    #[error("clock driver has stopped")]
    Stopped,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Play,
    Pause,
    Toggle,
    Seek(DateTime<Utc>),
}

/// Handle to a running playback clock
pub struct ClockDriver {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<ClockStatus>,
    task: JoinHandle<()>,
}

impl ClockDriver {
    /// Start the clock task. Must be called inside a tokio runtime.
    pub fn spawn(clock: PlaybackClock, config: &PlaybackConfig) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(clock.status());
        let period = config.tick_interval().max(Duration::from_millis(1));

        let task = tokio::spawn(run(clock, period, command_rx, status_tx));

        ClockDriver {
            commands,
            status,
            task,
        }
    }

    pub fn play(&self) -> Result<(), ClockError> {
        self.send(Command::Play)
    }

    pub fn pause(&self) -> Result<(), ClockError> {
        self.send(Command::Pause)
    }

    pub fn toggle(&self) -> Result<(), ClockError> {
        self.send(Command::Toggle)
    }

    /// Move the cursor and pause
    pub fn seek(&self, t: DateTime<Utc>) -> Result<(), ClockError> {
        self.send(Command::Seek(t))
    }

    /// Latest published status
    pub fn status(&self) -> ClockStatus {
        *self.status.borrow()
    }

    /// Receiver notified on every status change
    pub fn subscribe(&self) -> watch::Receiver<ClockStatus> {
        self.status.clone()
    }

    /// Stop the task and its timer
    pub fn shutdown(self) {
        // Drop aborts the task
    }

    fn send(&self, command: Command) -> Result<(), ClockError> {
        self.commands.send(command).map_err(|_| ClockError::Stopped)
    }
}

impl Drop for ClockDriver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    mut clock: PlaybackClock,
    period: Duration,
    mut commands: mpsc::UnboundedReceiver<Command>,
    status: watch::Sender<ClockStatus>,
) {
    // first tick one full period out, even for a clock spawned running
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                let was_running = clock.is_running();
                match command {
                    Command::Play => clock.play(),
                    Command::Pause => clock.pause(),
                    Command::Toggle => clock.toggle(),
                    Command::Seek(t) => clock.seek(t),
                }
                if clock.is_running() && !was_running {
                    // first advance one full period after play
                    ticker.reset();
                }
                status.send_replace(clock.status());
            }
            _ = ticker.tick(), if clock.is_running() => {
                let next = clock.tick();
                status.send_replace(next);
            }
        }
    }

    debug!("clock driver stopped");
}
