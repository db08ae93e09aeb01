//! Temporal resolution of link validity and the playback clock
//!
//! - `timeline`: parse/sort link intervals, resolve active links per instant
//! - `clock`: pure play/pause/seek/tick state machine over the time cursor
//! - `driver`: tokio task owning the clock's single timer

pub mod clock;
pub mod driver;
pub mod timeline;

pub use clock::{ClockState, ClockStatus, PlaybackClock};
pub use driver::{ClockDriver, ClockError};
pub use timeline::{parse_timestamp, LinkTimeline, PairHistory, TemporalView, TimedLink, TIMESTAMP_FORMAT};
