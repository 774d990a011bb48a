//! # Playback
//!
//! Interactive preview: a tick-driven clock that advances through the
//! timeline, and a player that redraws a render surface on every tick.
//!
//! The clock itself is a plain state machine with no notion of wall time;
//! [`PreviewPlayer::run`] feeds it from a tokio interval, which tests swap
//! for tokio's paused clock.

pub mod clock;
pub mod player;

pub use clock::{PlaybackClock, PlaybackState, TickOutcome, DEFAULT_TICK_MS};
pub use player::PreviewPlayer;
