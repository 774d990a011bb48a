//! # Capture/Encode Pipeline
//!
//! Turns a stream of rendered frames into one finished artifact.
//!
//! A [`CaptureSession`] owns a [`FrameEncoder`] backend and accumulates the
//! byte chunks it emits in arrival order. Stopping the session finalizes the
//! encoder and concatenates every chunk; any encoder failure discards what
//! was accumulated so no partial artifact can escape.
//!
//! Backends:
//! - [`FfmpegEncoder`]: raw RGB frames piped into an external `ffmpeg`
//!   process, container bytes read back from its stdout
//! - [`StillImageEncoder`]: keeps the first frame and emits a single PNG

pub mod encoder;
pub mod ffmpeg;
pub mod session;
pub mod still;

pub use encoder::FrameEncoder;
pub use ffmpeg::{FfmpegEncoder, FfmpegSettings};
pub use session::{CaptureReport, CaptureSession};
pub use still::StillImageEncoder;
