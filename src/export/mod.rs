//! # Export
//!
//! Headless production of artifacts from a timeline.
//!
//! - [`ExportOrchestrator::export_reel`]: render every slide once through the
//!   render surface into a capture session
//! - [`export_photo`]: one filtered slide at native resolution
//! - [`passthrough_clips`]: existing video clips handed back per clip
//!
//! Project data export lives with the store in [`crate::storage`].

pub mod artifact;
pub mod options;
pub mod orchestrator;
pub mod passthrough;
pub mod photo;

pub use artifact::Artifact;
pub use options::{
    AspectPreset, Dimensions, ExportFormat, ExportOptions, QualityTier, DEFAULT_FPS, MAX_FPS,
};
pub use orchestrator::{EncoderFactory, ExportOrchestrator};
pub use passthrough::passthrough_clips;
pub use photo::export_photo;
