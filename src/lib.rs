//! # Reel-Composer
//!
//! Compose still images into timed, transition-animated reels, preview them
//! live, and export them as encoded media.
//!
//! Live preview and export share one render path: the same filter pipeline,
//! the same transition math and the same render surface, so what plays in
//! preview is what lands in the exported file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reel_composer::{
//!     cancel::CancelToken,
//!     export::{ExportOptions, ExportOrchestrator},
//!     timeline::{Slide, Timeline},
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let mut timeline = Timeline::new(1500).with_transition("auto-mix");
//! timeline.push(Slide::from_path("beach.jpg"));
//! timeline.push(Slide::from_path("sunset.jpg"));
//!
//! let mut orchestrator = ExportOrchestrator::default();
//! let artifact = orchestrator
//!     .export_reel(&timeline, &ExportOptions::default(), &CancelToken::new(), |p| {
//!         println!("{:.0}%", p * 100.0)
//!     })
//!     .await?;
//! artifact.save_to(".").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`timeline`] - Slides, pixel sources and the ordered timeline
//! - [`filters`] - Brightness/contrast/saturation/blur pipeline and presets
//! - [`transitions`] - Transition catalog and the auto-mix selector
//! - [`render`] - Frames and the software render surface
//! - [`playback`] - Tick-driven preview clock and player
//! - [`capture`] - Frame encoders and the chunk-accumulating capture session
//! - [`export`] - Export options, artifacts and the headless orchestrator
//! - [`storage`] - JSON project store
//! - [`analysis`] - Scene analysis and automatic enhancement
//! - [`config`] - Configuration management

pub mod analysis;
pub mod cancel;
pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod filters;
pub mod playback;
pub mod render;
pub mod storage;
pub mod timeline;
pub mod transitions;

// Re-export commonly used types for convenience
pub use crate::{
    analysis::{HeuristicAnalyzer, ReelEngine, SceneAnalyzer},
    cancel::CancelToken,
    config::Config,
    error::{ReelError, Result},
    export::{Artifact, ExportOptions, ExportOrchestrator},
    filters::FilterParams,
    playback::{PlaybackClock, PreviewPlayer},
    render::{RenderSurface, SoftwareSurface},
    storage::ProjectStore,
    timeline::{Slide, Timeline},
    transitions::{TransitionCatalog, TransitionSelector},
};
