//! # Filter Pipeline
//!
//! Per-slide color adjustments: brightness, contrast, saturation and blur.
//!
//! [`apply`] is the single implementation used by both live preview and
//! export. The render surface calls it on the aspect-filled slide pixels, so
//! a frame drawn during playback is byte-identical to the frame handed to the
//! encoder.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reel_composer::filters::{self, FilterParams};
//! use image::RgbImage;
//!
//! let pixels = RgbImage::new(64, 64);
//! let params = FilterParams { contrast: 120.0, ..FilterParams::default() };
//! let adjusted = filters::apply(&pixels, &params);
//! ```

pub mod params;
pub mod pipeline;
pub mod presets;

pub use params::FilterParams;
pub use pipeline::apply;
pub use presets::{find as find_preset, FilterPreset, PRESETS};
