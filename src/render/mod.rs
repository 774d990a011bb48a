//! # Render Surface
//!
//! A pixel buffer sized to the reel's aspect ratio, onto which slides are
//! drawn with their filters and entering transition applied.
//!
//! Playback and export each own their own surface instance; nothing here is
//! shared between the two paths except the drawing code itself.

pub mod fit;
pub mod frame;
pub mod surface;

pub use fit::aspect_fill;
pub use frame::Frame;
pub use surface::{RenderSurface, SoftwareSurface};
