use std::path::PathBuf;
use std::sync::Arc;

use image::RgbImage;
use tokio::task;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DecodeError, Result};
use crate::filters::FilterParams;

/// Where a slide's pixels come from
///
/// Decoding is lazy: a source is only turned into pixels when playback or
/// export asks for it.
#[derive(Debug, Clone)]
pub enum PixelSource {
    /// Image file on disk (JPEG or PNG)
    File(PathBuf),

    /// Encoded image bytes already in memory
    Encoded { name: String, bytes: Arc<[u8]> },

    /// Pixels that are already decoded
    Decoded(Arc<RgbImage>),
}

impl PixelSource {
    /// Human-readable name used in errors and logs
    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Encoded { name, .. } => name.clone(),
            Self::Decoded(image) => format!("<decoded {}x{}>", image.width(), image.height()),
        }
    }

    /// Resolve the source into RGB pixels
    pub async fn decode(&self) -> Result<Arc<RgbImage>> {
        let (name, bytes): (String, Arc<[u8]>) = match self {
            Self::Decoded(image) => return Ok(Arc::clone(image)),
            Self::Encoded { name, bytes } => (name.clone(), Arc::clone(bytes)),
            Self::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|_| DecodeError::LoadFailed {
                    source_name: path.display().to_string(),
                })?;
                (path.display().to_string(), Arc::from(bytes))
            }
        };

        debug!("Decoding {} ({} bytes)", name, bytes.len());

        let decode_name = name.clone();
        let decoded = task::spawn_blocking(move || {
            image::load_from_memory(&bytes)
                .map(|image| image.to_rgb8())
                .map_err(|e| DecodeError::DecodeFailed {
                    source_name: decode_name,
                    reason: e.to_string(),
                })
        })
        .await
        .map_err(|e| DecodeError::DecodeFailed {
            source_name: name,
            reason: format!("decoder task failed: {}", e),
        })??;

        Ok(Arc::new(decoded))
    }
}

/// One still image with its color adjustments
#[derive(Debug, Clone)]
pub struct Slide {
    /// Stable identifier
    pub id: String,

    /// Pixel source handle
    pub source: PixelSource,

    /// Color adjustments; `None` means the identity transform
    pub filters: Option<FilterParams>,

    /// Whether the user (or an analyzer) has adjusted this slide
    pub edited: bool,

    /// Per-slide override of the timeline duration
    pub duration_ms: Option<u64>,
}

impl Slide {
    /// Create an unedited slide with a fresh id
    pub fn new(source: PixelSource) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source,
            filters: None,
            edited: false,
            duration_ms: None,
        }
    }

    pub fn from_path<P: Into<PathBuf>>(path: P) -> Self {
        Self::new(PixelSource::File(path.into()))
    }

    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = id.into();
        self
    }

    /// Attach filter parameters and mark the slide edited
    pub fn with_filters(mut self, filters: FilterParams) -> Self {
        self.filters = Some(filters);
        self.edited = true;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Filters to render with, defaulting to identity
    pub fn effective_filters(&self) -> FilterParams {
        self.filters.unwrap_or_default()
    }

    /// Decode this slide's pixels
    pub async fn load(&self) -> Result<LoadedSlide> {
        let pixels = self.source.decode().await?;
        Ok(LoadedSlide {
            slide: self.clone(),
            pixels,
        })
    }
}

/// A slide whose source has been decoded and is ready to draw
#[derive(Debug, Clone)]
pub struct LoadedSlide {
    pub slide: Slide,
    pub pixels: Arc<RgbImage>,
}
