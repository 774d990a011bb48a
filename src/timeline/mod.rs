//! # Timeline Model
//!
//! The ordered sequence of slides that defines a reel. A timeline is handed to
//! playback or export as a snapshot: both paths clone it at the start of the
//! call, so edits made afterwards never reach an in-flight render.

pub mod slide;

pub use slide::{LoadedSlide, PixelSource, Slide};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::transitions::AUTO_MIX;

/// Default time each slide stays on screen
pub const DEFAULT_SLIDE_DURATION_MS: u64 = 1000;

/// Named slide duration choices offered to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationPreset {
    Quick,
    Normal,
    Slow,
    Cinematic,
}

impl DurationPreset {
    pub fn millis(self) -> u64 {
        match self {
            Self::Quick => 500,
            Self::Normal => 1000,
            Self::Slow => 1500,
            Self::Cinematic => 2000,
        }
    }

    pub fn all() -> [DurationPreset; 4] {
        [Self::Quick, Self::Normal, Self::Slow, Self::Cinematic]
    }
}

/// Ordered slides plus a global per-slide duration and transition mode
#[derive(Debug, Clone)]
pub struct Timeline {
    slides: Vec<Slide>,
    slide_duration_ms: u64,
    transition_mode: String,
}

impl Timeline {
    /// Create an empty timeline with the given per-slide duration
    pub fn new(slide_duration_ms: u64) -> Self {
        Self {
            slides: Vec::new(),
            slide_duration_ms,
            transition_mode: AUTO_MIX.to_string(),
        }
    }

    /// Build a timeline from slides in display order
    pub fn from_slides(slides: Vec<Slide>, slide_duration_ms: u64) -> Self {
        Self {
            slides,
            ..Self::new(slide_duration_ms)
        }
    }

    pub fn with_transition<S: Into<String>>(mut self, mode: S) -> Self {
        self.transition_mode = mode.into();
        self
    }

    pub fn push(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slides_mut(&mut self) -> &mut [Slide] {
        &mut self.slides
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slide_duration_ms(&self) -> u64 {
        self.slide_duration_ms
    }

    pub fn set_slide_duration_ms(&mut self, duration_ms: u64) {
        self.slide_duration_ms = duration_ms;
    }

    pub fn transition_mode(&self) -> &str {
        &self.transition_mode
    }

    pub fn set_transition_mode<S: Into<String>>(&mut self, mode: S) {
        self.transition_mode = mode.into();
    }

    /// Duration of the slide at `index`, honoring its per-slide override
    pub fn duration_of(&self, index: usize) -> u64 {
        self.slides
            .get(index)
            .and_then(|s| s.duration_ms)
            .unwrap_or(self.slide_duration_ms)
    }

    /// Sum of every slide's duration
    pub fn total_duration_ms(&self) -> u64 {
        (0..self.slides.len()).map(|i| self.duration_of(i)).sum()
    }

    /// Structural checks: positive durations and finite filter values.
    ///
    /// An empty timeline is valid here; callers that need content (export)
    /// reject it themselves.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.slide_duration_ms == 0 {
            return Err(ValidationError::ZeroDuration {
                slide_id: "*".to_string(),
            });
        }

        for (index, slide) in self.slides.iter().enumerate() {
            if self.duration_of(index) == 0 {
                return Err(ValidationError::ZeroDuration {
                    slide_id: slide.id.clone(),
                });
            }
            if let Some(filters) = &slide.filters {
                if let Some((field, value)) = filters.non_finite_field() {
                    return Err(ValidationError::InvalidFilter {
                        slide_id: slide.id.clone(),
                        field,
                        value,
                    });
                }
            }
        }

        Ok(())
    }

    /// Decode every slide's pixels in order
    pub async fn decode_all(&self) -> crate::Result<Vec<LoadedSlide>> {
        let mut loaded = Vec::with_capacity(self.slides.len());
        for slide in &self.slides {
            loaded.push(slide.load().await?);
        }
        Ok(loaded)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(DEFAULT_SLIDE_DURATION_MS)
    }
}
