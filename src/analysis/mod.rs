//! # Scene Analysis
//!
//! Filter suggestions derived from image content. The analyzer is an
//! injected dependency of [`ReelEngine`] so remote or model-backed analyzers
//! can replace the local [`HeuristicAnalyzer`], and tests can use doubles.

pub mod engine;
pub mod heuristic;

pub use engine::ReelEngine;
pub use heuristic::HeuristicAnalyzer;

use async_trait::async_trait;
use image::{RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::filters::FilterParams;
use crate::Result;

/// Overall lightness of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Bright,
    Dark,
    Neutral,
}

/// What an analyzer reports about one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneAnalysis {
    /// Mean of `(r + g + b) / 3`, `0.0..=255.0`
    pub brightness: f32,

    /// Standard deviation of that per-pixel brightness
    pub contrast: f32,

    pub is_portrait: bool,
    pub mood: Mood,

    /// Name of a filter preset
    pub recommended_style: String,

    /// Most common colors, most frequent first
    pub dominant_colors: Vec<[u8; 3]>,
}

/// Source of scene analysis and derived edits
#[async_trait]
pub trait SceneAnalyzer: Send + Sync {
    async fn analyze(&self, image: &RgbImage) -> Result<SceneAnalysis>;

    /// Map an analysis onto filter parameters
    fn suggest_filters(&self, analysis: &SceneAnalysis) -> FilterParams {
        suggest_filters(analysis)
    }

    /// Cut the subject out, leaving the background transparent
    async fn remove_background(&self, image: &RgbImage) -> Result<RgbaImage>;
}

/// Brightness, mood and orientation rules shared by the built-in analyzers
pub fn suggest_filters(analysis: &SceneAnalysis) -> FilterParams {
    let mut filters = FilterParams::default();

    if analysis.brightness < 80.0 {
        filters.brightness = 120.0;
        filters.contrast = 130.0;
    } else if analysis.brightness > 200.0 {
        filters.brightness = 90.0;
        filters.contrast = 110.0;
    }

    match analysis.mood {
        Mood::Dark => {
            filters.saturation = 85.0;
            filters.contrast = 140.0;
        }
        Mood::Bright => {
            filters.saturation = 120.0;
            filters.brightness = (filters.brightness + 10.0).min(130.0);
        }
        Mood::Neutral => {}
    }

    if analysis.is_portrait {
        filters.saturation += 15.0;
    }

    filters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(brightness: f32, mood: Mood, is_portrait: bool) -> SceneAnalysis {
        SceneAnalysis {
            brightness,
            contrast: 0.0,
            is_portrait,
            mood,
            recommended_style: "Original".to_string(),
            dominant_colors: Vec::new(),
        }
    }

    #[test]
    fn test_dark_image_is_lifted() {
        let filters = suggest_filters(&analysis(40.0, Mood::Dark, false));
        assert_eq!(filters, FilterParams::new(120.0, 140.0, 85.0, 0.0));
    }

    #[test]
    fn test_bright_portrait() {
        let filters = suggest_filters(&analysis(220.0, Mood::Bright, true));
        assert_eq!(filters, FilterParams::new(100.0, 110.0, 135.0, 0.0));
    }

    #[test]
    fn test_neutral_landscape_is_identity() {
        let filters = suggest_filters(&analysis(128.0, Mood::Neutral, false));
        assert!(filters.is_identity());
    }
}
