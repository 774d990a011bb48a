use std::collections::HashMap;

use async_trait::async_trait;
use image::imageops::{self, FilterType};
use image::{RgbImage, RgbaImage};
use tokio::task;
use tracing::debug;

use crate::analysis::{Mood, SceneAnalysis, SceneAnalyzer};
use crate::error::{DecodeError, NetworkError};
use crate::Result;

/// Images are analyzed at no more than this many pixels per side
pub const MAX_ANALYSIS_DIMENSION: u32 = 1024;

/// Every Nth pixel is sampled
const SAMPLE_STRIDE: usize = 10;

/// Colors are bucketed into 8 levels per channel
const COLOR_BUCKET: u8 = 32;

const BRIGHT_THRESHOLD: f32 = 180.0;
const DARK_THRESHOLD: f32 = 80.0;

/// Local analyzer built on pixel statistics
///
/// Background removal needs a segmentation service and is reported as
/// unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SceneAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, image: &RgbImage) -> Result<SceneAnalysis> {
        let image = image.clone();
        let analysis = task::spawn_blocking(move || analyze_pixels(&image))
            .await
            .map_err(|e| DecodeError::DecodeFailed {
                source_name: "analysis".to_string(),
                reason: format!("analysis task failed: {}", e),
            })?;

        debug!(
            "Analysis: brightness {:.1}, mood {:?}, style {}",
            analysis.brightness, analysis.mood, analysis.recommended_style
        );
        Ok(analysis)
    }

    async fn remove_background(&self, _image: &RgbImage) -> Result<RgbaImage> {
        Err(NetworkError::Unavailable {
            service: "background segmentation".to_string(),
        }
        .into())
    }
}

fn analyze_pixels(image: &RgbImage) -> SceneAnalysis {
    let (width, height) = image.dimensions();
    let is_portrait = height > width;

    let resized;
    let image = if width > MAX_ANALYSIS_DIMENSION || height > MAX_ANALYSIS_DIMENSION {
        let scale = MAX_ANALYSIS_DIMENSION as f64 / width.max(height) as f64;
        let w = ((width as f64 * scale).round() as u32).max(1);
        let h = ((height as f64 * scale).round() as u32).max(1);
        resized = imageops::resize(image, w, h, FilterType::Triangle);
        &resized
    } else {
        image
    };

    let mut samples = 0usize;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut buckets: HashMap<[u8; 3], usize> = HashMap::new();

    for pixel in image.pixels().step_by(SAMPLE_STRIDE) {
        let [r, g, b] = pixel.0;
        let value = (r as f64 + g as f64 + b as f64) / 3.0;
        sum += value;
        sum_sq += value * value;
        samples += 1;

        let key = [r / COLOR_BUCKET, g / COLOR_BUCKET, b / COLOR_BUCKET];
        *buckets.entry(key).or_insert(0) += 1;
    }

    let (brightness, contrast) = if samples == 0 {
        (0.0, 0.0)
    } else {
        let mean = sum / samples as f64;
        let variance = (sum_sq / samples as f64 - mean * mean).max(0.0);
        (mean as f32, variance.sqrt() as f32)
    };

    let mood = if brightness > BRIGHT_THRESHOLD {
        Mood::Bright
    } else if brightness < DARK_THRESHOLD {
        Mood::Dark
    } else {
        Mood::Neutral
    };

    let mut ranked: Vec<([u8; 3], usize)> = buckets.into_iter().collect();
    ranked.sort_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then(ka.cmp(kb)));
    let dominant_colors = ranked
        .into_iter()
        .take(3)
        .map(|(key, _)| key.map(|level| level * COLOR_BUCKET))
        .collect();

    SceneAnalysis {
        brightness,
        contrast,
        is_portrait,
        mood,
        recommended_style: recommend_style(brightness, mood, is_portrait).to_string(),
        dominant_colors,
    }
}

fn recommend_style(brightness: f32, mood: Mood, is_portrait: bool) -> &'static str {
    match mood {
        Mood::Bright if is_portrait => "Instagram",
        Mood::Dark => "Cinematic",
        _ if brightness > 150.0 => "Sunset",
        _ if brightness < 100.0 => "B&W Classic",
        _ => "Original",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters;
    use crate::ReelError;
    use image::Rgb;

    #[tokio::test]
    async fn test_bright_portrait() {
        let image = RgbImage::from_pixel(40, 80, Rgb([230, 220, 210]));
        let analysis = HeuristicAnalyzer.analyze(&image).await.unwrap();

        assert_eq!(analysis.mood, Mood::Bright);
        assert!(analysis.is_portrait);
        assert_eq!(analysis.recommended_style, "Instagram");
        assert!((analysis.brightness - 220.0).abs() < 0.01);
        assert_eq!(analysis.contrast, 0.0);
        assert!(filters::find_preset(&analysis.recommended_style).is_some());
    }

    #[tokio::test]
    async fn test_dark_landscape() {
        let image = RgbImage::from_pixel(80, 40, Rgb([20, 30, 40]));
        let analysis = HeuristicAnalyzer.analyze(&image).await.unwrap();

        assert_eq!(analysis.mood, Mood::Dark);
        assert!(!analysis.is_portrait);
        assert_eq!(analysis.recommended_style, "Cinematic");
        assert_eq!(analysis.dominant_colors, vec![[0, 0, 32]]);
    }

    #[tokio::test]
    async fn test_dominant_colors_ranked_by_frequency() {
        // Three quarters red, one quarter blue
        let image = RgbImage::from_fn(40, 40, |x, _| if x < 30 { Rgb([250, 0, 0]) } else { Rgb([0, 0, 250]) });
        let analysis = HeuristicAnalyzer.analyze(&image).await.unwrap();
        assert_eq!(analysis.dominant_colors, vec![[224, 0, 0], [0, 0, 224]]);
    }

    #[test]
    fn test_style_thresholds() {
        assert_eq!(recommend_style(160.0, Mood::Neutral, false), "Sunset");
        assert_eq!(recommend_style(90.0, Mood::Neutral, false), "B&W Classic");
        assert_eq!(recommend_style(120.0, Mood::Neutral, true), "Original");
        assert_eq!(recommend_style(200.0, Mood::Bright, false), "Sunset");
    }

    #[tokio::test]
    async fn test_large_image_is_downscaled() {
        let image = RgbImage::from_pixel(2048, 1024, Rgb([128, 128, 128]));
        let analysis = HeuristicAnalyzer.analyze(&image).await.unwrap();
        assert_eq!(analysis.mood, Mood::Neutral);
        assert!(!analysis.is_portrait);
    }

    #[tokio::test]
    async fn test_background_removal_unavailable() {
        let err = HeuristicAnalyzer
            .remove_background(&RgbImage::new(2, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, ReelError::Network(_)));
        assert_eq!(err.category(), "NetworkError");
    }
}
