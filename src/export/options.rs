use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timeline::Timeline;

/// Default export frame rate
pub const DEFAULT_FPS: u32 = 30;

/// Highest frame rate accepted for export
pub const MAX_FPS: u32 = 120;

/// Output resolution class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    High,
    Medium,
    Low,
}

impl QualityTier {
    /// Length of the short side of the output, in pixels
    pub fn short_side(self) -> u32 {
        match self {
            Self::High => 1080,
            Self::Medium => 720,
            Self::Low => 480,
        }
    }

    /// Constant rate factor used for video encoding at this tier
    pub fn crf(self) -> u8 {
        match self {
            Self::High => 24,
            Self::Medium => 31,
            Self::Low => 38,
        }
    }
}

impl FromStr for QualityTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(invalid("quality_tier", s)),
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(name)
    }
}

/// Kind of artifact to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    #[default]
    Video,
    /// Encoded as a single still of the first frame
    AnimatedImage,
    StillImage,
}

impl ExportFormat {
    /// Formats whose artifact is one settled picture of the first slide
    pub fn is_single_image(self) -> bool {
        matches!(self, Self::AnimatedImage | Self::StillImage)
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "animated-image" | "gif" => Ok(Self::AnimatedImage),
            "still-image" | "png" => Ok(Self::StillImage),
            _ => Err(invalid("format", s)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Video => "video",
            Self::AnimatedImage => "animated-image",
            Self::StillImage => "still-image",
        };
        f.write_str(name)
    }
}

/// Output size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Named aspect ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectPreset {
    Square,
    /// The vertical "reel" format
    #[default]
    Portrait,
    Landscape,
}

impl AspectPreset {
    /// Reference size at full quality
    pub fn base_dimensions(self) -> Dimensions {
        match self {
            Self::Square => Dimensions::new(1080, 1080),
            Self::Portrait => Dimensions::new(1080, 1920),
            Self::Landscape => Dimensions::new(1920, 1080),
        }
    }

    /// Scale so the short side matches `tier`, keeping both sides even
    pub fn dimensions_for(self, tier: QualityTier) -> Dimensions {
        let base = self.base_dimensions();
        let scale = tier.short_side() as f64 / base.width.min(base.height) as f64;
        let even = |v: u32| ((v as f64 * scale / 2.0).round() as u32 * 2).max(2);
        Dimensions::new(even(base.width), even(base.height))
    }
}

impl FromStr for AspectPreset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "portrait" | "reel" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(invalid("aspect", s)),
        }
    }
}

/// Parameters for one export call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub quality_tier: QualityTier,
    pub format: ExportFormat,
    pub dimensions: Dimensions,

    /// When set, split evenly across slides in place of their own durations
    pub total_duration_ms: Option<u64>,

    pub fps: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::for_preset(QualityTier::High, ExportFormat::Video, AspectPreset::Portrait)
    }
}

impl ExportOptions {
    pub fn for_preset(quality_tier: QualityTier, format: ExportFormat, aspect: AspectPreset) -> Self {
        Self {
            quality_tier,
            format,
            dimensions: aspect.dimensions_for(quality_tier),
            total_duration_ms: None,
            fps: DEFAULT_FPS,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Dimensions::new(width, height);
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_total_duration(mut self, total_duration_ms: u64) -> Self {
        self.total_duration_ms = Some(total_duration_ms);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dimensions.width == 0 || self.dimensions.height == 0 {
            return Err(invalid(
                "dimensions",
                &format!("{}x{}", self.dimensions.width, self.dimensions.height),
            ));
        }
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(invalid("fps", &self.fps.to_string()));
        }
        if self.total_duration_ms == Some(0) {
            return Err(invalid("total_duration_ms", "0"));
        }
        Ok(())
    }

    /// Duration each slide plays for in this export
    pub fn slide_durations(&self, timeline: &Timeline) -> Vec<u64> {
        let count = timeline.len() as u64;
        match self.total_duration_ms {
            Some(total) if count > 0 => {
                let base = total / count;
                let extra = total % count;
                (0..count).map(|i| base + u64::from(i < extra)).collect()
            }
            _ => (0..timeline.len()).map(|i| timeline.duration_of(i)).collect(),
        }
    }

    /// Reject slides that would last less than one frame interval
    pub fn validate_durations(&self, durations: &[u64]) -> Result<(), ValidationError> {
        let fps = u64::from(self.fps);
        match durations.iter().find(|&&duration| duration * fps < 1000) {
            Some(duration) => Err(invalid(
                "slide_duration_ms",
                &format!("{} (shorter than one frame at {} fps)", duration, self.fps),
            )),
            None => Ok(()),
        }
    }

    /// Frames rendered for each slide
    ///
    /// Boundaries are placed on the cumulative timeline so rounding never
    /// drifts more than half a frame overall. Durations accepted by
    /// [`validate_durations`](Self::validate_durations) get at least one
    /// frame each.
    pub fn frame_plan(&self, durations: &[u64]) -> Vec<u64> {
        let fps = u64::from(self.fps);
        let mut plan = Vec::with_capacity(durations.len());
        let mut elapsed_ms = 0u64;
        let mut emitted = 0u64;

        for &duration in durations {
            elapsed_ms += duration;
            let boundary = (elapsed_ms * fps + 500) / 1000;
            plan.push(boundary - emitted);
            emitted = boundary;
        }
        plan
    }

    /// Milliseconds into a slide at which frame `index` is drawn
    pub fn frame_time_ms(&self, index: u64) -> u64 {
        index * 1000 / u64::from(self.fps.max(1))
    }
}

fn invalid(key: &str, value: &str) -> ValidationError {
    ValidationError::InvalidOption {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{PixelSource, Slide};
    use image::RgbImage;
    use std::sync::Arc;

    fn timeline(durations: &[Option<u64>]) -> Timeline {
        let pixels = Arc::new(RgbImage::new(2, 2));
        let slides = durations
            .iter()
            .map(|d| {
                let slide = Slide::new(PixelSource::Decoded(Arc::clone(&pixels)));
                match d {
                    Some(ms) => slide.with_duration(*ms),
                    None => slide,
                }
            })
            .collect();
        Timeline::from_slides(slides, 1000)
    }

    #[test]
    fn test_default_is_portrait_1080p_video() {
        let options = ExportOptions::default();
        assert_eq!(options.dimensions, Dimensions::new(1080, 1920));
        assert_eq!(options.format, ExportFormat::Video);
        assert_eq!(options.fps, 30);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_tier_scales_short_side() {
        assert_eq!(AspectPreset::Landscape.dimensions_for(QualityTier::Medium), Dimensions::new(1280, 720));
        assert_eq!(AspectPreset::Square.dimensions_for(QualityTier::Low), Dimensions::new(480, 480));
        assert_eq!(AspectPreset::Portrait.dimensions_for(QualityTier::Low), Dimensions::new(480, 854));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ExportOptions::default().with_fps(0).validate().is_err());
        assert!(ExportOptions::default().with_fps(500).validate().is_err());
        assert!(ExportOptions::default().with_dimensions(0, 10).validate().is_err());
        assert!(ExportOptions::default().with_total_duration(0).validate().is_err());
    }

    #[test]
    fn test_total_duration_split_evenly() {
        let options = ExportOptions::default().with_total_duration(1000);
        let durations = options.slide_durations(&timeline(&[None, Some(5000), None]));
        assert_eq!(durations, vec![334, 333, 333]);
        assert_eq!(durations.iter().sum::<u64>(), 1000);
    }

    #[test]
    fn test_timeline_durations_used_by_default() {
        let options = ExportOptions::default();
        assert_eq!(options.slide_durations(&timeline(&[None, Some(1500)])), vec![1000, 1500]);
    }

    #[test]
    fn test_frame_plan_tracks_total_duration() {
        let options = ExportOptions::default();
        let durations = [333u64; 7];
        let plan = options.frame_plan(&durations);

        let total_frames: u64 = plan.iter().sum();
        let expected = 7.0 * 333.0 * 30.0 / 1000.0;
        assert!((total_frames as f64 - expected).abs() <= 0.5);
    }

    #[test]
    fn test_sub_frame_slides_rejected() {
        let options = ExportOptions::default();
        let err = options.validate_durations(&[1000, 10, 10]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidOption { ref key, .. } if key == "slide_duration_ms"));

        // 34 ms is the shortest slide that still spans a frame at 30 fps
        assert!(options.validate_durations(&[1000, 34, 34]).is_ok());
    }

    #[test]
    fn test_frame_plan_stays_within_one_frame_of_short_slides() {
        let options = ExportOptions::default();
        let durations = [1000u64, 34, 34];
        let plan = options.frame_plan(&durations);

        assert!(plan.iter().all(|&frames| frames >= 1));
        let encoded_ms = plan.iter().sum::<u64>() * 1000 / 30;
        assert!(encoded_ms.abs_diff(durations.iter().sum()) <= 1000 / 30);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("HIGH".parse::<QualityTier>().unwrap(), QualityTier::High);
        assert_eq!("gif".parse::<ExportFormat>().unwrap(), ExportFormat::AnimatedImage);
        assert_eq!("reel".parse::<AspectPreset>().unwrap(), AspectPreset::Portrait);
        assert!("huge".parse::<QualityTier>().is_err());
    }
}
