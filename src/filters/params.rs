use serde::{Deserialize, Serialize};
use tracing::warn;

use std::ops::RangeInclusive;

pub const BRIGHTNESS_RANGE: RangeInclusive<f32> = 50.0..=150.0;
pub const CONTRAST_RANGE: RangeInclusive<f32> = 50.0..=150.0;
pub const SATURATION_RANGE: RangeInclusive<f32> = 0.0..=200.0;
pub const BLUR_RANGE: RangeInclusive<f32> = 0.0..=5.0;

/// Color adjustments for one slide
///
/// Brightness, contrast and saturation are percentages (100 = unchanged);
/// blur is a radius in pixels. The defaults are the identity transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub blur: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
        }
    }
}

impl FilterParams {
    pub const IDENTITY: FilterParams = FilterParams {
        brightness: 100.0,
        contrast: 100.0,
        saturation: 100.0,
        blur: 0.0,
    };

    pub fn new(brightness: f32, contrast: f32, saturation: f32, blur: f32) -> Self {
        Self { brightness, contrast, saturation, blur }
    }

    /// Clamp every field into its supported range.
    ///
    /// Non-finite values cannot be clamped meaningfully and are replaced by
    /// the identity value for that field.
    pub fn sanitized(&self) -> Self {
        let identity = Self::IDENTITY;
        let clamped = Self {
            brightness: clamp_field(self.brightness, BRIGHTNESS_RANGE, identity.brightness),
            contrast: clamp_field(self.contrast, CONTRAST_RANGE, identity.contrast),
            saturation: clamp_field(self.saturation, SATURATION_RANGE, identity.saturation),
            blur: clamp_field(self.blur, BLUR_RANGE, identity.blur),
        };

        if clamped != *self {
            warn!("Filter parameters {:?} clamped to {:?}", self, clamped);
        }
        clamped
    }

    /// First field holding NaN or infinity, if any
    pub fn non_finite_field(&self) -> Option<(&'static str, f32)> {
        [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
            ("blur", self.blur),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    }

    /// True when brightness, contrast and saturation leave colors untouched
    pub fn is_color_identity(&self) -> bool {
        self.brightness == 100.0 && self.contrast == 100.0 && self.saturation == 100.0
    }

    pub fn is_identity(&self) -> bool {
        self.is_color_identity() && self.blur == 0.0
    }
}

fn clamp_field(value: f32, range: RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}
