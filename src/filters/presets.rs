use super::FilterParams;

/// A named, fixed set of filter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterPreset {
    pub name: &'static str,
    pub description: &'static str,
    pub params: FilterParams,
}

/// Built-in style presets, in menu order
pub const PRESETS: &[FilterPreset] = &[
    FilterPreset {
        name: "Original",
        description: "No filters applied",
        params: FilterParams::IDENTITY,
    },
    FilterPreset {
        name: "Instagram",
        description: "Bright & punchy like social media",
        params: FilterParams { brightness: 108.0, contrast: 115.0, saturation: 125.0, blur: 0.0 },
    },
    FilterPreset {
        name: "Vintage",
        description: "Warm retro film look",
        params: FilterParams { brightness: 95.0, contrast: 110.0, saturation: 75.0, blur: 0.0 },
    },
    FilterPreset {
        name: "Cinematic",
        description: "Movie-style dramatic lighting",
        params: FilterParams { brightness: 90.0, contrast: 140.0, saturation: 110.0, blur: 0.0 },
    },
    FilterPreset {
        name: "Dreamy",
        description: "Soft ethereal glow",
        params: FilterParams { brightness: 110.0, contrast: 85.0, saturation: 120.0, blur: 0.8 },
    },
    FilterPreset {
        name: "B&W Classic",
        description: "High contrast monochrome",
        params: FilterParams { brightness: 105.0, contrast: 130.0, saturation: 0.0, blur: 0.0 },
    },
    FilterPreset {
        name: "Sunset",
        description: "Warm golden hour vibes",
        params: FilterParams { brightness: 115.0, contrast: 120.0, saturation: 140.0, blur: 0.0 },
    },
    FilterPreset {
        name: "Arctic",
        description: "Cool blue-tinted aesthetic",
        params: FilterParams { brightness: 120.0, contrast: 95.0, saturation: 80.0, blur: 0.0 },
    },
];

/// Look up a preset by name, ignoring ASCII case
pub fn find(name: &str) -> Option<&'static FilterPreset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_within_ranges() {
        for preset in PRESETS {
            assert_eq!(preset.params.sanitized(), preset.params, "{}", preset.name);
        }
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("cinematic").map(|p| p.params.contrast), Some(140.0));
        assert!(find("b&w classic").is_some());
        assert!(find("Neon").is_none());
    }

    #[test]
    fn test_original_is_identity() {
        assert!(find("Original").unwrap().params.is_identity());
    }
}
