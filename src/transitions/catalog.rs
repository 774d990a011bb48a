use super::effect::{SlideDirection, TransitionEffect};
use super::{AUTO_MIX, DEFAULT_TRANSITION};

/// A named transition with its visual parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionDescriptor {
    /// Stable id, e.g. `"slide-left"`
    pub id: &'static str,

    /// Name shown in menus
    pub display_name: &'static str,

    pub description: &'static str,

    /// How long the effect runs at the start of a slide
    pub duration_ms: u64,

    pub effect: TransitionEffect,
}

const STANDARD: [TransitionDescriptor; 12] = [
    TransitionDescriptor {
        id: "fade",
        display_name: "Fade",
        description: "Smooth opacity transition",
        duration_ms: 500,
        effect: TransitionEffect::Fade,
    },
    TransitionDescriptor {
        id: "slide-left",
        display_name: "Slide Left",
        description: "Slides from right to left",
        duration_ms: 500,
        effect: TransitionEffect::Slide(SlideDirection::Left),
    },
    TransitionDescriptor {
        id: "slide-right",
        display_name: "Slide Right",
        description: "Slides from left to right",
        duration_ms: 500,
        effect: TransitionEffect::Slide(SlideDirection::Right),
    },
    TransitionDescriptor {
        id: "slide-up",
        display_name: "Slide Up",
        description: "Slides from bottom to top",
        duration_ms: 500,
        effect: TransitionEffect::Slide(SlideDirection::Up),
    },
    TransitionDescriptor {
        id: "slide-down",
        display_name: "Slide Down",
        description: "Slides from top to bottom",
        duration_ms: 500,
        effect: TransitionEffect::Slide(SlideDirection::Down),
    },
    TransitionDescriptor {
        id: "zoom-in",
        display_name: "Zoom In",
        description: "Scales in from small to large",
        duration_ms: 700,
        effect: TransitionEffect::ZoomIn,
    },
    TransitionDescriptor {
        id: "zoom-out",
        display_name: "Zoom Out",
        description: "Scales out from large to small",
        duration_ms: 700,
        effect: TransitionEffect::ZoomOut,
    },
    TransitionDescriptor {
        id: "flip-horizontal",
        display_name: "Flip H",
        description: "Horizontal flip transition",
        duration_ms: 600,
        effect: TransitionEffect::FlipHorizontal,
    },
    TransitionDescriptor {
        id: "flip-vertical",
        display_name: "Flip V",
        description: "Vertical flip transition",
        duration_ms: 600,
        effect: TransitionEffect::FlipVertical,
    },
    TransitionDescriptor {
        id: "ken-burns",
        display_name: "Ken Burns",
        description: "Slow zoom with pan effect",
        duration_ms: 1000,
        effect: TransitionEffect::KenBurns,
    },
    TransitionDescriptor {
        id: "swirl",
        display_name: "Swirl",
        description: "Rotating spiral transition",
        duration_ms: 800,
        effect: TransitionEffect::Swirl,
    },
    TransitionDescriptor {
        id: "cross-dissolve",
        display_name: "Cross Dissolve",
        description: "Blended fade transition",
        duration_ms: 600,
        effect: TransitionEffect::CrossDissolve,
    },
];

/// The fixed set of transitions available to a reel
///
/// The catalog never contains `auto-mix`; that mode is resolved by the
/// selector into one of the concrete entries.
#[derive(Debug, Clone)]
pub struct TransitionCatalog {
    entries: Vec<TransitionDescriptor>,
}

impl TransitionCatalog {
    /// The built-in catalog
    pub fn standard() -> Self {
        Self {
            entries: STANDARD.to_vec(),
        }
    }

    /// Concrete transitions, in menu order
    pub fn entries(&self) -> &[TransitionDescriptor] {
        &self.entries
    }

    /// Look up a concrete transition by id
    pub fn get(&self, id: &str) -> Option<&TransitionDescriptor> {
        self.entries.iter().find(|d| d.id == id)
    }

    /// The fallback entry for unrecognized modes
    pub fn default_entry(&self) -> &TransitionDescriptor {
        self.get(DEFAULT_TRANSITION).unwrap_or(&self.entries[0])
    }

    /// Whether `mode` is something a timeline may select
    pub fn is_known_mode(&self, mode: &str) -> bool {
        mode == AUTO_MIX || self.get(mode).is_some()
    }

    /// Selectable mode ids including `auto-mix`, for menus
    pub fn mode_ids(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .map(|d| d.id)
            .chain(std::iter::once(AUTO_MIX))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TransitionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Progress of the entering transition `elapsed_ms` into a slide
///
/// Shared by the playback clock and the export loop so both draw the same
/// frame for the same instant.
pub fn transition_progress(elapsed_ms: u64, descriptor: &TransitionDescriptor) -> f32 {
    if descriptor.duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f32 / descriptor.duration_ms as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_transitions_available() {
        let catalog = TransitionCatalog::standard();

        for id in ["fade", "slide-left", "zoom-in", "ken-burns", "swirl", "cross-dissolve"] {
            assert!(catalog.get(id).is_some(), "missing {}", id);
        }
        assert_eq!(catalog.len(), 12);
        assert!(catalog.get(AUTO_MIX).is_none());
    }

    #[test]
    fn test_mode_ids_include_auto_mix() {
        let catalog = TransitionCatalog::standard();
        let ids = catalog.mode_ids();
        assert_eq!(ids.len(), 13);
        assert_eq!(ids.last(), Some(&AUTO_MIX));
        assert!(catalog.is_known_mode("auto-mix"));
        assert!(!catalog.is_known_mode("wobble"));
    }

    #[test]
    fn test_default_entry_is_fade() {
        assert_eq!(TransitionCatalog::standard().default_entry().id, "fade");
    }

    #[test]
    fn test_transition_progress_clamps() {
        let catalog = TransitionCatalog::standard();
        let fade = catalog.get("fade").unwrap();

        assert_eq!(transition_progress(0, fade), 0.0);
        assert_eq!(transition_progress(250, fade), 0.5);
        assert_eq!(transition_progress(10_000, fade), 1.0);
    }
}
