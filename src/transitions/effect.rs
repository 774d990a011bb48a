use std::f32::consts::PI;

/// Direction an incoming slide travels for slide transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    /// Enters from the right edge, moving left
    Left,
    /// Enters from the left edge, moving right
    Right,
    /// Enters from the bottom edge, moving up
    Up,
    /// Enters from the top edge, moving down
    Down,
}

/// The visual behavior of a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionEffect {
    Fade,
    CrossDissolve,
    Slide(SlideDirection),
    ZoomIn,
    ZoomOut,
    FlipHorizontal,
    FlipVertical,
    KenBurns,
    Swirl,
}

/// Where and how the incoming slide is drawn at one instant
///
/// Offsets are fractions of the surface size; scale and rotation apply about
/// the surface center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub opacity: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Placement {
    /// Fully opaque, untransformed
    pub const REST: Placement = Placement {
        opacity: 1.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotation: 0.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    pub fn is_rest(&self) -> bool {
        *self == Self::REST
    }

    fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale_x = scale;
        self.scale_y = scale;
        self
    }
}

impl TransitionEffect {
    /// Compute the incoming slide's placement at `progress` in `[0, 1]`
    ///
    /// Every effect reaches [`Placement::REST`] at progress 1.
    pub fn placement(&self, progress: f32) -> Placement {
        let p = progress.clamp(0.0, 1.0);
        if p >= 1.0 {
            return Placement::REST;
        }

        let eased = ease_in_out(p);
        let remaining = 1.0 - eased;

        match *self {
            Self::Fade => Placement { opacity: p, ..Placement::REST },
            Self::CrossDissolve => Placement { opacity: eased, ..Placement::REST },
            Self::Slide(direction) => {
                let (dx, dy) = match direction {
                    SlideDirection::Left => (remaining, 0.0),
                    SlideDirection::Right => (-remaining, 0.0),
                    SlideDirection::Up => (0.0, remaining),
                    SlideDirection::Down => (0.0, -remaining),
                };
                Placement { offset_x: dx, offset_y: dy, ..Placement::REST }
            }
            Self::ZoomIn => {
                let scale = 0.5 + 0.5 * ease_out(p);
                Placement { opacity: p, ..Placement::REST }.uniform_scale(scale)
            }
            Self::ZoomOut => {
                let scale = 1.5 - 0.5 * ease_out(p);
                Placement { opacity: p, ..Placement::REST }.uniform_scale(scale)
            }
            Self::FlipHorizontal => Placement { scale_x: eased, ..Placement::REST },
            Self::FlipVertical => Placement { scale_y: eased, ..Placement::REST },
            Self::KenBurns => {
                let scale = 1.0 + 0.1 * remaining;
                Placement {
                    opacity: eased,
                    offset_x: 0.02 * remaining,
                    offset_y: -0.02 * remaining,
                    ..Placement::REST
                }
                .uniform_scale(scale)
            }
            Self::Swirl => Placement {
                rotation: remaining * PI,
                ..Placement::REST
            }
            .uniform_scale(eased),
        }
    }
}

fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TransitionEffect; 12] = [
        TransitionEffect::Fade,
        TransitionEffect::CrossDissolve,
        TransitionEffect::Slide(SlideDirection::Left),
        TransitionEffect::Slide(SlideDirection::Right),
        TransitionEffect::Slide(SlideDirection::Up),
        TransitionEffect::Slide(SlideDirection::Down),
        TransitionEffect::ZoomIn,
        TransitionEffect::ZoomOut,
        TransitionEffect::FlipHorizontal,
        TransitionEffect::FlipVertical,
        TransitionEffect::KenBurns,
        TransitionEffect::Swirl,
    ];

    #[test]
    fn test_every_effect_settles_at_rest() {
        for effect in ALL {
            assert!(effect.placement(1.0).is_rest(), "{:?}", effect);
            assert!(effect.placement(7.0).is_rest(), "{:?}", effect);
        }
    }

    #[test]
    fn test_fade_is_linear_opacity() {
        let placement = TransitionEffect::Fade.placement(0.25);
        assert_eq!(placement.opacity, 0.25);
        assert_eq!(placement.scale_x, 1.0);
    }

    #[test]
    fn test_slide_left_starts_offscreen_right() {
        let start = TransitionEffect::Slide(SlideDirection::Left).placement(0.0);
        assert_eq!(start.offset_x, 1.0);
        let mid = TransitionEffect::Slide(SlideDirection::Left).placement(0.5);
        assert!(mid.offset_x > 0.0 && mid.offset_x < 1.0);
    }

    #[test]
    fn test_zoom_directions() {
        assert!(TransitionEffect::ZoomIn.placement(0.2).scale_x < 1.0);
        assert!(TransitionEffect::ZoomOut.placement(0.2).scale_x > 1.0);
    }

    #[test]
    fn test_progress_below_zero_is_start() {
        assert_eq!(
            TransitionEffect::Fade.placement(-3.0),
            TransitionEffect::Fade.placement(0.0)
        );
    }
}
