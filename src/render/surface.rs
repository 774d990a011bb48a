use std::sync::Arc;

use image::RgbImage;
use rayon::prelude::*;
use tracing::debug;

use crate::filters::{self, FilterParams};
use crate::render::{aspect_fill, Frame};
use crate::timeline::LoadedSlide;
use crate::transitions::{Placement, TransitionDescriptor};

/// A drawable pixel target
///
/// Implementations may be backed by a software rasterizer or a GPU; the
/// playback and export paths only depend on this interface.
pub trait RenderSurface: Send {
    /// Target `(width, height)` in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Draw `slide` with its filters, `progress` into its entering transition
    fn draw_slide(&mut self, slide: &LoadedSlide, progress: f32, transition: &TransitionDescriptor);

    /// The current contents, readable by the capture pipeline
    fn frame(&self) -> &Frame;

    /// Reset to black and forget the previous slide
    fn clear(&mut self);
}

/// Aspect-filled, filtered pixels for one slide, reused across frames
struct PreparedSlide {
    slide_id: String,
    filters: FilterParams,
    source: Arc<RgbImage>,
    pixels: RgbImage,
}

/// CPU render surface
///
/// The incoming slide is composited over a snapshot of whatever was on
/// screen when its transition began, so every frame of a transition is a
/// pure function of (previous slide, slide, progress).
pub struct SoftwareSurface {
    width: u32,
    height: u32,
    buffer: Frame,
    backdrop: Frame,
    on_screen: Option<String>,
    last_progress: f32,
    prepared: Option<PreparedSlide>,
}

impl SoftwareSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: Frame::new_black(width, height),
            backdrop: Frame::new_black(width, height),
            on_screen: None,
            last_progress: 0.0,
            prepared: None,
        }
    }

    /// Make sure the cached pixels match this slide and its filters
    fn prepare(&mut self, loaded: &LoadedSlide) {
        let filters = loaded.slide.effective_filters();
        let fresh = self.prepared.as_ref().is_some_and(|p| {
            p.slide_id == loaded.slide.id && p.filters == filters && Arc::ptr_eq(&p.source, &loaded.pixels)
        });
        if fresh {
            return;
        }

        debug!("Preparing slide {} at {}x{}", loaded.slide.id, self.width, self.height);
        let fitted = aspect_fill(&loaded.pixels, self.width, self.height);
        self.prepared = Some(PreparedSlide {
            slide_id: loaded.slide.id.clone(),
            filters,
            source: Arc::clone(&loaded.pixels),
            pixels: filters::apply(&fitted, &filters),
        });
    }
}

impl RenderSurface for SoftwareSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_slide(&mut self, slide: &LoadedSlide, progress: f32, transition: &TransitionDescriptor) {
        let progress = progress.clamp(0.0, 1.0);

        // A new slide, or the same slide re-entering, starts a new transition
        let entering = self.on_screen.as_deref() != Some(slide.slide.id.as_str())
            || progress < self.last_progress;
        if entering {
            self.backdrop.copy_from(&self.buffer);
            self.on_screen = Some(slide.slide.id.clone());
        }
        self.last_progress = progress;

        self.prepare(slide);
        let Some(prepared) = self.prepared.as_ref() else {
            return;
        };

        let placement = transition.effect.placement(progress);
        if placement.is_rest() {
            self.buffer.as_image_mut().copy_from_slice(prepared.pixels.as_raw());
            return;
        }

        self.buffer.copy_from(&self.backdrop);
        composite(self.buffer.as_image_mut(), &prepared.pixels, &placement);
    }

    fn frame(&self) -> &Frame {
        &self.buffer
    }

    fn clear(&mut self) {
        self.buffer = Frame::new_black(self.width, self.height);
        self.backdrop = Frame::new_black(self.width, self.height);
        self.on_screen = None;
        self.last_progress = 0.0;
    }
}

/// Blend `source` into `target` under `placement`, sampling by inverse mapping
fn composite(target: &mut RgbImage, source: &RgbImage, placement: &Placement) {
    const MIN_SCALE: f32 = 1e-4;

    let (width, height) = target.dimensions();
    let alpha = placement.opacity.clamp(0.0, 1.0);
    if alpha <= 0.0 || placement.scale_x.abs() < MIN_SCALE || placement.scale_y.abs() < MIN_SCALE {
        return;
    }

    let w = width as f32;
    let h = height as f32;
    let center_x = w / 2.0 + placement.offset_x * w;
    let center_y = h / 2.0 + placement.offset_y * h;
    let (sin, cos) = placement.rotation.sin_cos();
    let row_len = width as usize * 3;

    target
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let py = y as f32 + 0.5 - center_y;
            for x in 0..width as usize {
                let px = x as f32 + 0.5 - center_x;

                // Undo rotation, then scale, back into source space
                let rx = px * cos + py * sin;
                let ry = -px * sin + py * cos;
                let sx = rx / placement.scale_x + w / 2.0;
                let sy = ry / placement.scale_y + h / 2.0;

                if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
                    continue;
                }

                let src = source.get_pixel(sx as u32, sy as u32);
                let dst = &mut row[x * 3..x * 3 + 3];
                for c in 0..3 {
                    let blended = src[c] as f32 * alpha + dst[c] as f32 * (1.0 - alpha);
                    dst[c] = blended.round().clamp(0.0, 255.0) as u8;
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{PixelSource, Slide};
    use crate::transitions::TransitionCatalog;
    use image::Rgb;

    fn loaded(id: &str, color: [u8; 3], filters: Option<FilterParams>) -> LoadedSlide {
        let pixels = Arc::new(RgbImage::from_pixel(8, 8, Rgb(color)));
        let mut slide = Slide::new(PixelSource::Decoded(Arc::clone(&pixels))).with_id(id);
        slide.filters = filters;
        LoadedSlide { slide, pixels }
    }

    #[test]
    fn test_settled_frame_is_filtered_slide() {
        let catalog = TransitionCatalog::standard();
        let mut surface = SoftwareSurface::new(4, 6);
        let filters = FilterParams { brightness: 150.0, ..Default::default() };
        let slide = loaded("a", [100, 100, 100], Some(filters));

        surface.draw_slide(&slide, 1.0, catalog.get("fade").unwrap());

        let expected = filters::apply(&aspect_fill(&slide.pixels, 4, 6), &filters);
        assert_eq!(surface.frame().as_image(), &expected);
    }

    #[test]
    fn test_fade_blends_over_previous_slide() {
        let catalog = TransitionCatalog::standard();
        let fade = catalog.get("fade").unwrap();
        let mut surface = SoftwareSurface::new(4, 4);

        surface.draw_slide(&loaded("white", [200, 200, 200], None), 1.0, fade);
        surface.draw_slide(&loaded("black", [0, 0, 0], None), 0.5, fade);

        assert_eq!(surface.frame().get_pixel(1, 1), [100, 100, 100]);
    }

    #[test]
    fn test_repeated_draws_do_not_accumulate() {
        let catalog = TransitionCatalog::standard();
        let fade = catalog.get("fade").unwrap();
        let mut surface = SoftwareSurface::new(4, 4);
        let red = loaded("red", [255, 0, 0], None);

        surface.draw_slide(&red, 0.5, fade);
        let first = surface.frame().clone();
        surface.draw_slide(&red, 0.5, fade);
        assert_eq!(surface.frame(), &first);
    }

    #[test]
    fn test_slide_left_reveals_backdrop_on_left() {
        let catalog = TransitionCatalog::standard();
        let slide_left = catalog.get("slide-left").unwrap();
        let mut surface = SoftwareSurface::new(10, 4);

        surface.draw_slide(&loaded("a", [0, 0, 255], None), 1.0, slide_left);
        surface.draw_slide(&loaded("b", [255, 0, 0], None), 0.5, slide_left);

        // Incoming slide occupies the right half at the midpoint
        assert_eq!(surface.frame().get_pixel(0, 1), [0, 0, 255]);
        assert_eq!(surface.frame().get_pixel(9, 1), [255, 0, 0]);
    }

    #[test]
    fn test_same_slide_reentering_restarts_transition() {
        let catalog = TransitionCatalog::standard();
        let fade = catalog.get("fade").unwrap();
        let mut surface = SoftwareSurface::new(2, 2);
        let only = loaded("only", [80, 80, 80], None);

        surface.draw_slide(&only, 0.0, fade);
        assert_eq!(surface.frame().get_pixel(0, 0), [0, 0, 0]);
        surface.draw_slide(&only, 1.0, fade);
        surface.draw_slide(&only, 0.0, fade);

        // Fades from itself onto itself
        assert_eq!(surface.frame().get_pixel(0, 0), [80, 80, 80]);
    }

    #[test]
    fn test_clear_resets_to_black() {
        let catalog = TransitionCatalog::standard();
        let mut surface = SoftwareSurface::new(2, 2);
        surface.draw_slide(&loaded("a", [9, 9, 9], None), 1.0, catalog.default_entry());
        surface.clear();
        assert_eq!(surface.frame(), &Frame::new_black(2, 2));
    }
}
