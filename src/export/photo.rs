use tokio::task;
use tracing::debug;

use crate::error::EncodeError;
use crate::export::Artifact;
use crate::filters;
use crate::render::Frame;
use crate::timeline::Slide;
use crate::Result;

/// Export one slide at its native resolution with its filters applied
pub async fn export_photo(slide: &Slide) -> Result<Artifact> {
    let loaded = slide.load().await?;
    let filters = loaded.slide.effective_filters();
    debug!("Exporting photo {} ({}x{})", slide.id, loaded.pixels.width(), loaded.pixels.height());

    let png = task::spawn_blocking(move || Frame::new(filters::apply(&loaded.pixels, &filters)).encode_png())
        .await
        .map_err(|e| EncodeError::Failed {
            reason: format!("PNG encoder task failed: {}", e),
        })?
        .map_err(|e| EncodeError::Failed {
            reason: format!("PNG encoding failed: {}", e),
        })?;

    Ok(Artifact::file(png, format!("photo-{}.png", slide.id), "image/png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterParams;
    use crate::timeline::PixelSource;
    use image::{Rgb, RgbImage};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_photo_keeps_size_and_applies_filters() {
        let pixels = Arc::new(RgbImage::from_pixel(5, 3, Rgb([100, 100, 100])));
        let slide = Slide::new(PixelSource::Decoded(pixels))
            .with_id("p1")
            .with_filters(FilterParams { brightness: 50.0, ..Default::default() });

        let artifact = export_photo(&slide).await.unwrap();
        assert_eq!(artifact.filename, "photo-p1.png");
        assert_eq!(artifact.mime_type, "image/png");

        let decoded = image::load_from_memory(&artifact.bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(decoded.get_pixel(2, 1).0, [50, 50, 50]);
    }
}
