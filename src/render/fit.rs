use image::imageops::{self, FilterType};
use image::RgbImage;

/// Scale `image` to cover `width` x `height`, cropping the overflow evenly
/// from both sides
pub fn aspect_fill(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 || width == 0 || height == 0 {
        return RgbImage::new(width, height);
    }
    if (src_w, src_h) == (width, height) {
        return image.clone();
    }

    let scale = (width as f64 / src_w as f64).max(height as f64 / src_h as f64);
    let scaled_w = ((src_w as f64 * scale).round() as u32).max(width);
    let scaled_h = ((src_h as f64 * scale).round() as u32).max(height);

    let resized = imageops::resize(image, scaled_w, scaled_h, FilterType::Lanczos3);

    let x = (scaled_w - width) / 2;
    let y = (scaled_h - height) / 2;
    imageops::crop_imm(&resized, x, y, width, height).to_image()
}
