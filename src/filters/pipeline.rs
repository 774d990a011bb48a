// src/filters/pipeline.rs - the one pixel transform shared by preview and export

use image::RgbImage;
use rayon::prelude::*;

use super::FilterParams;

/// Blur radii below this are visually indistinguishable from no blur
const MIN_BLUR_SIGMA: f32 = 0.05;

/// Apply color adjustments and blur to an image
///
/// Stages run in a fixed order: brightness, contrast, saturation, then blur.
/// Parameters are clamped to their supported ranges first, and stages left
/// at their identity value are skipped entirely, so identity parameters
/// return the input unchanged.
pub fn apply(image: &RgbImage, params: &FilterParams) -> RgbImage {
    let params = params.sanitized();
    let mut out = image.clone();

    if !params.is_color_identity() {
        adjust_colors(&mut out, &params);
    }

    if params.blur >= MIN_BLUR_SIGMA {
        out = gaussian_blur(&out, params.blur);
    }

    out
}

fn adjust_colors(image: &mut RgbImage, params: &FilterParams) {
    let brightness = params.brightness / 100.0;
    let contrast = params.contrast / 100.0;
    let saturation = params.saturation / 100.0;

    image.par_chunks_mut(3).for_each(|pixel| {
        let mut rgb = [
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        ];

        if brightness != 1.0 {
            for c in rgb.iter_mut() {
                *c = (*c * brightness).clamp(0.0, 1.0);
            }
        }

        // Contrast scales about mid-gray
        if contrast != 1.0 {
            for c in rgb.iter_mut() {
                *c = ((*c - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
            }
        }

        if saturation != 1.0 {
            let (h, s, l) = rgb_to_hsl(rgb);
            rgb = hsl_to_rgb(h, (s * saturation).clamp(0.0, 1.0), l);
        }

        for (dst, c) in pixel.iter_mut().zip(rgb) {
            *dst = (c * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    });
}

/// Separable gaussian blur with edge clamping
fn gaussian_blur(image: &RgbImage, sigma: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as i64;
    let row_len = width as usize * 3;
    let src: &[u8] = image.as_raw();

    // Horizontal pass into f32 to avoid double rounding
    let mut horizontal = vec![0f32; src.len()];
    horizontal
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &src[y * row_len..(y + 1) * row_len];
            for x in 0..width as i64 {
                let mut acc = [0f32; 3];
                for (k, weight) in kernel.iter().enumerate() {
                    let sx = (x + k as i64 - radius).clamp(0, width as i64 - 1) as usize;
                    for c in 0..3 {
                        acc[c] += src_row[sx * 3 + c] as f32 * weight;
                    }
                }
                row[x as usize * 3..x as usize * 3 + 3].copy_from_slice(&acc);
            }
        });

    let mut out = RgbImage::new(width, height);
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width as usize {
                let mut acc = [0f32; 3];
                for (k, weight) in kernel.iter().enumerate() {
                    let sy = (y as i64 + k as i64 - radius).clamp(0, height as i64 - 1) as usize;
                    let base = sy * row_len + x * 3;
                    for c in 0..3 {
                        acc[c] += horizontal[base + c] * weight;
                    }
                }
                for c in 0..3 {
                    row[x * 3 + c] = acc[c].round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    out
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as i32;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-(i * i) as f32 / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= sum;
    }
    weights
}

fn rgb_to_hsl([r, g, b]: [f32; 3]) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;

    if delta <= f32::EPSILON {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    (h * 60.0, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if hp < 1.0 {
        (c, x, 0.0)
    } else if hp < 2.0 {
        (x, c, 0.0)
    } else if hp < 3.0 {
        (0.0, c, x)
    } else if hp < 4.0 {
        (0.0, x, c)
    } else if hp < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    [
        (r + m).clamp(0.0, 1.0),
        (g + m).clamp(0.0, 1.0),
        (b + m).clamp(0.0, 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                ((x + y) * 7 % 256) as u8,
            ])
        })
    }

    #[test]
    fn test_identity_returns_input() {
        let image = gradient(37, 21);
        let out = apply(&image, &FilterParams::default());
        assert_eq!(out, image);
    }

    #[test]
    fn test_hsl_round_trip_within_tolerance() {
        let image = gradient(16, 16);
        for pixel in image.pixels() {
            let rgb = [
                pixel[0] as f32 / 255.0,
                pixel[1] as f32 / 255.0,
                pixel[2] as f32 / 255.0,
            ];
            let (h, s, l) = rgb_to_hsl(rgb);
            let back = hsl_to_rgb(h, s, l);
            for c in 0..3 {
                assert!((back[c] - rgb[c]).abs() < 1.0 / 255.0);
            }
        }
    }

    #[test]
    fn test_brightness_scales_channels() {
        let image = RgbImage::from_pixel(2, 2, Rgb([100, 50, 200]));
        let out = apply(&image, &FilterParams { brightness: 150.0, ..Default::default() });
        assert_eq!(out.get_pixel(0, 0), &Rgb([150, 75, 255]));
    }

    #[test]
    fn test_contrast_pivots_on_mid_gray() {
        let image = RgbImage::from_fn(2, 1, |x, _| if x == 0 { Rgb([64, 64, 64]) } else { Rgb([192, 192, 192]) });
        let out = apply(&image, &FilterParams { contrast: 150.0, ..Default::default() });
        assert!(out.get_pixel(0, 0)[0] < 64);
        assert!(out.get_pixel(1, 0)[0] > 192);
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        let image = RgbImage::from_pixel(1, 1, Rgb([200, 40, 90]));
        let out = apply(&image, &FilterParams { saturation: 0.0, ..Default::default() });
        let p = out.get_pixel(0, 0);
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
    }

    #[test]
    fn test_saturation_preserves_hue() {
        let image = RgbImage::from_pixel(1, 1, Rgb([180, 90, 60]));
        let out = apply(&image, &FilterParams { saturation: 150.0, ..Default::default() });
        let before = rgb_to_hsl([180.0 / 255.0, 90.0 / 255.0, 60.0 / 255.0]).0;
        let p = out.get_pixel(0, 0);
        let after = rgb_to_hsl([p[0] as f32 / 255.0, p[1] as f32 / 255.0, p[2] as f32 / 255.0]).0;
        assert!((before - after).abs() < 2.0);
    }

    #[test]
    fn test_blur_spreads_a_bright_dot() {
        let mut image = RgbImage::new(9, 9);
        image.put_pixel(4, 4, Rgb([255, 255, 255]));
        let out = apply(&image, &FilterParams { blur: 1.5, ..Default::default() });

        assert!(out.get_pixel(4, 4)[0] < 255);
        assert!(out.get_pixel(5, 4)[0] > 0);
        assert!(out.get_pixel(4, 5)[0] > 0);
    }

    #[test]
    fn test_blur_keeps_flat_image_flat() {
        let image = RgbImage::from_pixel(6, 4, Rgb([120, 60, 30]));
        let out = apply(&image, &FilterParams { blur: 5.0, ..Default::default() });
        assert_eq!(out, image);
    }

    #[test]
    fn test_out_of_range_is_clamped_not_propagated() {
        let image = RgbImage::from_pixel(1, 1, Rgb([100, 100, 100]));
        let wild = apply(&image, &FilterParams { brightness: 1000.0, ..Default::default() });
        let max = apply(&image, &FilterParams { brightness: 150.0, ..Default::default() });
        assert_eq!(wild, max);
    }
}
