//! The per-image transform chain: blur → emboss → grayscale → monochrome.
//!
//! The ordering is a policy decision, not a library constraint — emboss after
//! blur and blur after emboss produce visibly different results, so the chain
//! is fixed and configuration only chooses which stages participate. Every
//! filter is a pure `DynamicImage → DynamicImage` function and none can fail
//! on valid pixel data; corrupt input surfaces as a decode error upstream,
//! before this stage runs.

use crate::config::RunConfig;
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use tracing::debug;

/// Luma cut-off for the monochrome stage. Matches the midpoint threshold of
/// PIL's `convert('1')` without dithering.
const MONO_THRESHOLD: u8 = 128;

/// Bias added to the emboss convolution so flat regions come out mid-gray
/// instead of black.
const EMBOSS_OFFSET: f32 = 128.0;

/// Apply the configured filters in the fixed chain order.
pub fn apply_chain(mut img: DynamicImage, config: &RunConfig, page: usize, index: usize) -> DynamicImage {
    if config.blur > 0 {
        debug!("Page {page}: blurring image {index} (radius {})", config.blur);
        img = img.blur(config.blur as f32);
    }
    if config.emboss {
        debug!("Page {page}: embossing image {index}");
        img = emboss(&img);
    }
    if config.gray {
        debug!("Page {page}: gray-scaling image {index}");
        img = img.grayscale();
    }
    if config.black {
        debug!("Page {page}: thresholding image {index} to black/white");
        img = monochrome(&img);
    }
    img
}

/// Directional emboss: for each channel, `128 + (centre − upper_left)`,
/// clamped to [0, 255].
///
/// Hand-rolled rather than `DynamicImage::filter3x3` because the kernel needs
/// the +128 offset term, which a plain convolution cannot express. Border
/// pixels reuse the nearest in-bounds neighbour.
pub fn emboss(img: &DynamicImage) -> DynamicImage {
    let src: RgbImage = img.to_rgb8();
    let (width, height) = src.dimensions();
    let mut out = RgbImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let centre = src.get_pixel(x, y);
            let ul = src.get_pixel(x.saturating_sub(1), y.saturating_sub(1));
            let px = out.get_pixel_mut(x, y);
            for ch in 0..3 {
                let value = EMBOSS_OFFSET + f32::from(centre[ch]) - f32::from(ul[ch]);
                px[ch] = value.clamp(0.0, 255.0) as u8;
            }
        }
    }

    DynamicImage::ImageRgb8(out)
}

/// Reduce to a strictly two-level black/white image.
///
/// Output is an 8-bit luma buffer whose pixels are all 0 or 255 — the
/// `image` crate has no packed 1-bit representation, so "1-bit" here means
/// exactly two levels.
pub fn monochrome(img: &DynamicImage) -> DynamicImage {
    let luma = img.to_luma8();
    let (width, height) = luma.dimensions();
    let mut out = GrayImage::new(width, height);

    for (x, y, pixel) in luma.enumerate_pixels() {
        let value = if pixel[0] >= MONO_THRESHOLD { 255 } else { 0 };
        out.put_pixel(x, y, Luma([value]));
    }

    DynamicImage::ImageLuma8(out)
}
