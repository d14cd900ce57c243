//! Page rewriting: place the transformed image back at its original bounding
//! box, scaled to fit without distortion.
//!
//! The fitted rectangle preserves the image's own width/height ratio inside
//! the bbox (letterboxing, centred on both axes) — never a stretch to the box
//! edges. The new image object is layered over the original at the same
//! coordinates, replacing the visible content without touching the page's
//! other objects.

use crate::error::ImageFxError;
use crate::pipeline::walk::ImageBounds;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, warn};

/// A placement rectangle in page coordinates: bottom-left corner + size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Scale an `img_width` × `img_height` image to fit inside `bounds`,
/// preserving aspect ratio and centring on both axes.
///
/// Returns `None` for degenerate inputs (empty box or empty image), which
/// the caller logs and skips.
pub fn fit_within(bounds: &ImageBounds, img_width: u32, img_height: u32) -> Option<FittedRect> {
    let box_w = bounds.width();
    let box_h = bounds.height();
    if box_w <= 0.0 || box_h <= 0.0 || img_width == 0 || img_height == 0 {
        return None;
    }

    let scale = (box_w / img_width as f32).min(box_h / img_height as f32);
    let width = img_width as f32 * scale;
    let height = img_height as f32 * scale;

    Some(FittedRect {
        x: bounds.left + (box_w - width) / 2.0,
        y: bounds.bottom + (box_h - height) / 2.0,
        width,
        height,
    })
}

/// Insert `img` on `page` at the fitted rectangle inside `bounds`.
pub fn replace_image(
    page: &mut PdfPage,
    bounds: &ImageBounds,
    img: &DynamicImage,
    page_num: usize,
    index: usize,
) -> Result<(), ImageFxError> {
    let Some(fit) = fit_within(bounds, img.width(), img.height()) else {
        warn!("Page {page_num}: image {index} has a degenerate bounding box, skipping re-insertion");
        return Ok(());
    };

    debug!(
        "Page {page_num}: re-inserting image {index} at ({:.1}, {:.1}) size {:.1}x{:.1}",
        fit.x, fit.y, fit.width, fit.height
    );

    page.objects_mut()
        .create_image_object(
            PdfPoints::new(fit.x),
            PdfPoints::new(fit.y),
            img,
            Some(PdfPoints::new(fit.width)),
            Some(PdfPoints::new(fit.height)),
        )
        .map_err(|e| ImageFxError::ImageInsertFailed {
            page: page_num,
            index,
            detail: format!("{e:?}"),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn bounds(left: f32, bottom: f32, right: f32, top: f32) -> ImageBounds {
        ImageBounds {
            left,
            bottom,
            right,
            top,
        }
    }

    #[test]
    fn exact_aspect_fills_the_box() {
        let fit = fit_within(&bounds(0.0, 0.0, 200.0, 100.0), 400, 200).unwrap();
        assert!((fit.x - 0.0).abs() < EPS);
        assert!((fit.y - 0.0).abs() < EPS);
        assert!((fit.width - 200.0).abs() < EPS);
        assert!((fit.height - 100.0).abs() < EPS);
    }

    #[test]
    fn wide_image_in_square_box_letterboxes_vertically() {
        let fit = fit_within(&bounds(10.0, 10.0, 110.0, 110.0), 200, 100).unwrap();
        // Scales to 100x50, centred: x at the left edge, y pushed up 25.
        assert!((fit.width - 100.0).abs() < EPS);
        assert!((fit.height - 50.0).abs() < EPS);
        assert!((fit.x - 10.0).abs() < EPS);
        assert!((fit.y - 35.0).abs() < EPS);
    }

    #[test]
    fn tall_image_in_square_box_letterboxes_horizontally() {
        let fit = fit_within(&bounds(0.0, 0.0, 100.0, 100.0), 50, 200).unwrap();
        assert!((fit.width - 25.0).abs() < EPS);
        assert!((fit.height - 100.0).abs() < EPS);
        assert!((fit.x - 37.5).abs() < EPS);
        assert!((fit.y - 0.0).abs() < EPS);
    }

    #[test]
    fn aspect_ratio_is_preserved() {
        let fit = fit_within(&bounds(5.0, 7.0, 305.0, 117.0), 123, 77).unwrap();
        let img_ratio = 123.0f32 / 77.0;
        let fit_ratio = fit.width / fit.height;
        assert!((img_ratio - fit_ratio).abs() < 1e-3);
    }

    #[test]
    fn result_stays_inside_the_box() {
        let b = bounds(20.0, 30.0, 220.0, 130.0);
        let fit = fit_within(&b, 333, 444).unwrap();
        assert!(fit.x >= b.left - EPS);
        assert!(fit.y >= b.bottom - EPS);
        assert!(fit.x + fit.width <= b.right + EPS);
        assert!(fit.y + fit.height <= b.top + EPS);
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        assert!(fit_within(&bounds(0.0, 0.0, 0.0, 100.0), 10, 10).is_none());
        assert!(fit_within(&bounds(0.0, 0.0, 100.0, 0.0), 10, 10).is_none());
        assert!(fit_within(&bounds(0.0, 0.0, 100.0, 100.0), 0, 10).is_none());
        assert!(fit_within(&bounds(0.0, 0.0, 100.0, 100.0), 10, 0).is_none());
    }
}
