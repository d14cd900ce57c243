//! Document traversal: open the PDF and enumerate embedded images per page.
//!
//! The walker is read-only. For each page it collects every image object in
//! object order, pairing the decoded pixel buffer with the bounding box the
//! image is rendered into. Bounds are converted at this seam from pdfium's
//! point types into a plain [`ImageBounds`] so the downstream fit math stays
//! pure and testable without a pdfium binding.
//!
//! Extraction uses the *raw* embedded image data (what the PDF actually
//! stores), not a render of the page region, so filters operate on the
//! original pixels rather than on resampled output.

use crate::error::ImageFxError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// The rectangle in page coordinates where an image is rendered.
///
/// PDF page space: origin bottom-left, y grows upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBounds {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl ImageBounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

/// One embedded image extracted from a page: its position in extraction
/// order, its decoded pixels, and its placement rectangle.
pub struct ExtractedImage {
    /// 0-based position among the page's image objects, in object order.
    pub index: usize,
    /// Decoded pixel buffer of the embedded resource.
    pub pixels: DynamicImage,
    /// Where the image is rendered on the page.
    pub bounds: ImageBounds,
}

/// Open a PDF document, mapping pdfium's opaque error into a fatal
/// [`ImageFxError::CorruptPdf`].
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    path: &Path,
) -> Result<PdfDocument<'a>, ImageFxError> {
    pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| ImageFxError::CorruptPdf {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })
}

/// Collect every embedded image on `page`, in object order.
///
/// Pages with zero images return an empty vector; that is not an error.
/// A decode failure on genuinely corrupt embedded pixel data is fatal and
/// aborts the run before any output is written.
pub fn page_images(page: &PdfPage, page_num: usize) -> Result<Vec<ExtractedImage>, ImageFxError> {
    let mut images = Vec::new();

    for object in page.objects().iter() {
        let Some(image_object) = object.as_image_object() else {
            continue;
        };
        let index = images.len();

        let rect = object
            .bounds()
            .map_err(|e| ImageFxError::ImageDecodeFailed {
                page: page_num,
                index,
                detail: format!("no bounds: {e:?}"),
            })?
            .to_rect();

        let pixels =
            image_object
                .get_raw_image()
                .map_err(|e| ImageFxError::ImageDecodeFailed {
                    page: page_num,
                    index,
                    detail: format!("{e:?}"),
                })?;

        let bounds = ImageBounds {
            left: rect.left.value,
            bottom: rect.bottom.value,
            right: rect.right.value,
            top: rect.top.value,
        };

        debug!(
            "Page {page_num}: image {index} is {}x{} px at ({:.1}, {:.1})–({:.1}, {:.1})",
            pixels.width(),
            pixels.height(),
            bounds.left,
            bounds.bottom,
            bounds.right,
            bounds.top,
        );

        images.push(ExtractedImage {
            index,
            pixels,
            bounds,
        });
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_dimensions() {
        let b = ImageBounds {
            left: 10.0,
            bottom: 20.0,
            right: 110.0,
            top: 170.0,
        };
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 150.0);
    }
}
