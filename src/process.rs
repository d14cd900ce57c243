//! Top-level orchestration: walk the document, transform each image, save.
//!
//! Control flows strictly downward — walker → captioner → filter chain →
//! overlay → rewriter — one image at a time, one page at a time, on the
//! calling thread. The document is saved exactly once at the end, so a fatal
//! mid-run error leaves no output file behind.

use crate::config::RunConfig;
use crate::error::ImageFxError;
use crate::output::RunReport;
use crate::pipeline::overlay::TextMetrics;
use crate::pipeline::{caption, encode, filters, input, overlay, rewrite, walk};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Transform every embedded image in the PDF at `input_path` and write the
/// rewritten document to `output_path`.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Returns `Err(ImageFxError)` only for fatal conditions: unreadable or
/// non-PDF input, captioning requested without a credential, an embedded
/// image that fails to decode, or a failed save. Captioning failures are
/// absorbed per image — the image still gets its filters and is re-inserted
/// without a caption.
pub fn transform_document(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &RunConfig,
) -> Result<RunReport, ImageFxError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();
    info!("Starting transformation: {}", input_path.display());

    // ── Step 1: Fatal pre-checks, before any document I/O ────────────────
    if config.describe && config.openai_key.as_deref().unwrap_or("").is_empty() {
        return Err(ImageFxError::MissingApiKey);
    }

    // ── Step 2: Validate input ───────────────────────────────────────────
    let pdf_path = input::validate_input(input_path)?;

    // ── Step 3: Open the document ────────────────────────────────────────
    let pdfium = Pdfium::default();
    let document = walk::open_document(&pdfium, &pdf_path)?;
    let mut report = RunReport {
        pages: document.pages().len() as usize,
        ..RunReport::default()
    };
    info!("PDF loaded: {} pages", report.pages);

    // ── Step 4: Per-run captioning resources ─────────────────────────────
    // One HTTP client and one loaded font for the whole run; both are only
    // needed when captioning is on.
    let client = config.describe.then(reqwest::blocking::Client::new);
    let font = if config.describe {
        overlay::FontSpec::load(config.font_path.as_deref(), config.font_size)
    } else {
        None
    };

    // ── Step 5: Walk pages in document order ─────────────────────────────
    for (page_num, mut page) in document.pages().iter().enumerate() {
        debug!("Processing page {page_num}");
        let extracted = walk::page_images(&page, page_num)?;

        for image in extracted {
            let description = if config.describe {
                let text = describe_original(client.as_ref(), &image.pixels, config, page_num, image.index);
                if text.is_empty() {
                    report.caption_failures += 1;
                } else {
                    report.captions += 1;
                }
                text
            } else {
                String::new()
            };

            // ── Transform chain ──────────────────────────────────────────
            let mut transformed = filters::apply_chain(image.pixels, config, page_num, image.index);

            // ── Caption overlay on the *filtered* image ──────────────────
            if !description.is_empty() {
                if let Some(font) = font.as_ref() {
                    let lines = overlay::wrap_text(
                        Some(&description),
                        Some(font as &dyn TextMetrics),
                        Some(transformed.width()),
                    );
                    if !lines.is_empty() {
                        transformed = overlay::draw_caption(&transformed, &lines, font);
                    }
                }
            }

            // ── Re-insert at the original bounding box ───────────────────
            rewrite::replace_image(&mut page, &image.bounds, &transformed, page_num, image.index)?;
            report.images += 1;
        }
        // Per-page extraction buffers drop here, before the next page.
    }

    // ── Step 6: Persist once ─────────────────────────────────────────────
    document
        .save_to_file(output_path)
        .map_err(|e| ImageFxError::SaveFailed {
            path: output_path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

    report.duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Transformation complete: {} images on {} pages in {}ms → {}",
        report.images,
        report.pages,
        report.duration_ms,
        output_path.display()
    );

    Ok(report)
}

/// Caption the original (pre-filter) pixels via a scoped temp snapshot.
///
/// The snapshot is a uniquely-named temp file written immediately before the
/// call and removed when it goes out of scope, on every exit path. Any
/// failure along the way degrades to an empty description.
fn describe_original(
    client: Option<&reqwest::blocking::Client>,
    original: &DynamicImage,
    config: &RunConfig,
    page_num: usize,
    index: usize,
) -> String {
    let Some(client) = client else {
        return String::new();
    };
    debug!("Describing image {index} on page {page_num}");

    let snapshot = match tempfile::Builder::new()
        .prefix("pdffx-")
        .suffix(".jpg")
        .tempfile()
    {
        Ok(f) => f,
        Err(e) => {
            warn!("Page {page_num}: failed to create snapshot for image {index}: {e}");
            return String::new();
        }
    };

    let bytes = match encode::jpeg_bytes(original) {
        Ok(b) => b,
        Err(e) => {
            warn!("Page {page_num}: failed to encode snapshot for image {index}: {e}");
            return String::new();
        }
    };
    if let Err(e) = std::fs::write(snapshot.path(), bytes) {
        warn!("Page {page_num}: failed to write snapshot for image {index}: {e}");
        return String::new();
    }

    caption::describe_image(client, snapshot.path(), config)
    // `snapshot` drops here; the temp file is deleted whether or not the
    // request succeeded.
}
