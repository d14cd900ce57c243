//! # pdf-imagefx
//!
//! Transform the raster images embedded in a PDF — in place, page by page.
//!
//! ## What it does
//!
//! Every embedded image is extracted with its placement rectangle, run
//! through a fixed-order filter chain (Gaussian blur → emboss → grayscale →
//! monochrome threshold), optionally captioned by an OpenAI-compatible
//! vision endpoint, and re-inserted at its original bounding box with its
//! aspect ratio preserved. The rest of the page — text, vector art, layout —
//! is untouched, and the rewritten document is saved in a single operation
//! at the end of the run.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Walk     enumerate each page's images + bounding boxes (pdfium)
//!  ├─ 2. Caption  describe the *original* pixels via the vision endpoint
//!  ├─ 3. Filter   blur → emboss → grayscale → monochrome (fixed order)
//!  ├─ 4. Overlay  wrap the caption and burn it onto the filtered image
//!  ├─ 5. Rewrite  re-insert at the original bbox, aspect preserved
//!  └─ 6. Save     one save at the end; no partial output ever exists
//! ```
//!
//! Processing is fully synchronous and single-threaded: pages in document
//! order, images in extraction order, one at a time. The captioning call
//! blocks the pipeline; its failures degrade to "no caption" and never cost
//! an image its other filters.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_imagefx::{transform_document, RunConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::builder().blur(5).gray(true).build()?;
//!     let report = transform_document("input.pdf", "output.pdf", &config)?;
//!     eprintln!("{} images transformed on {} pages", report.images, report.pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdffx` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-imagefx = { version = "0.2", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! The PDF engine is Google's pdfium, bound at runtime. Place `libpdfium`
//! next to the executable, or point `PDFIUM_DYNAMIC_LIB_PATH` at the
//! directory containing it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RunConfig, RunConfigBuilder, MAX_BLUR_RADIUS};
pub use error::ImageFxError;
pub use output::RunReport;
pub use process::transform_document;
