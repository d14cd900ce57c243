//! Error types for the pdf-imagefx library.
//!
//! Only *fatal* conditions live here — anything that stops the run before the
//! output document is written (bad input, unreadable PDF, missing credential,
//! failed save). The recoverable failures the pipeline absorbs (a captioning
//! request that errors out, a temp-snapshot write that fails, a font that
//! cannot be found) never become an [`ImageFxError`]: they degrade to "no
//! caption for this image" with a `tracing` diagnostic, and the image still
//! receives its filters and is re-inserted.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-imagefx library.
#[derive(Debug, Error)]
pub enum ImageFxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' could not be opened: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// An embedded image's pixel data could not be decoded.
    ///
    /// Aborts the whole run: a half-transformed document would silently drop
    /// content, and no output has been written at this point.
    #[error("Failed to decode image {index} on page {page}: {detail}")]
    ImageDecodeFailed {
        page: usize,
        index: usize,
        detail: String,
    },

    /// Re-inserting a transformed image onto its page failed.
    #[error("Failed to re-insert image {index} on page {page}: {detail}")]
    ImageInsertFailed {
        page: usize,
        index: usize,
        detail: String,
    },

    // ── Captioning errors ─────────────────────────────────────────────────
    /// `describe` was requested without an API credential.
    ///
    /// Checked before the document is opened, so nothing is written.
    #[error("Captioning requested but no API key provided.\nPass one with --openai-key <KEY>.")]
    MissingApiKey,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the output document.
    #[error("Failed to save output document '{path}': {detail}")]
    SaveFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_mentions_flag() {
        let msg = ImageFxError::MissingApiKey.to_string();
        assert!(msg.contains("--openai-key"), "got: {msg}");
    }

    #[test]
    fn decode_failure_names_page_and_index() {
        let e = ImageFxError::ImageDecodeFailed {
            page: 3,
            index: 1,
            detail: "truncated stream".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"));
        assert!(msg.contains("image 1"));
    }

    #[test]
    fn not_a_pdf_shows_path() {
        let e = ImageFxError::NotAPdf {
            path: PathBuf::from("x.txt"),
            magic: *b"hell",
        };
        assert!(e.to_string().contains("x.txt"));
    }
}
