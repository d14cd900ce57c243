//! Input validation: check the user-supplied path before touching pdfium.
//!
//! pdfium's own open errors are opaque, so we validate existence, read
//! permission, and the `%PDF` magic bytes first. Callers get a precise,
//! actionable error instead of a generic "load failed", and a malformed input
//! aborts the run before any output could exist.

use crate::error::ImageFxError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` points at a readable PDF file.
///
/// Returns the path unchanged on success so callers can chain into the
/// document open.
pub fn validate_input(path: &Path) -> Result<PathBuf, ImageFxError> {
    if !path.exists() {
        return Err(ImageFxError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ImageFxError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ImageFxError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ImageFxError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Validated input PDF: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let err = validate_input(Path::new("/nonexistent/doc.pdf")).unwrap_err();
        assert!(matches!(err, ImageFxError::FileNotFound { .. }));
    }

    #[test]
    fn wrong_magic_is_not_a_pdf() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"hello world").unwrap();
        let err = validate_input(tmp.path()).unwrap_err();
        assert!(matches!(err, ImageFxError::NotAPdf { .. }));
    }

    #[test]
    fn pdf_magic_passes() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.7\n%fake body").unwrap();
        let path = validate_input(tmp.path()).unwrap();
        assert_eq!(path, tmp.path());
    }

    #[test]
    fn short_file_passes_magic_check() {
        // Fewer than 4 bytes: magic cannot be read, left for pdfium to reject.
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%P").unwrap();
        assert!(validate_input(tmp.path()).is_ok());
    }
}
