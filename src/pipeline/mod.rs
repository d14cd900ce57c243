//! Pipeline stages for PDF image transformation.
//!
//! Each submodule implements exactly one step. Keeping stages separate makes
//! each independently testable and lets one be replaced (e.g. a different
//! caption backend) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ walk ──▶ caption ──▶ filters ──▶ overlay ──▶ rewrite
//! (path)  (pdfium)  (original)   (chain)     (text)     (insert)
//! ```
//!
//! 1. [`input`]   — validate the user-supplied path before pdfium sees it
//! 2. [`walk`]    — open the document and enumerate each page's embedded
//!    images with their bounding boxes, in document order
//! 3. [`caption`] — describe the *original* pixels via the remote vision
//!    endpoint; the only stage with network I/O, and the only optional one
//! 4. [`filters`] — the fixed-order transform chain (blur → emboss → gray →
//!    monochrome); pure pixel functions
//! 5. [`overlay`] — wrap the description and burn it onto the filtered image
//! 6. [`rewrite`] — re-insert the result at the original bbox, aspect
//!    preserved
//!
//! [`encode`] is shared plumbing: JPEG bytes and base64 data-URIs used by
//! the caption payload and the snapshot handoff.

pub mod caption;
pub mod encode;
pub mod filters;
pub mod input;
pub mod overlay;
pub mod rewrite;
pub mod walk;
