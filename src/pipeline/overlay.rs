//! Caption layout and rendering: greedy word-wrap plus a shadowed text
//! overlay drawn onto the transformed image.
//!
//! Measurement goes through the [`TextMetrics`] trait so the wrap policy can
//! be tested with fixed metrics, without shipping or locating a font file.
//! The production implementation is [`FontSpec`]: an `ab_glyph` font at a
//! pixel scale, drawn via `imageproc`.
//!
//! The wrap check measures the *candidate line* being assembled, not the
//! whole remaining text — measuring the full string on every iteration (as
//! naive implementations do) either never wraps or wraps after every word.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{DynamicImage, Rgb};
use imageproc::drawing::draw_text_mut;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Left margin for caption lines, in pixels.
const LEFT_MARGIN: i32 = 10;

/// Distance from the image top to the first line, in pixels.
const TOP_MARGIN: i32 = 10;

/// Shadow offset, in pixels, applied on both axes.
const SHADOW_OFFSET: i32 = 1;

/// Fallback font locations probed when no `--font-path` is given.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Width and height of a rendered line of text, in pixels.
pub trait TextMetrics {
    fn line_width(&self, text: &str) -> u32;
    fn line_height(&self, text: &str) -> u32;
}

/// A loaded font at a fixed pixel scale.
pub struct FontSpec {
    font: FontVec,
    scale: PxScale,
}

impl FontSpec {
    /// Load a font for the overlay at `size` pixels.
    ///
    /// Tries `path` first when given, then the system candidate list.
    /// Returns `None` when no usable font exists; the caller skips the
    /// overlay and the run continues.
    pub fn load(path: Option<&Path>, size: u32) -> Option<Self> {
        let candidates: Vec<PathBuf> = path
            .map(|p| vec![p.to_path_buf()])
            .unwrap_or_else(|| SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from).collect());

        for candidate in &candidates {
            let Ok(bytes) = std::fs::read(candidate) else {
                continue;
            };
            match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    debug!("Loaded overlay font: {}", candidate.display());
                    return Some(Self {
                        font,
                        scale: PxScale::from(size as f32),
                    });
                }
                Err(e) => warn!("Unusable font '{}': {e}", candidate.display()),
            }
        }

        warn!("No usable overlay font found; captions will not be drawn");
        None
    }
}

impl TextMetrics for FontSpec {
    fn line_width(&self, text: &str) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0f32;
        let mut prev = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width.ceil().max(0.0) as u32
    }

    fn line_height(&self, text: &str) -> u32 {
        // Ink height of this specific line; empty or all-whitespace lines
        // fall back to the nominal scaled line height.
        let scaled = self.font.as_scaled(self.scale);
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for c in text.chars() {
            let glyph = scaled.scaled_glyph(c);
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let b = outlined.px_bounds();
                min_y = min_y.min(b.min.y);
                max_y = max_y.max(b.max.y);
            }
        }
        if max_y > min_y {
            (max_y - min_y).ceil() as u32
        } else {
            scaled.height().ceil() as u32
        }
    }
}

/// Greedily wrap `text` into lines whose rendered width does not exceed
/// `max_width`.
///
/// Words are appended to the current line while the *candidate* line still
/// fits; a word that would not fit flushes the line and starts the next one.
/// A single word wider than `max_width` gets a line of its own — there is no
/// mid-word breaking. Any absent input returns an empty list with a logged
/// diagnostic rather than panicking.
pub fn wrap_text(
    text: Option<&str>,
    metrics: Option<&dyn TextMetrics>,
    max_width: Option<u32>,
) -> Vec<String> {
    let (Some(text), Some(metrics), Some(max_width)) = (text, metrics, max_width) else {
        warn!(
            "wrap_text: missing input (text: {}, metrics: {}, max_width: {})",
            text.is_some(),
            metrics.is_some(),
            max_width.is_some(),
        );
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };

        if line.is_empty() || metrics.line_width(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(line);
            line = word.to_string();
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Draw wrapped caption lines onto `img`.
///
/// Lines stack top-to-bottom from the top-left margin, each advancing by its
/// own measured height. Every line is drawn twice: a dark shadow offset by
/// one pixel first, then the light foreground on top of it. Vertical
/// overflow past the image bottom is permitted — `imageproc` clips the
/// drawing, not us.
pub fn draw_caption(img: &DynamicImage, lines: &[String], font: &FontSpec) -> DynamicImage {
    let mut canvas = img.to_rgb8();
    let mut y = TOP_MARGIN;

    for line in lines {
        draw_text_mut(
            &mut canvas,
            Rgb([0u8, 0u8, 0u8]),
            LEFT_MARGIN + SHADOW_OFFSET,
            y + SHADOW_OFFSET,
            font.scale,
            &font.font,
            line,
        );
        draw_text_mut(
            &mut canvas,
            Rgb([255u8, 255u8, 255u8]),
            LEFT_MARGIN,
            y,
            font.scale,
            &font.font,
            line,
        );
        y += font.line_height(line) as i32;
    }

    DynamicImage::ImageRgb8(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is `char_width` px wide; every line is `height` tall.
    struct FixedMetrics {
        char_width: u32,
        height: u32,
    }

    impl TextMetrics for FixedMetrics {
        fn line_width(&self, text: &str) -> u32 {
            text.chars().count() as u32 * self.char_width
        }
        fn line_height(&self, _text: &str) -> u32 {
            self.height
        }
    }

    const TEN_PER_CHAR: FixedMetrics = FixedMetrics {
        char_width: 10,
        height: 12,
    };

    #[test]
    fn absent_inputs_return_empty() {
        assert!(wrap_text(None, Some(&TEN_PER_CHAR), Some(100)).is_empty());
        assert!(wrap_text(Some("hi"), None, Some(100)).is_empty());
        assert!(wrap_text(Some("hi"), Some(&TEN_PER_CHAR), None).is_empty());
    }

    #[test]
    fn fitting_line_is_returned_unchanged() {
        // "two words" = 9 chars = 90 px, fits in 100.
        let lines = wrap_text(Some("two words"), Some(&TEN_PER_CHAR), Some(100));
        assert_eq!(lines, vec!["two words".to_string()]);
    }

    #[test]
    fn wrapping_is_idempotent_on_a_fitting_line() {
        let once = wrap_text(Some("two words"), Some(&TEN_PER_CHAR), Some(100));
        let twice = wrap_text(Some(&once[0]), Some(&TEN_PER_CHAR), Some(100));
        assert_eq!(once, twice);
    }

    #[test]
    fn multi_wrap_keeps_every_line_bounded() {
        // Long enough to force several wraps; this is the case a
        // whole-string measurement gets wrong.
        let text = "one two three four five six seven eight nine ten";
        let max = 120; // 12 chars per line
        let lines = wrap_text(Some(text), Some(&TEN_PER_CHAR), Some(max));
        assert!(lines.len() > 2, "expected several lines, got {lines:?}");
        for line in &lines {
            assert!(
                TEN_PER_CHAR.line_width(line) <= max,
                "line '{line}' exceeds {max}px"
            );
        }
    }

    #[test]
    fn wrapping_preserves_word_sequence() {
        let text = "alpha beta gamma delta epsilon zeta";
        let lines = wrap_text(Some(text), Some(&TEN_PER_CHAR), Some(110));
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
        let original: Vec<&str> = text.split(' ').collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn oversized_word_gets_its_own_line() {
        let lines = wrap_text(
            Some("a incomprehensibilities b"),
            Some(&TEN_PER_CHAR),
            Some(50),
        );
        assert_eq!(
            lines,
            vec![
                "a".to_string(),
                "incomprehensibilities".to_string(),
                "b".to_string()
            ]
        );
    }

    #[test]
    fn empty_text_yields_no_lines() {
        assert!(wrap_text(Some(""), Some(&TEN_PER_CHAR), Some(100)).is_empty());
        assert!(wrap_text(Some("   "), Some(&TEN_PER_CHAR), Some(100)).is_empty());
    }

    #[test]
    fn missing_font_load_degrades_to_none() {
        assert!(FontSpec::load(Some(Path::new("/nonexistent/font.ttf")), 18).is_none());
    }
}
