//! Configuration for one transformation run.
//!
//! All behaviour is controlled through [`RunConfig`], built via its
//! [`RunConfigBuilder`]. The config is resolved once at startup, is immutable
//! for the run's duration, and is threaded explicitly through every pipeline
//! stage — there is no ambient global state.
//!
//! # Design choice: builder over constructor
//! A twelve-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest, with cross-field validation (captioning
//! requires a credential) happening once in [`RunConfigBuilder::build`].

use crate::error::ImageFxError;
use crate::prompts::{DEFAULT_DESCRIPTION_PROMPT, DEFAULT_VISION_MODEL, OPENAI_API_BASE};
use std::path::PathBuf;

/// Upper bound on the Gaussian blur radius accepted by the builder.
pub const MAX_BLUR_RADIUS: u32 = 50;

/// Configuration for a PDF image-transformation run.
///
/// Built via [`RunConfig::builder()`] or [`RunConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_imagefx::RunConfig;
///
/// let config = RunConfig::builder()
///     .blur(5)
///     .gray(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.blur, 5);
/// ```
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Gaussian blur radius in [0, 50]. 0 disables the blur stage entirely
    /// (pixel-identical passthrough, not a weak blur). Default: 0.
    pub blur: u32,

    /// Apply the fixed directional emboss kernel. Default: false.
    pub emboss: bool,

    /// Reduce each image to single-channel luminance. Default: false.
    pub gray: bool,

    /// Threshold each image to strictly black/white. Applied after grayscale
    /// when both are enabled. Default: false.
    pub black: bool,

    /// Caption each image via the remote vision endpoint and burn the wrapped
    /// text onto the transformed image. Requires `openai_key`. Default: false.
    pub describe: bool,

    /// Bearer credential for the captioning endpoint.
    pub openai_key: Option<String>,

    /// Vision model identifier. Default: [`DEFAULT_VISION_MODEL`].
    pub model: String,

    /// Instruction sent with each captioning request.
    /// Default: [`DEFAULT_DESCRIPTION_PROMPT`].
    pub description_prompt: String,

    /// Per-request token ceiling for the captioning call. Default: 300.
    ///
    /// 300 tokens comfortably covers the default 20-word instruction while
    /// keeping a runaway response from costing real money.
    pub max_tokens: usize,

    /// Caption overlay font size in pixels. Default: 18.
    pub font_size: u32,

    /// Explicit TrueType/OpenType font file for the overlay. When `None`, a
    /// short list of common system font locations is probed; if none exists
    /// the overlay is skipped with a warning (the run continues).
    pub font_path: Option<PathBuf>,

    /// Chat-completions endpoint URL. Default: [`OPENAI_API_BASE`].
    ///
    /// Overridable so tests can point the captioner at a local stub. Not
    /// exposed on the CLI.
    pub api_base: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            blur: 0,
            emboss: false,
            gray: false,
            black: false,
            describe: false,
            openai_key: None,
            model: DEFAULT_VISION_MODEL.to_string(),
            description_prompt: DEFAULT_DESCRIPTION_PROMPT.to_string(),
            max_tokens: 300,
            font_size: 18,
            font_path: None,
            api_base: OPENAI_API_BASE.to_string(),
        }
    }
}

impl RunConfig {
    /// Create a new builder for `RunConfig`.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }

    /// True when at least one pixel filter is enabled.
    pub fn any_filter(&self) -> bool {
        self.blur > 0 || self.emboss || self.gray || self.black
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn blur(mut self, radius: u32) -> Self {
        self.config.blur = radius;
        self
    }

    pub fn emboss(mut self, v: bool) -> Self {
        self.config.emboss = v;
        self
    }

    pub fn gray(mut self, v: bool) -> Self {
        self.config.gray = v;
        self
    }

    pub fn black(mut self, v: bool) -> Self {
        self.config.black = v;
        self
    }

    pub fn describe(mut self, v: bool) -> Self {
        self.config.describe = v;
        self
    }

    pub fn openai_key(mut self, key: impl Into<String>) -> Self {
        self.config.openai_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn description_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.description_prompt = prompt.into();
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn font_size(mut self, px: u32) -> Self {
        self.config.font_size = px.max(1);
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = Some(path.into());
        self
    }

    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.config.api_base = url.into();
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// # Errors
    /// * blur radius outside [0, 50]
    /// * `describe` enabled without an `openai_key`
    /// * empty model identifier
    pub fn build(self) -> Result<RunConfig, ImageFxError> {
        let c = &self.config;
        if c.blur > MAX_BLUR_RADIUS {
            return Err(ImageFxError::InvalidConfig(format!(
                "Blur radius must be 0–{MAX_BLUR_RADIUS}, got {}",
                c.blur
            )));
        }
        if c.describe && c.openai_key.as_deref().unwrap_or("").is_empty() {
            return Err(ImageFxError::MissingApiKey);
        }
        if c.model.is_empty() {
            return Err(ImageFxError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
