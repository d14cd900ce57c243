//! CLI binary for pdf-imagefx.
//!
//! A thin shim over the library crate that maps CLI flags to `RunConfig`
//! and prints a one-line summary.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_imagefx::{transform_document, RunConfig};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Blur every image in a document
  pdffx document.pdf --blur 5 -o blurred.pdf

  # Grayscale + monochrome threshold
  pdffx document.pdf --gray --black

  # Emboss with verbose diagnostics
  pdffx -v document.pdf --emboss -o embossed.pdf

  # Caption each image with an AI description burned onto it
  pdffx document.pdf --describe --openai-key sk-... --font-size 24

  # Custom caption instruction
  pdffx document.pdf --describe --openai-key sk-... \
        --description-prompt "Name the dominant colour in three words."

FILTER ORDER:
  Filters always apply in the fixed order blur -> emboss -> gray -> black,
  regardless of flag order. Captions are generated from the ORIGINAL image,
  then drawn onto the filtered result.

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY           Fallback for --openai-key
  PDFIUM_DYNAMIC_LIB_PATH  Directory containing libpdfium

SETUP:
  pdfium is loaded at runtime. Place libpdfium next to the executable or
  set PDFIUM_DYNAMIC_LIB_PATH to the directory that contains it.
"#;

/// Transform the images embedded in a PDF file.
#[derive(Parser, Debug)]
#[command(
    name = "pdffx",
    version,
    about = "Transform the images embedded in a PDF file",
    long_about = "Extract every raster image embedded in a PDF, apply blur / emboss / \
grayscale / monochrome filters and optional AI caption overlays, and write a new \
document with the transformed images back at their original positions.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file path.
    pdf_file: PathBuf,

    /// Enable diagnostic logging.
    #[arg(short, long)]
    verbose: bool,

    /// Destination path for the rewritten document.
    #[arg(short, long, default_value = "output.pdf")]
    output_file: PathBuf,

    /// Gaussian blur radius [0-50]; 0 disables.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=50))]
    blur: u32,

    /// Gray-scale the images of the PDF.
    #[arg(long)]
    gray: bool,

    /// Threshold the images of the PDF to black/white.
    #[arg(long)]
    black: bool,

    /// Apply an emboss effect to the images of the PDF.
    #[arg(long)]
    emboss: bool,

    /// Caption each image via the vision endpoint (requires --openai-key).
    #[arg(long)]
    describe: bool,

    /// Bearer credential for the captioning endpoint.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: Option<String>,

    /// Vision model used for captioning.
    #[arg(long, default_value = pdf_imagefx::prompts::DEFAULT_VISION_MODEL)]
    model: String,

    /// Instruction sent with each captioning request.
    #[arg(long, default_value = pdf_imagefx::prompts::DEFAULT_DESCRIPTION_PROMPT)]
    description_prompt: String,

    /// Per-request token ceiling for the captioning call.
    #[arg(long, default_value_t = 300)]
    max_openai_tokens: usize,

    /// Caption overlay font size in pixels.
    #[arg(long, default_value_t = 18)]
    font_size: u32,

    /// TrueType/OpenType font file for the caption overlay.
    #[arg(long)]
    font_path: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli).context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let report = transform_document(&cli.pdf_file, &cli.output_file, &config)
        .context("Transformation failed")?;

    eprintln!(
        "{} images transformed on {} pages in {}ms  →  {}",
        report.images,
        report.pages,
        report.duration_ms,
        cli.output_file.display(),
    );
    if cli.describe {
        eprintln!(
            "   {} captions obtained, {} failed",
            report.captions, report.caption_failures
        );
    }

    Ok(())
}

/// Map CLI args to `RunConfig`.
fn build_config(cli: &Cli) -> Result<RunConfig> {
    let mut builder = RunConfig::builder()
        .blur(cli.blur)
        .gray(cli.gray)
        .black(cli.black)
        .emboss(cli.emboss)
        .describe(cli.describe)
        .model(cli.model.clone())
        .description_prompt(cli.description_prompt.clone())
        .max_tokens(cli.max_openai_tokens)
        .font_size(cli.font_size);

    if let Some(ref key) = cli.openai_key {
        builder = builder.openai_key(key.clone());
    }
    if let Some(ref path) = cli.font_path {
        builder = builder.font_path(path.clone());
    }

    Ok(builder.build()?)
}
