//! CLI binary for pdfshelf.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `BatchConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfshelf::config::DEFAULT_SETTINGS_FILE;
use pdfshelf::pipeline::input::resolve_inputs;
use pdfshelf::{
    create_links, process, render_covers, render_markdown, write_markdown_file, BatchConfig,
    BatchOutput, BatchProgress, BatchStats, ItemResult, ProgressCallback, Settings,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live progress bar plus one log line per
/// document, rendered through [indicatif] so the bar stays anchored.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// The bar length is set by `on_batch_start` once the input expansion
    /// has produced the real document count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl BatchProgress for CliProgress {
    fn on_batch_start(&self, total_documents: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} PDFs  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_documents as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Processing");
    }

    fn on_document_start(&self, _index: usize, _total: usize, source: &Path) {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(name);
    }

    fn on_document_complete(&self, _index: usize, _total: usize, result: &ItemResult) {
        let name = result
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if result.is_ok() {
            let what = match (&result.cover, &result.link) {
                (Some(_), Some(_)) => "cover + link",
                (Some(_), None) => "cover",
                (None, Some(_)) => "link",
                (None, None) => "ok",
            };
            self.bar.println(format!(
                "  {} {:<40}  {}",
                green("✓"),
                name,
                dim(what)
            ));
        } else {
            for err in &result.errors {
                // Keep long pdfium error dumps to one tidy line.
                let msg = err.to_string();
                let msg = if msg.chars().count() > 100 {
                    let truncated: String = msg.chars().take(99).collect();
                    format!("{truncated}\u{2026}")
                } else {
                    msg
                };
                self.bar
                    .println(format!("  {} {:<40}  {}", red("✗"), name, red(&msg)));
            }
        }
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _stats: &BatchStats) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Process a directory of PDFs into the default vault roots
  pdfshelf ~/books

  # Explicit files, custom roots, titles under the covers
  pdfshelf --image-root ~/vault/images --link-root ~/vault/pdfs \
           --titles "My Report.pdf" "報告 書.pdf"

  # Flat list instead of the 4-column table
  pdfshelf --layout list ~/books

  # Write the markdown fragment to a file instead of stdout
  pdfshelf ~/books -o shelf.md

  # Only refresh the symlinks (no pdfium needed, covers untouched)
  pdfshelf --links-only ~/books

  # Preview the markdown without touching the filesystem
  pdfshelf --preview ~/books

  # Machine-readable results
  pdfshelf --json ~/books > batch.json

  # Persist the current roots/layout as defaults for next time
  pdfshelf --subdir papers --save-settings ~/books

OUTPUT PATHS:
  cover image   <image-root>/<subdir>/<sanitised stem>.png
  symlink       <link-root>/<subdir>/<sanitised basename>  ->  original PDF

  Whitespace runs (including U+3000) in names become a single "_", so the
  markdown references always match the files on disk.

ENVIRONMENT VARIABLES:
  PDFSHELF_IMAGE_ROOT   Override the cover image root
  PDFSHELF_LINK_ROOT    Override the symlink root
  PDFSHELF_SUBDIR       Override the shared subdirectory name
  PDFSHELF_SETTINGS     Path of the persisted settings file
  PDFIUM_LIB_PATH       Directory containing the pdfium library (or the
                        library file itself) — tried before the system path
"#;

/// Batch-render PDF cover thumbnails and link them into a markdown vault.
#[derive(Parser, Debug)]
#[command(
    name = "pdfshelf",
    version,
    about = "Batch-render PDF cover thumbnails and link them into a markdown vault",
    long_about = "For each input PDF: render page 1 to a PNG thumbnail, symlink the \
PDF under the link root, and emit a markdown fragment that shows the thumbnail as a \
clickable link — as a 4-column grid or a flat list. Re-running is safe: existing \
covers are reused and stale links are replaced.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files and/or directories (scanned non-recursively for *.pdf).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Root directory for cover images.
    #[arg(long, env = "PDFSHELF_IMAGE_ROOT")]
    image_root: Option<PathBuf>,

    /// Root directory for symlinks.
    #[arg(long, env = "PDFSHELF_LINK_ROOT")]
    link_root: Option<PathBuf>,

    /// Subdirectory created under both roots (also the markdown link prefix).
    #[arg(long, env = "PDFSHELF_SUBDIR")]
    subdir: Option<String>,

    /// Markdown shape: 4-column table or flat list.
    #[arg(long, env = "PDFSHELF_LAYOUT", value_enum)]
    layout: Option<LayoutArg>,

    /// Show each document's title (unsanitised stem) in the markdown.
    #[arg(long)]
    titles: bool,

    /// Rasterisation DPI for page 1 (72–600).
    #[arg(long, env = "PDFSHELF_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Render covers only: no links, no markdown.
    #[arg(long, conflicts_with_all = ["links_only", "preview"])]
    covers_only: bool,

    /// Create links only: no covers, no markdown. Needs no pdfium library.
    #[arg(long, conflicts_with = "preview")]
    links_only: bool,

    /// Print the markdown fragment without touching the filesystem.
    #[arg(long)]
    preview: bool,

    /// Write the markdown fragment to this file instead of stdout.
    #[arg(short, long, env = "PDFSHELF_OUTPUT")]
    output: Option<PathBuf>,

    /// Output the structured batch result as JSON instead of markdown.
    #[arg(long, conflicts_with = "preview")]
    json: bool,

    /// Settings file: loaded as defaults, written back with --save-settings.
    #[arg(long, env = "PDFSHELF_SETTINGS", default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Persist the effective roots/subdir/layout to the settings file.
    #[arg(long)]
    save_settings: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDFSHELF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors and the markdown itself.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    Table,
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar already narrates per-document results, so INFO-level
    // library logs are suppressed while it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.preview;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Settings: file defaults overlaid by CLI flags ────────────────────
    let mut settings = Settings::load(&cli.settings);
    if let Some(ref root) = cli.image_root {
        settings.image_output_dir = root.clone();
    }
    if let Some(ref root) = cli.link_root {
        settings.link_output_dir = root.clone();
    }
    if let Some(ref subdir) = cli.subdir {
        settings.subdir_name = subdir.clone();
    }
    if let Some(layout) = cli.layout {
        settings.use_table = matches!(layout, LayoutArg::Table);
    }
    if cli.titles {
        settings.show_title = true;
    }

    if cli.save_settings {
        settings
            .save(&cli.settings)
            .context("Failed to save settings")?;
    }

    // ── Preview mode: layout only, nothing materialised ──────────────────
    if cli.preview {
        let documents = resolve_inputs(&cli.inputs).context("Failed to resolve inputs")?;
        let markdown = render_markdown(
            &documents,
            &settings.subdir_name,
            settings.use_table,
            settings.show_title,
        );
        match markdown {
            Some(markdown) => emit_markdown(&markdown)?,
            None => eprintln!("{} no PDF files selected", cyan("⚠")),
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgress::new_dynamic() as ProgressCallback)
    } else {
        None
    };

    let mut builder = BatchConfig::builder()
        .image_root(&settings.image_output_dir)
        .link_root(&settings.link_output_dir)
        .subdir(&settings.subdir_name)
        .use_table(settings.use_table)
        .show_title(settings.show_title)
        .dpi(cli.dpi);
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run the batch ────────────────────────────────────────────────────
    let output = if cli.covers_only {
        render_covers(&cli.inputs, &config)
    } else if cli.links_only {
        create_links(&cli.inputs, &config)
    } else {
        process(&cli.inputs, &config)
    }
    .context("Batch failed")?;

    // ── Emit results ─────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if let Some(ref markdown) = output.markdown {
        if let Some(ref path) = cli.output {
            write_markdown_file(path, markdown).context("Failed to write markdown file")?;
            if !cli.quiet {
                eprintln!("{} markdown  →  {}", green("✔"), bold(&path.display().to_string()));
            }
        } else {
            emit_markdown(markdown)?;
        }
    }

    if !cli.quiet {
        print_summary(&output);
    }

    // Any per-document failure flips the exit code; the artefacts that did
    // succeed are already on disk.
    if output.stats.failed_documents > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Markdown goes to stdout; everything else on this tool talks to stderr.
fn emit_markdown(markdown: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(markdown.as_bytes())
        .context("Failed to write to stdout")?;
    if !markdown.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

fn print_summary(output: &BatchOutput) {
    let s = &output.stats;
    let tick = if s.failed_documents == 0 {
        green("✔")
    } else if s.failed_documents == s.total_documents {
        red("✘")
    } else {
        cyan("⚠")
    };
    eprintln!(
        "{tick}  {}/{} PDFs  {}ms",
        bold(&(s.total_documents - s.failed_documents).to_string()),
        s.total_documents,
        s.duration_ms,
    );
    eprintln!(
        "   {} rendered  /  {} reused  /  {} linked{}",
        dim(&s.rendered_covers.to_string()),
        dim(&s.reused_covers.to_string()),
        dim(&s.created_links.to_string()),
        if s.failed_documents > 0 {
            format!("  /  {} failed", red(&s.failed_documents.to_string()))
        } else {
            String::new()
        },
    );
}
