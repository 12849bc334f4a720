//! # pdfshelf
//!
//! Batch-process PDF files into visual "cards" for a markdown vault
//! (Obsidian or anything that resolves relative links).
//!
//! ## Why this crate?
//!
//! Dropping a PDF into a vault gives you a grey file icon. What you want on a
//! bookshelf page is the *cover*: a thumbnail you can click to open the
//! document. Doing that by hand means rendering page 1, fixing up filenames
//! that markdown links choke on (spaces, ideographic spaces), symlinking the
//! PDF somewhere the vault can reach, and writing the table markup — for
//! every single file. This crate does the whole batch in one pass and keeps
//! the three artefacts (image, link, markdown) in agreement by construction:
//! all derived filenames come from one sanitisation rule applied to the same
//! source path.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDFs
//!  │
//!  ├─ 1. Input    explicit file list, or non-recursive *.pdf directory scan
//!  ├─ 2. Render   rasterise page 1 via pdfium, downscale, write PNG cover
//!  ├─ 3. Link     symlink the original PDF under the link root
//!  └─ 4. Layout   markdown fragment (4-column table or flat list)
//! ```
//!
//! Steps 2 and 3 are idempotent: an existing cover is never re-rendered, an
//! existing symlink is replaced, and a real file at a link target is never
//! touched. Re-running a batch converges instead of churning.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfshelf::{process, BatchConfig};
//! use std::path::PathBuf;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder()
//!         .image_root("/vault/images")
//!         .link_root("/vault/pdfs")
//!         .subdir("book_covers")
//!         .build()?;
//!
//!     let inputs = vec![PathBuf::from("/books")]; // a directory, or PDF paths
//!     let output = process(&inputs, &config)?;
//!
//!     if let Some(markdown) = output.markdown {
//!         println!("{markdown}");
//!     }
//!     eprintln!(
//!         "{} covers rendered, {} links created",
//!         output.stats.rendered_covers, output.stats.created_links
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfshelf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdfshelf = { version = "0.3", default-features = false }
//! ```
//!
//! ## The pdfium library
//!
//! Rasterisation is delegated to pdfium via the `pdfium-render` crate. The
//! shared library is located at render time: `PDFIUM_LIB_PATH` (a directory
//! containing the platform library, or the library file itself) is tried
//! first, then the system library search path. Everything except cover
//! rendering — links, layout, preview — works without pdfium installed.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod sanitize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{create_links, process, render_covers, write_markdown_file};
pub use config::{BatchConfig, BatchConfigBuilder, Settings};
pub use error::{ItemError, ShelfError};
pub use output::{BatchOutput, BatchStats, ItemResult};
pub use pipeline::layout::render_markdown;
pub use pipeline::link::LinkManager;
pub use pipeline::render::{CoverRenderer, RenderedCover};
pub use progress::{BatchProgress, NoopProgress, ProgressCallback};
pub use sanitize::sanitize;
