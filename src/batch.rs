//! Batch entry points.
//!
//! ## Why three entry points?
//!
//! [`process`] is the everything pass: covers, links, markdown. The two
//! partial passes — [`render_covers`] and [`create_links`] — exist because
//! the artefacts have different lifecycles: covers are expensive and
//! immutable, links are cheap and go stale when sources move. Being able to
//! refresh the links of an existing shelf without re-touching (or needing
//! pdfium for) the covers is a routine operation, not an edge case.
//!
//! ## Failure policy
//!
//! Every per-document failure is logged, recorded in that document's
//! [`ItemResult`], and the batch moves on — one unreadable PDF must not
//! sink the other two hundred. The batch itself only fails before any
//! document is touched (unreadable input directory) — see
//! [`crate::error::ShelfError`].

use crate::config::BatchConfig;
use crate::error::{ItemError, ShelfError};
use crate::output::{BatchOutput, BatchStats, ItemResult};
use crate::pipeline::{input, layout, link::LinkManager, render::CoverRenderer};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Full,
    CoversOnly,
    LinksOnly,
}

/// Run the full batch: render covers, create links, produce markdown.
///
/// `inputs` may mix PDF paths and directories (scanned non-recursively
/// for `*.pdf`, case-insensitive).
pub fn process(inputs: &[PathBuf], config: &BatchConfig) -> Result<BatchOutput, ShelfError> {
    run(inputs, config, Mode::Full)
}

/// Render covers only; no links are created and no markdown is produced.
pub fn render_covers(inputs: &[PathBuf], config: &BatchConfig) -> Result<BatchOutput, ShelfError> {
    run(inputs, config, Mode::CoversOnly)
}

/// Create links only; no covers are rendered and no markdown is produced.
/// Works without a pdfium library installed.
pub fn create_links(inputs: &[PathBuf], config: &BatchConfig) -> Result<BatchOutput, ShelfError> {
    run(inputs, config, Mode::LinksOnly)
}

fn run(inputs: &[PathBuf], config: &BatchConfig, mode: Mode) -> Result<BatchOutput, ShelfError> {
    let started = Instant::now();

    // ── Step 1: Expand inputs ────────────────────────────────────────────
    let documents = input::resolve_inputs(inputs)?;
    if documents.is_empty() {
        warn!("nothing to process");
        return Ok(BatchOutput {
            markdown: None,
            items: Vec::new(),
            created_links: Vec::new(),
            stats: BatchStats {
                duration_ms: started.elapsed().as_millis() as u64,
                ..BatchStats::default()
            },
        });
    }

    let total = documents.len();
    info!("starting batch: {} documents", total);
    if let Some(cb) = &config.progress_callback {
        cb.on_batch_start(total);
    }

    // ── Step 2: Per-document render + link, sequential ───────────────────
    let renderer = CoverRenderer::new(config);
    let mut links = LinkManager::new(); // fresh record per batch
    let mut items = Vec::with_capacity(total);
    let mut stats = BatchStats {
        total_documents: total,
        ..BatchStats::default()
    };

    for (index, source) in documents.iter().enumerate() {
        if let Some(cb) = &config.progress_callback {
            cb.on_document_start(index, total, source);
        }

        let item = process_document(source, config, mode, &renderer, &mut links, &mut stats);

        if let Some(cb) = &config.progress_callback {
            cb.on_document_complete(index, total, &item);
        }
        items.push(item);
    }

    stats.failed_documents = items.iter().filter(|i| !i.is_ok()).count();

    // ── Step 3: Markdown layout (full runs only) ─────────────────────────
    let markdown = if mode == Mode::Full {
        layout::render_markdown(&documents, &config.subdir, config.use_table, config.show_title)
    } else {
        None
    };

    stats.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        "batch complete: {}/{} documents ok in {}ms",
        total - stats.failed_documents,
        total,
        stats.duration_ms
    );
    if let Some(cb) = &config.progress_callback {
        cb.on_batch_complete(&stats);
    }

    Ok(BatchOutput {
        markdown,
        items,
        created_links: links.into_created(),
        stats,
    })
}

/// Render and/or link one document. A cover failure does not prevent the
/// link attempt; both failures end up in the item's record.
fn process_document(
    source: &Path,
    config: &BatchConfig,
    mode: Mode,
    renderer: &CoverRenderer,
    links: &mut LinkManager,
    stats: &mut BatchStats,
) -> ItemResult {
    let mut item = ItemResult {
        source: source.to_path_buf(),
        cover: None,
        link: None,
        errors: Vec::new(),
    };

    if !source.exists() {
        let err = ItemError::SourceMissing {
            path: source.to_path_buf(),
        };
        warn!("{err}");
        item.errors.push(err);
        return item;
    }

    if mode != Mode::LinksOnly {
        match renderer.render_cover(source, &config.image_root, &config.subdir) {
            Ok(cover) => {
                if cover.freshly_rendered {
                    stats.rendered_covers += 1;
                } else {
                    stats.reused_covers += 1;
                }
                item.cover = Some(cover.path);
            }
            Err(err) => {
                warn!("{err}");
                item.errors.push(err);
            }
        }
    }

    if mode != Mode::CoversOnly {
        match links.create_link(source, &config.link_root, &config.subdir) {
            Ok(target) => {
                stats.created_links += 1;
                item.link = Some(target);
            }
            Err(err) => {
                warn!("{err}");
                item.errors.push(err);
            }
        }
    }

    item
}

/// Write a markdown fragment to `path` atomically (temp file + rename), so
/// a crash mid-write can never leave a truncated file behind.
pub fn write_markdown_file(path: &Path, markdown: &str) -> Result<(), ShelfError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ShelfError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let tmp_path = path.with_extension("md.tmp");
    fs::write(&tmp_path, markdown).map_err(|e| ShelfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::rename(&tmp_path, path).map_err(|e| ShelfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("markdown written to {}", path.display());
    Ok(())
}
