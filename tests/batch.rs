//! Integration tests for the batch entry points.
//!
//! Cover rendering needs a pdfium shared library, which CI machines don't
//! have, so these tests exercise the batch through `create_links` and the
//! layout/markdown path — everything except the rasteriser itself. Render
//! internals are unit-tested in `src/pipeline/render.rs` up to the pdfium
//! boundary.

#![cfg(unix)]

use pdfshelf::{create_links, process, render_markdown, write_markdown_file, BatchConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

struct Vault {
    books: TempDir,
    image_root: TempDir,
    link_root: TempDir,
}

impl Vault {
    fn new() -> Self {
        Self {
            books: TempDir::new().unwrap(),
            image_root: TempDir::new().unwrap(),
            link_root: TempDir::new().unwrap(),
        }
    }

    fn add_pdf(&self, name: &str) -> PathBuf {
        let path = self.books.path().join(name);
        fs::write(&path, b"%PDF-1.4\n%stub\n").unwrap();
        path
    }

    fn config(&self) -> BatchConfig {
        BatchConfig::builder()
            .image_root(self.image_root.path())
            .link_root(self.link_root.path())
            .subdir("covers")
            .build()
            .unwrap()
    }
}

fn assert_is_symlink(path: &Path) {
    let meta = fs::symlink_metadata(path).unwrap();
    assert!(meta.file_type().is_symlink(), "not a symlink: {}", path.display());
}

// ── Link batches ─────────────────────────────────────────────────────────────

#[test]
fn links_only_batch_creates_sanitised_symlinks() {
    let vault = Vault::new();
    let a = vault.add_pdf("My Report.pdf");
    let b = vault.add_pdf("notes.pdf");

    let output = create_links(&[a.clone(), b.clone()], &vault.config()).unwrap();

    assert_eq!(output.stats.total_documents, 2);
    assert_eq!(output.stats.created_links, 2);
    assert_eq!(output.stats.failed_documents, 0);
    assert!(output.markdown.is_none(), "links-only must not lay out markdown");

    let link = vault.link_root.path().join("covers/My_Report.pdf");
    assert_is_symlink(&link);
    assert_eq!(fs::read_link(&link).unwrap(), a);
    assert_eq!(
        output.created_links,
        vec![link, vault.link_root.path().join("covers/notes.pdf")]
    );
}

#[test]
fn directory_input_is_scanned_for_pdfs() {
    let vault = Vault::new();
    vault.add_pdf("b.pdf");
    vault.add_pdf("A.PDF");
    fs::write(vault.books.path().join("ignore.txt"), b"x").unwrap();

    let output = create_links(&[vault.books.path().to_path_buf()], &vault.config()).unwrap();
    assert_eq!(output.stats.total_documents, 2);
    assert_eq!(output.stats.created_links, 2);
}

#[test]
fn rerun_converges_instead_of_erroring() {
    let vault = Vault::new();
    let a = vault.add_pdf("a.pdf");
    let config = vault.config();

    let first = create_links(&[a.clone()], &config).unwrap();
    let second = create_links(&[a.clone()], &config).unwrap();

    assert_eq!(first.created_links, second.created_links);
    assert_eq!(second.stats.failed_documents, 0);
    assert_is_symlink(&second.created_links[0]);
}

#[test]
fn collision_is_reported_but_batch_continues() {
    let vault = Vault::new();
    let a = vault.add_pdf("a.pdf");
    let b = vault.add_pdf("b.pdf");

    // occupy a's link target with a real file
    let occupied = vault.link_root.path().join("covers/a.pdf");
    fs::create_dir_all(occupied.parent().unwrap()).unwrap();
    fs::write(&occupied, b"real content").unwrap();

    let output = create_links(&[a, b], &vault.config()).unwrap();

    assert_eq!(output.stats.failed_documents, 1);
    assert_eq!(output.stats.created_links, 1);
    assert!(!output.items[0].is_ok());
    assert!(output.items[1].is_ok());
    // the occupant survived
    assert_eq!(fs::read(&occupied).unwrap(), b"real content");
}

#[test]
fn missing_source_is_isolated() {
    let vault = Vault::new();
    let good = vault.add_pdf("good.pdf");
    let gone = vault.books.path().join("gone.pdf");

    let output = create_links(&[gone, good], &vault.config()).unwrap();

    assert_eq!(output.stats.total_documents, 2);
    assert_eq!(output.stats.failed_documents, 1);
    assert_eq!(output.stats.created_links, 1);
    assert!(output.items[1].is_ok());
}

#[test]
fn empty_input_is_a_clean_no_op() {
    let vault = Vault::new();
    let output = process(&[], &vault.config()).unwrap();

    assert_eq!(output.stats.total_documents, 0);
    assert!(output.markdown.is_none());
    assert!(output.items.is_empty());
    assert!(output.created_links.is_empty());
}

// ── Markdown ─────────────────────────────────────────────────────────────────

#[test]
fn layout_matches_link_targets_on_disk() {
    let vault = Vault::new();
    let a = vault.add_pdf("報告 書.pdf");
    let b = vault.add_pdf("notes.pdf");
    let docs = vec![a, b];

    let output = create_links(&docs, &vault.config()).unwrap();
    let markdown = render_markdown(&docs, "covers", true, false).unwrap();

    assert_eq!(
        markdown,
        "| | | | |\n\
         |---|---|---|---|\n\
         | [![](covers/notes.png)](covers/notes.pdf) | [![](covers/報告_書.png)](covers/報告_書.pdf) | | |"
    );

    // every link reference in the markdown names a link that exists
    for created in &output.created_links {
        let name = created.file_name().unwrap().to_string_lossy();
        assert!(markdown.contains(&format!("covers/{name}")), "missing {name}");
        assert_is_symlink(created);
    }
}

#[test]
fn markdown_file_write_is_atomic_and_creates_parents() {
    let out = TempDir::new().unwrap();
    let target = out.path().join("nested/dir/shelf.md");

    write_markdown_file(&target, "| | | | |\n|---|---|---|---|").unwrap();

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "| | | | |\n|---|---|---|---|"
    );
    // no temp file left behind
    assert!(!target.with_extension("md.tmp").exists());
}
