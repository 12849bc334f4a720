//! Markdown layout: turn a document list into a pasteable fragment.
//!
//! Two shapes are supported. **Table mode** is a fixed 4-column pipe table:
//! the document list is padded with empty slots up to a multiple of 4, a
//! two-line header is emitted once, and each group of 4 slots becomes one
//! image row (plus one title row when titles are on). Padding keeps every
//! row the same width so markdown renderers align the grid. **List mode**
//! is one line per document, no padding.
//!
//! References are *vault-relative* — `subdir/<file>` — which is exactly why
//! the fragment can be pasted into a page that resolves links against the
//! subdirectory. Both references per cell are derived through
//! [`crate::sanitize`], so they name precisely the files the renderer and
//! linker produce. Titles, by contrast, show the document's unsanitised
//! stem: the underscores are for link targets, not for humans.
//!
//! Generation is pure string assembly and cannot fail; the one "nothing to
//! do" case (an empty document list) returns `None` so callers can tell it
//! apart from any non-empty result.

use crate::sanitize::{basename, cover_file_name, link_file_name, stem};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Number of columns in table mode.
pub const TABLE_COLUMNS: usize = 4;

/// Lay out `documents` as a markdown fragment.
///
/// Documents are sorted by basename, case-insensitively and stably (equal
/// keys keep their input order). Returns `None` — with a logged warning —
/// when there is nothing to lay out.
pub fn render_markdown(
    documents: &[PathBuf],
    subdir: &str,
    use_table: bool,
    show_title: bool,
) -> Option<String> {
    if documents.is_empty() {
        warn!("no documents to lay out");
        return None;
    }

    let mut sorted: Vec<&PathBuf> = documents.iter().collect();
    sorted.sort_by_key(|p| basename(p).to_lowercase());

    let lines = if use_table {
        table_lines(&sorted, subdir, show_title)
    } else {
        list_lines(&sorted, subdir, show_title)
    };

    Some(lines.join("\n"))
}

/// The clickable-cover cell: the cover image as the link text.
fn cell(document: &Path, subdir: &str) -> String {
    format!(
        "[![]({})]({})",
        reference(subdir, &cover_file_name(document)),
        reference(subdir, &link_file_name(document)),
    )
}

fn reference(subdir: &str, file: &str) -> String {
    if subdir.is_empty() {
        file.to_string()
    } else {
        format!("{subdir}/{file}")
    }
}

fn table_lines(sorted: &[&PathBuf], subdir: &str, show_title: bool) -> Vec<String> {
    // Pad with empty slots so every row has exactly TABLE_COLUMNS cells.
    let mut slots: Vec<Option<&PathBuf>> = sorted.iter().map(|p| Some(*p)).collect();
    while slots.len() % TABLE_COLUMNS != 0 {
        slots.push(None);
    }

    let mut lines = Vec::with_capacity(2 + slots.len() / TABLE_COLUMNS * 2);
    lines.push("| | | | |".to_string());
    lines.push("|---|---|---|---|".to_string());

    for group in slots.chunks(TABLE_COLUMNS) {
        lines.push(table_row(group, |doc| cell(doc, subdir)));
        if show_title {
            lines.push(table_row(group, |doc| stem(doc)));
        }
    }

    lines
}

/// One pipe-delimited row; an empty slot renders as an empty cell.
fn table_row(group: &[Option<&PathBuf>], content: impl Fn(&Path) -> String) -> String {
    let mut row = String::from("|");
    for slot in group {
        match slot {
            Some(doc) => {
                row.push(' ');
                row.push_str(&content(doc));
                row.push_str(" |");
            }
            None => row.push_str(" |"),
        }
    }
    row
}

fn list_lines(sorted: &[&PathBuf], subdir: &str, show_title: bool) -> Vec<String> {
    sorted
        .iter()
        .map(|doc| {
            let mut line = cell(doc, subdir);
            if show_title {
                line.push(' ');
                line.push_str(&stem(doc));
            }
            line
        })
        .collect()
}
