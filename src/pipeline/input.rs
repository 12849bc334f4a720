//! Input selection: expand user-supplied paths into a list of PDFs.
//!
//! Two shapes of input are accepted, mirroring how people actually point a
//! batch tool at their files: an explicit list of PDF paths, or a directory
//! that is scanned — non-recursively — for entries ending in `.pdf`
//! (ASCII-case-insensitive, so `.PDF` scans too).
//!
//! A path that names a missing file is *not* rejected here: per-document
//! problems are the batch runner's job to report, one item at a time, so a
//! single bad path cannot veto the rest of the selection.

use crate::error::ShelfError;
use crate::sanitize::basename;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Scan `dir` (non-recursively) for PDF files, sorted by file name so the
/// selection is deterministic across platforms and filesystems.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>, ShelfError> {
    let entries = fs::read_dir(dir).map_err(|e| ShelfError::InputDirUnreadable {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ShelfError::InputDirUnreadable {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
        if name.ends_with(".pdf") {
            found.push(path);
        }
    }

    found.sort_by_key(|p| basename(p));
    debug!("scanned {}: {} PDF files", dir.display(), found.len());
    if found.is_empty() {
        warn!("no PDF files found in {}", dir.display());
    }
    Ok(found)
}

/// Expand a mixed list of files and directories into a flat document list.
///
/// Directories are expanded via [`scan_directory`]; file paths pass through
/// untouched (existence is checked per document during the batch).
pub fn resolve_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, ShelfError> {
    let mut documents = Vec::new();
    for input in inputs {
        if input.is_dir() {
            documents.extend(scan_directory(input)?);
        } else {
            documents.push(input.clone());
        }
    }
    Ok(documents)
}
