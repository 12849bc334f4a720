//! Pipeline stages for turning PDFs into vault cards.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. a different rasterisation backend) without
//! touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ link ──▶ layout
//! (paths)   (pdfium)  (symlink) (markdown)
//! ```
//!
//! 1. [`input`]  — expand the user-supplied files/directories into a PDF list
//! 2. [`render`] — rasterise page 1 and write the PNG cover (idempotent)
//! 3. [`link`]   — symlink the original PDF under the link root (re-runnable)
//! 4. [`layout`] — assemble the markdown fragment referencing 2 and 3
//!
//! Stages 2–4 never share state; they agree on filenames because each
//! derives them through [`crate::sanitize`] from the same source path.

pub mod input;
pub mod layout;
pub mod link;
pub mod render;

use crate::error::ItemError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Ensure `root/subdir` exists, creating it (and any missing parents)
/// on first use. Creation is reported once; an existing directory is
/// silent.
pub(crate) fn ensure_subdir(root: &Path, subdir: &str) -> Result<PathBuf, ItemError> {
    let dir = root.join(subdir);
    // is_dir, not exists: a regular file squatting on the path must fail
    // here (create_dir_all reports it), not later at write time.
    if !dir.is_dir() {
        fs::create_dir_all(&dir).map_err(|e| ItemError::DirCreateFailed {
            dir: dir.clone(),
            detail: e.to_string(),
        })?;
        info!("created output directory {}", dir.display());
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_subdir_creates_and_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let dir = ensure_subdir(root.path(), "book_covers").unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir, root.path().join("book_covers"));

        // second call finds it in place
        let again = ensure_subdir(root.path(), "book_covers").unwrap();
        assert_eq!(again, dir);
    }

    #[test]
    fn ensure_subdir_reports_creation_failure() {
        let root = tempfile::tempdir().unwrap();
        // a regular file where the subdirectory should go
        let occupied = root.path().join("covers");
        fs::write(&occupied, b"file, not dir").unwrap();

        let err = ensure_subdir(root.path(), "covers").unwrap_err();
        assert!(matches!(err, ItemError::DirCreateFailed { .. }));
    }
}
