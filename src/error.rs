//! Error types for the pdfshelf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ShelfError`] — **Batch-level**: the run cannot proceed at all or a
//!   final artefact cannot be produced (invalid configuration, unreadable
//!   input directory, markdown/settings file write failure). Returned as
//!   `Err(ShelfError)` from the top-level `process*` functions.
//!
//! * [`ItemError`] — **Per-document**: one PDF failed (missing source,
//!   rasteriser could not open it, its link target is occupied by a real
//!   file) but the rest of the batch is fine. Stored inside
//!   [`crate::output::ItemResult`] so callers can inspect partial success
//!   rather than losing the whole batch to one bad file.
//!
//! The separation encodes the propagation policy directly in the types: a
//! per-document failure is logged, recorded, and the batch continues; only
//! batch-level failures abort.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Batch-level errors returned by the top-level entry points.
///
/// Per-document failures use [`ItemError`] and are stored in
/// [`crate::output::ItemResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ShelfError {
    /// An input directory could not be scanned for PDFs.
    #[error("cannot read input directory '{path}': {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not write the markdown fragment to a file.
    #[error("failed to write markdown to '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not persist the settings file.
    #[error("failed to write settings to '{path}': {source}")]
    SettingsWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A non-fatal error for a single document.
///
/// Every variant carries its detail as a plain string so the type stays
/// `Clone + Serialize` and can be embedded in a serialisable
/// [`crate::output::ItemResult`].
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum ItemError {
    /// The source PDF does not exist (moved or deleted since selection).
    #[error("source document not found: '{path}'")]
    SourceMissing { path: PathBuf },

    /// An output subdirectory could not be created. Every later document
    /// against the same root will report this again until it is fixed.
    #[error("could not create output directory '{dir}': {detail}")]
    DirCreateFailed { dir: PathBuf, detail: String },

    /// No pdfium library could be bound. Set PDFIUM_LIB_PATH or install
    /// pdfium on the system library search path.
    #[error("could not bind a pdfium library: {detail}")]
    RasterizerUnavailable { detail: String },

    /// pdfium could not open or render page 1 of the document.
    #[error("failed to render cover for '{path}': {detail}")]
    RenderFailed { path: PathBuf, detail: String },

    /// The cover image could not be encoded or written.
    #[error("failed to write cover image '{path}': {detail}")]
    CoverWriteFailed { path: PathBuf, detail: String },

    /// The link target is occupied by a regular file or directory.
    /// Real content is never deleted or overwritten.
    #[error("link target '{target}' exists and is not a symlink")]
    LinkCollision { target: PathBuf },

    /// Symlink creation failed (permissions, unsupported filesystem, …).
    #[error("failed to create link '{target}': {detail}")]
    LinkFailed { target: PathBuf, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_display_names_target() {
        let e = ItemError::LinkCollision {
            target: PathBuf::from("/vault/pdfs/book_covers/report.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("report.pdf"), "got: {msg}");
        assert!(msg.contains("not a symlink"), "got: {msg}");
    }

    #[test]
    fn source_missing_display() {
        let e = ItemError::SourceMissing {
            path: PathBuf::from("/books/gone.pdf"),
        };
        assert!(e.to_string().contains("gone.pdf"));
    }

    #[test]
    fn item_error_round_trips_through_json() {
        let e = ItemError::RenderFailed {
            path: PathBuf::from("/books/bad.pdf"),
            detail: "corrupt xref".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: ItemError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), e.to_string());
    }

    #[test]
    fn invalid_config_display() {
        let e = ShelfError::InvalidConfig("subdir must not contain separators".into());
        assert!(e.to_string().contains("invalid configuration"));
    }
}
