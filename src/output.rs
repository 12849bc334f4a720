//! Result types returned by a batch run.

use crate::error::ItemError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one source document within a batch.
///
/// A document can partially succeed — e.g. the cover renders but the link
/// target is occupied — so failures accumulate in `errors` instead of
/// short-circuiting. Every error was already logged when it occurred; this
/// is the record the caller can inspect afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    /// The source PDF as supplied by the caller.
    pub source: PathBuf,
    /// Path of the cover image, when rendering was attempted and succeeded
    /// (freshly rendered or reused).
    pub cover: Option<PathBuf>,
    /// Path of the created symlink, when linking was attempted and succeeded.
    pub link: Option<PathBuf>,
    /// Failures for this document, in the order they occurred.
    pub errors: Vec<ItemError>,
}

impl ItemResult {
    /// True when every attempted step succeeded for this document.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Counters for a completed batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// Documents supplied to the batch (after directory expansion).
    pub total_documents: usize,
    /// Covers rendered in this run.
    pub rendered_covers: usize,
    /// Covers that already existed and were skipped.
    pub reused_covers: usize,
    /// Symlinks created (including replacements of stale links).
    pub created_links: usize,
    /// Documents with at least one recorded error.
    pub failed_documents: usize,
    /// Wall-clock duration of the batch.
    pub duration_ms: u64,
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    /// The markdown fragment, present only when layout ran and had
    /// documents to lay out. `None` is "nothing was generated" — distinct
    /// from a generated-but-empty string, which cannot occur.
    pub markdown: Option<String>,
    /// Per-document outcomes, in processing order.
    pub items: Vec<ItemResult>,
    /// Symlinks created during this run, in creation order.
    pub created_links: Vec<PathBuf>,
    /// Batch counters.
    pub stats: BatchStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_result_ok_tracks_errors() {
        let mut item = ItemResult {
            source: PathBuf::from("/books/a.pdf"),
            cover: Some(PathBuf::from("/vault/images/book_covers/a.png")),
            link: None,
            errors: Vec::new(),
        };
        assert!(item.is_ok());

        item.errors.push(ItemError::LinkCollision {
            target: PathBuf::from("/vault/pdfs/book_covers/a.pdf"),
        });
        assert!(!item.is_ok());
    }

    #[test]
    fn batch_output_serialises() {
        let output = BatchOutput {
            markdown: Some("| | | | |".into()),
            items: Vec::new(),
            created_links: vec![PathBuf::from("/vault/pdfs/book_covers/a.pdf")],
            stats: BatchStats {
                total_documents: 1,
                created_links: 1,
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("book_covers"));
        let back: BatchOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stats.total_documents, 1);
        assert_eq!(back.markdown.as_deref(), Some("| | | | |"));
    }
}
