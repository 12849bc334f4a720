//! Link creation: symlink each source PDF under the link root.
//!
//! The link's file name is the sanitised basename, so the markdown layout
//! can predict it without asking. Creation is re-runnable by design:
//! a symlink already at the target — including a dangling one left behind
//! after the source moved — is replaced, while a *real* file or directory
//! at the target is a name collision and is never touched.
//!
//! The manager records every link it creates, in order, for the run it
//! belongs to. Construct one per batch (or call [`LinkManager::clear`]
//! between runs) so the record never mixes runs.

use crate::error::ItemError;
use crate::pipeline::ensure_subdir;
use crate::sanitize::link_file_name;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Deterministic link path for a source document:
/// `link_root/subdir/<sanitised basename>`.
pub fn link_target(link_root: &Path, subdir: &str, source: &Path) -> PathBuf {
    link_root.join(subdir).join(link_file_name(source))
}

/// Creates symlinks and keeps the run-scoped record of what it created.
#[derive(Debug, Default)]
pub struct LinkManager {
    created: Vec<PathBuf>,
}

impl LinkManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) the symlink for `source`.
    ///
    /// The link points at the absolutised source path so it keeps working
    /// from any working directory. On success the target path is recorded
    /// and returned.
    pub fn create_link(
        &mut self,
        source: &Path,
        link_root: &Path,
        subdir: &str,
    ) -> Result<PathBuf, ItemError> {
        let dir = ensure_subdir(link_root, subdir)?;
        let target = dir.join(link_file_name(source));

        // symlink_metadata does not follow the link, so a dangling stale
        // link is still seen (plain `exists()` would miss it).
        match fs::symlink_metadata(&target) {
            Ok(meta) if meta.file_type().is_symlink() => {
                fs::remove_file(&target).map_err(|e| ItemError::LinkFailed {
                    target: target.clone(),
                    detail: format!("could not remove stale link: {e}"),
                })?;
                info!("removed stale link: {}", target.display());
            }
            Ok(_) => {
                warn!(
                    "name collision, refusing to overwrite: {}",
                    target.display()
                );
                return Err(ItemError::LinkCollision { target });
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ItemError::LinkFailed {
                    target,
                    detail: e.to_string(),
                })
            }
        }

        let absolute_source =
            std::path::absolute(source).map_err(|e| ItemError::LinkFailed {
                target: target.clone(),
                detail: format!("could not absolutise source path: {e}"),
            })?;

        symlink_file(&absolute_source, &target).map_err(|e| ItemError::LinkFailed {
            target: target.clone(),
            detail: e.to_string(),
        })?;

        info!(
            "created link: {} -> {}",
            target.display(),
            absolute_source.display()
        );
        self.created.push(target.clone());
        Ok(target)
    }

    /// Links created by this manager, in creation order.
    pub fn created(&self) -> &[PathBuf] {
        &self.created
    }

    /// Consume the manager, yielding its record.
    pub fn into_created(self) -> Vec<PathBuf> {
        self.created
    }

    /// Empty the record. Call between runs when reusing one manager.
    pub fn clear(&mut self) {
        self.created.clear();
    }
}

#[cfg(unix)]
fn symlink_file(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink_file(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}
