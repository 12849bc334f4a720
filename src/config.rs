//! Configuration types for batch processing.
//!
//! Two layers, deliberately separate:
//!
//! * [`BatchConfig`] — the runtime knobs the core consumes, built via its
//!   [`BatchConfigBuilder`]. The core has no opinion on where the values
//!   come from; it only requires them as call parameters.
//! * [`Settings`] — the small persisted subset (output roots, subdirectory,
//!   layout flags) stored as JSON between invocations. Loading never fails:
//!   any unreadable or invalid file falls back to the complete default
//!   configuration, and a partial file is filled field-by-field from the
//!   defaults — there is no such thing as a half-configured run.
//!
//! # Design choice: builder over constructor
//! A nine-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.

use crate::error::ShelfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default file name for persisted [`Settings`], resolved against the
/// current directory unless the caller says otherwise.
pub const DEFAULT_SETTINGS_FILE: &str = "pdfshelf_settings.json";

/// Configuration for one batch run.
///
/// Built via [`BatchConfig::builder()`] or [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfshelf::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .image_root("/vault/images")
///     .link_root("/vault/pdfs")
///     .subdir("book_covers")
///     .show_title(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Root directory for cover images. Covers land in
    /// `image_root/subdir/<sanitised stem>.png`. Default: `/obsidian/images/`.
    pub image_root: PathBuf,

    /// Root directory for symlinks. Links land in
    /// `link_root/subdir/<sanitised basename>`. Default: `/obsidian/pdfs/`.
    pub link_root: PathBuf,

    /// Single subdirectory name created under *both* roots, keeping the
    /// generated images and links of a batch co-located. It is also the
    /// directory prefix of every markdown reference, which is what makes
    /// the fragment pasteable into a vault page. Default: `book_covers`.
    pub subdir: String,

    /// Lay the markdown out as a 4-column table (`true`, default) or a
    /// flat list (`false`).
    pub use_table: bool,

    /// Append each document's (unsanitised) stem as a visible title.
    /// Default: `false`.
    pub show_title: bool,

    /// Rasterisation DPI for page 1. Range: 72–600. Default: 300.
    ///
    /// 300 DPI keeps small cover type legible after the downscale; the
    /// intermediate bitmap is discarded, so the cost is CPU, not disk.
    pub dpi: u32,

    /// Bounding box the rendered cover is downscaled into, aspect ratio
    /// preserved, never upscaled. Default: 600 × 800 — portrait book
    /// covers at a size that still reads in a 4-column vault table.
    pub max_cover_width: u32,
    /// See [`BatchConfig::max_cover_width`].
    pub max_cover_height: u32,

    /// Optional per-document progress events. See [`crate::progress`].
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            image_root: PathBuf::from("/obsidian/images/"),
            link_root: PathBuf::from("/obsidian/pdfs/"),
            subdir: "book_covers".to_string(),
            use_table: true,
            show_title: false,
            dpi: 300,
            max_cover_width: 600,
            max_cover_height: 800,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("image_root", &self.image_root)
            .field("link_root", &self.link_root)
            .field("subdir", &self.subdir)
            .field("use_table", &self.use_table)
            .field("show_title", &self.show_title)
            .field("dpi", &self.dpi)
            .field("max_cover_width", &self.max_cover_width)
            .field("max_cover_height", &self.max_cover_height)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgress>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn image_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.image_root = root.into();
        self
    }

    pub fn link_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.link_root = root.into();
        self
    }

    pub fn subdir(mut self, name: impl Into<String>) -> Self {
        self.config.subdir = name.into();
        self
    }

    pub fn use_table(mut self, v: bool) -> Self {
        self.config.use_table = v;
        self
    }

    pub fn show_title(mut self, v: bool) -> Self {
        self.config.show_title = v;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn cover_bounds(mut self, width: u32, height: u32) -> Self {
        self.config.max_cover_width = width.max(1);
        self.config.max_cover_height = height.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, ShelfError> {
        let c = &self.config;
        if c.subdir.contains('/') || c.subdir.contains('\\') {
            return Err(ShelfError::InvalidConfig(format!(
                "subdirectory name must be a single path component, got '{}'",
                c.subdir
            )));
        }
        if c.subdir == "." || c.subdir == ".." {
            return Err(ShelfError::InvalidConfig(format!(
                "subdirectory name must not be '{}'",
                c.subdir
            )));
        }
        if c.dpi < 72 || c.dpi > 600 {
            return Err(ShelfError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        Ok(self.config)
    }
}

// ── Persisted settings ───────────────────────────────────────────────────

/// The persisted configuration subset, stored as pretty-printed JSON.
///
/// Missing fields in the file are filled from [`Settings::default()`]
/// (container-level `#[serde(default)]`), so a file written by an older
/// version keeps working and never yields a partially-initialised value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub image_output_dir: PathBuf,
    pub link_output_dir: PathBuf,
    pub subdir_name: String,
    pub use_table: bool,
    pub show_title: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_output_dir: PathBuf::from("/obsidian/images/"),
            link_output_dir: PathBuf::from("/obsidian/pdfs/"),
            subdir_name: "book_covers".to_string(),
            use_table: true,
            show_title: false,
        }
    }
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// Never fails: a missing file is normal first-run behaviour, and an
    /// unreadable or syntactically invalid file is logged and replaced by
    /// the complete defaults.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("cannot read settings '{}', using defaults: {e}", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "settings '{}' are not valid JSON, using defaults: {e}",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Persist settings to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ShelfError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            ShelfError::SettingsWriteFailed {
                path: path.to_path_buf(),
                source: e.into(),
            }
        })?;
        fs::write(path, json).map_err(|e| ShelfError::SettingsWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!("settings saved to {}", path.display());
        Ok(())
    }

    /// Turn persisted settings into a runtime [`BatchConfig`].
    pub fn to_config(&self) -> Result<BatchConfig, ShelfError> {
        BatchConfig::builder()
            .image_root(&self.image_output_dir)
            .link_root(&self.link_output_dir)
            .subdir(&self.subdir_name)
            .use_table(self.use_table)
            .show_title(self.show_title)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = BatchConfig::builder().build().unwrap();
        assert_eq!(config.image_root, PathBuf::from("/obsidian/images/"));
        assert_eq!(config.link_root, PathBuf::from("/obsidian/pdfs/"));
        assert_eq!(config.subdir, "book_covers");
        assert!(config.use_table);
        assert!(!config.show_title);
        assert_eq!(config.dpi, 300);
        assert_eq!((config.max_cover_width, config.max_cover_height), (600, 800));
    }

    #[test]
    fn builder_rejects_nested_subdir() {
        let err = BatchConfig::builder().subdir("a/b").build().unwrap_err();
        assert!(err.to_string().contains("single path component"));
        assert!(BatchConfig::builder().subdir("..").build().is_err());
    }

    #[test]
    fn builder_clamps_dpi() {
        let config = BatchConfig::builder().dpi(10_000).build().unwrap();
        assert_eq!(config.dpi, 600);
        let config = BatchConfig::builder().dpi(1).build().unwrap();
        assert_eq!(config.dpi, 72);
    }

    #[test]
    fn settings_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn settings_invalid_json_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn settings_partial_file_is_filled_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "subdir_name": "papers", "show_title": true }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.subdir_name, "papers");
        assert!(settings.show_title);
        // untouched fields come from the defaults, not from zero values
        assert_eq!(settings.image_output_dir, PathBuf::from("/obsidian/images/"));
        assert!(settings.use_table);
    }

    #[test]
    fn settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.subdir_name = "papers".into();
        settings.use_table = false;
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn settings_convert_to_config() {
        let mut settings = Settings::default();
        settings.subdir_name = "papers".into();
        let config = settings.to_config().unwrap();
        assert_eq!(config.subdir, "papers");
        assert_eq!(config.dpi, 300); // non-persisted knobs keep their defaults
    }
}
