//! Gallery configuration.
//!
//! Handles loading and validating `config.toml`. All keys are optional —
//! a missing file yields the stock defaults, and sparse files override just
//! the values they name. Unknown keys are rejected to catch typos early.
//!
//! ```toml
//! title = "My Photos"            # Site title (album name in single mode)
//! url = "https://example.org"    # Canonical URL, used in page metadata
//! cover_url = ""                 # Preview image URL for page metadata
//! bg_color = "#1d1d1d"
//! font_color = "#eeeeee"
//! border_size = "3px"            # Frame around thumbnails (CSS value)
//! thumbnail_max_size = 480       # Longest thumbnail edge, pixels
//! month_separator = false        # Month headings between photos
//! enable_albums = false          # Treat subdirectories as separate albums
//! photos_sorting = "desc"        # "asc" or "desc", by shooting date
//! max_workers = 4                # Parallel photo workers per album
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Photo ordering direction, by shooting date with filename fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Gallery configuration loaded from `config.toml`.
///
/// The pipeline consumes `thumbnail_max_size`, `photos_sorting`,
/// `enable_albums`, and `max_workers`; the remaining keys belong to the
/// rendered pages and stylesheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Site title, also the album name in single-album mode.
    pub title: String,
    /// Canonical site URL for page metadata. Empty disables the tags.
    pub url: String,
    /// Preview image URL for page metadata. Empty disables the tag.
    pub cover_url: String,
    /// Page background color (CSS value).
    pub bg_color: String,
    /// Text color (CSS value).
    pub font_color: String,
    /// Border drawn around thumbnails (CSS value).
    pub border_size: String,
    /// Longest edge of generated thumbnails, in pixels.
    pub thumbnail_max_size: u32,
    /// Insert a month heading between photos shot in different months.
    pub month_separator: bool,
    /// Treat every subdirectory of the photos dir as its own album.
    pub enable_albums: bool,
    /// Photo ordering within an album.
    pub photos_sorting: SortDirection,
    /// Maximum parallel photo workers per album.
    pub max_workers: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            url: String::new(),
            cover_url: String::new(),
            bg_color: "#1d1d1d".to_string(),
            font_color: "#eeeeee".to_string(),
            border_size: "3px".to_string(),
            thumbnail_max_size: 480,
            month_separator: false,
            enable_albums: false,
            photos_sorting: SortDirection::Desc,
            max_workers: 4,
        }
    }
}

impl GalleryConfig {
    /// Load from a `config.toml` path. A missing file yields the defaults;
    /// a present-but-invalid file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnail_max_size == 0 {
            return Err(ConfigError::Validation(
                "thumbnail_max_size must be positive".into(),
            ));
        }
        if self.max_workers == 0 {
            return Err(ConfigError::Validation(
                "max_workers must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_values() {
        let config = GalleryConfig::default();
        assert_eq!(config.thumbnail_max_size, 480);
        assert_eq!(config.photos_sorting, SortDirection::Desc);
        assert_eq!(config.max_workers, 4);
        assert!(!config.enable_albums);
        assert!(!config.month_separator);
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = GalleryConfig::load(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.title, "Gallery");
    }

    #[test]
    fn load_sparse_file_keeps_defaults_for_unset_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "title = \"Street\"\nphotos_sorting = \"asc\"\n").unwrap();

        let config = GalleryConfig::load(&path).unwrap();
        assert_eq!(config.title, "Street");
        assert_eq!(config.photos_sorting, SortDirection::Asc);
        assert_eq!(config.thumbnail_max_size, 480);
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "thumbnail_size = 300\n").unwrap();

        assert!(matches!(
            GalleryConfig::load(&path),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_rejects_invalid_sort_direction() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "photos_sorting = \"newest\"\n").unwrap();

        assert!(matches!(
            GalleryConfig::load(&path),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn validate_rejects_zero_thumbnail_size() {
        let config = GalleryConfig {
            thumbnail_max_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let config = GalleryConfig {
            max_workers: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }
}
