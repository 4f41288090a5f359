// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language and theme mode
//! - `[endpoints]` - Upload API, gallery backend and request timeout
//! - `[upload]` - Retry ceiling, retry delay and concurrency
//! - `[gallery]` - Page size, scroll threshold, grid columns, thumbnail cache
//! - `[export]` - Zip archive or individual files
//!
//! Every field is optional in the file. Missing values fall back to
//! [`defaults`] and out-of-range values are clamped by the accessor methods.
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. `--config-dir` CLI flag or `ICED_GALLERY_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use iced_gallery::app::config;
//!
//! let (mut config, _warning) = config::load();
//! config.general.language = Some("fr".to_string());
//! config::save_to_path(&config, std::path::Path::new("settings.toml"))
//!     .expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::domain::gallery::{
    MaxAttempts, PageSize, RetryDelay, ScrollThreshold, UploadConcurrency,
};
use crate::error::{Error, Result};
use crate::infrastructure::HostEndpoints;
use crate::sync::export::ExportMode;
use crate::sync::upload::UploadPolicy;
use crate::ui::theming::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Application theme mode (light, dark, or system).
    #[serde(default, deserialize_with = "deserialize_theme_mode")]
    pub theme_mode: ThemeMode,
}

/// Remote services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_preset: Option<String>,

    /// Base URL of the gallery backend (`/images`, `/download`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            upload_url: Some(DEFAULT_UPLOAD_URL.to_string()),
            upload_preset: Some(DEFAULT_UPLOAD_PRESET.to_string()),
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Upload retry policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadConfig {
    /// Attempts per file before it is marked failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    /// Pause between two attempts of the same file (milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,

    /// Files uploaded at the same time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_attempts: Some(MaxAttempts::default().value()),
            retry_delay_ms: Some(RetryDelay::default().as_millis()),
            concurrency: Some(UploadConcurrency::default().value()),
        }
    }
}

/// Gallery paging and rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Remaining scroll distance (pixels) below which the next page is fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_threshold_px: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_cache_size: Option<usize>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: Some(PageSize::default().value()),
            scroll_threshold_px: Some(ScrollThreshold::default().value()),
            columns: Some(DEFAULT_GRID_COLUMNS),
            thumbnail_cache_size: Some(DEFAULT_THUMBNAIL_CACHE_SIZE),
        }
    }
}

/// Export of selected images.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ExportMode>,

    /// File name proposed in the save dialog for zip exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_name: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mode: Some(ExportMode::default()),
            archive_name: Some(DEFAULT_ARCHIVE_NAME.to_string()),
        }
    }
}

// =============================================================================
// Main Config
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub gallery: GalleryConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    pub fn host_endpoints(&self) -> HostEndpoints {
        let endpoints = &self.endpoints;
        HostEndpoints {
            upload_url: endpoints
                .upload_url
                .clone()
                .unwrap_or_else(|| DEFAULT_UPLOAD_URL.to_string()),
            upload_preset: endpoints
                .upload_preset
                .clone()
                .unwrap_or_else(|| DEFAULT_UPLOAD_PRESET.to_string()),
            api_base_url: endpoints
                .api_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .endpoints
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
            .clamp(MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        let upload = &self.upload;
        UploadPolicy {
            max_attempts: upload
                .max_attempts
                .map(MaxAttempts::new)
                .unwrap_or_default(),
            retry_delay: upload
                .retry_delay_ms
                .map(RetryDelay::from_millis)
                .unwrap_or_default(),
            concurrency: upload
                .concurrency
                .map(UploadConcurrency::new)
                .unwrap_or_default(),
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.gallery.page_size.map(PageSize::new).unwrap_or_default()
    }

    pub fn scroll_threshold(&self) -> ScrollThreshold {
        self.gallery
            .scroll_threshold_px
            .map(ScrollThreshold::new)
            .unwrap_or_default()
    }

    pub fn grid_columns(&self) -> usize {
        self.gallery
            .columns
            .unwrap_or(DEFAULT_GRID_COLUMNS)
            .clamp(MIN_GRID_COLUMNS, MAX_GRID_COLUMNS)
    }

    pub fn thumbnail_cache_size(&self) -> NonZeroUsize {
        let size = self
            .gallery
            .thumbnail_cache_size
            .unwrap_or(DEFAULT_THUMBNAIL_CACHE_SIZE)
            .clamp(MIN_THUMBNAIL_CACHE_SIZE, MAX_THUMBNAIL_CACHE_SIZE);
        NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn export_mode(&self) -> ExportMode {
        self.export.mode.unwrap_or_default()
    }

    pub fn archive_name(&self) -> String {
        self.export
            .archive_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string())
    }
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> std::result::Result<ThemeMode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    match raw.to_lowercase().as_str() {
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        "system" => Ok(ThemeMode::System),
        other => Err(D::Error::custom(format!("invalid theme_mode: {}", other))),
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "falling back to default settings");
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
