//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;
use crate::domain::entities::TargetSize;
use crate::infrastructure::image::DiskImageCache;
use crate::infrastructure::image::worker_pool::DEFAULT_MAX_WORKERS;
use crate::infrastructure::search::SCRYFALL_API_BASE;

pub(crate) const APP_NAME: &str = "card-gallery";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

/// Thumbnail width bounds (the gallery slider range).
pub const MIN_THUMB_WIDTH: u32 = 50;
/// Upper thumbnail width bound.
pub const MAX_THUMB_WIDTH: u32 = 400;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Image cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Gallery layout configuration.
    #[serde(default)]
    pub gallery: GalleryConfig,

    /// Search API configuration.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Image cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory. Defaults to the platform cache dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Maximum concurrent image jobs.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Image download timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_workers: default_max_workers(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CacheConfig {
    /// Returns the configured cache directory or the default location.
    #[must_use]
    pub fn effective_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            DiskImageCache::default_location()
                .cache_dir()
                .to_path_buf()
        })
    }
}

/// Gallery layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Thumbnail width in pixels.
    #[serde(default = "default_thumb_width")]
    pub thumb_width: u32,

    /// Thumbnail height divided by width.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            thumb_width: default_thumb_width(),
            aspect_ratio: default_aspect_ratio(),
        }
    }
}

impl GalleryConfig {
    /// Bounding box for grid thumbnails.
    #[must_use]
    pub fn thumb_size(&self) -> TargetSize {
        let width = self.thumb_width.clamp(MIN_THUMB_WIDTH, MAX_THUMB_WIDTH);
        let ratio = if self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0 {
            self.aspect_ratio
        } else {
            default_aspect_ratio()
        };
        TargetSize::from_width_and_ratio(width, ratio)
    }
}

/// Search API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_timeout_secs() -> u64 {
    crate::infrastructure::image::fetcher::DEFAULT_TIMEOUT_SECS
}

fn default_thumb_width() -> u32 {
    200
}

fn default_aspect_ratio() -> f32 {
    1.4
}

fn default_base_url() -> String {
    SCRYFALL_API_BASE.to_string()
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(cache_dir) = &args.cache_dir {
            self.cache.dir = Some(cache_dir.clone());
        }
        if let Some(max_workers) = args.max_workers {
            self.cache.max_workers = max_workers;
        }
        if let Some(thumb_width) = args.thumb_width {
            self.gallery.thumb_width = thumb_width;
        }
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("card-gallery.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}
