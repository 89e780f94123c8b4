//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::application::dto::POST_CHUNK_SIZE;
use crate::application::services::Viewport;

pub(super) const APP_NAME: &str = "matterpost";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "matterpost";

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

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
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
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Mattermost server, e.g. `https://chat.example.com`.
    #[serde(default)]
    pub server_url: String,

    /// Personal access or session token. Never written to disk.
    #[serde(skip)]
    pub token: Option<String>,

    /// Posts per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Load custom emoji referenced by posts.
    #[serde(default = "default_true")]
    pub enable_custom_emoji: bool,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Screen the previews are laid out for.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Theme colors.
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Screen the previews are laid out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Device width in pixels.
    #[serde(default = "default_device_width")]
    pub device_width: u32,

    /// Device height in pixels.
    #[serde(default = "default_device_height")]
    pub device_height: u32,

    /// Tablet layout with a permanent side panel.
    #[serde(default)]
    pub is_tablet: bool,
}

impl LayoutConfig {
    /// Viewport described by this layout.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        Viewport::new(self.device_width, self.device_height).with_tablet(self.is_tablet)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            device_width: default_device_width(),
            device_height: default_device_height(),
            is_tablet: false,
        }
    }
}

/// Theme colors as hex codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Center channel background.
    #[serde(default = "default_center_channel_bg")]
    pub center_channel_bg: String,

    /// Center channel text.
    #[serde(default = "default_center_channel_color")]
    pub center_channel_color: String,

    /// Link text.
    #[serde(default = "default_link_color")]
    pub link_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            center_channel_bg: default_center_channel_bg(),
            center_channel_color: default_center_channel_color(),
            link_color: default_link_color(),
        }
    }
}

fn default_true() -> bool {
    true
}

const fn default_per_page() -> u32 {
    POST_CHUNK_SIZE
}

const fn default_request_timeout() -> u64 {
    30
}

const fn default_device_width() -> u32 {
    390
}

const fn default_device_height() -> u32 {
    844
}

fn default_center_channel_bg() -> String {
    "#ffffff".to_string()
}

fn default_center_channel_color() -> String {
    "#3f4350".to_string()
}

fn default_link_color() -> String {
    "#386fe5".to_string()
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
        if let Some(server_url) = &args.server_url {
            self.server_url.clone_from(server_url);
        }
        if let Some(token) = &args.token {
            self.token = Some(token.clone());
        }
        if args.tablet {
            self.layout.is_tablet = true;
        }
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("matterpost.log"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            server_url: String::new(),
            token: None,
            per_page: default_per_page(),
            enable_custom_emoji: true,
            request_timeout_secs: default_request_timeout(),
            layout: LayoutConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}
