//! # Application Configuration
//!
//! Configuration for the page-side player and the background cache worker.
//!
//! ## Overview
//!
//! [`AppConfig`] groups a [`PlayerConfig`] and an [`OfflineConfig`]. Hosts
//! either build one in code through [`AppConfig::builder`] or pass a JSON
//! document to [`AppConfig::from_json`]; missing fields fall back to the
//! defaults. Both paths run [`AppConfig::validate`] so a bad value fails at
//! startup instead of surfacing as odd behaviour later.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::AppConfig;
//!
//! let config = AppConfig::builder()
//!     .max_upload_mb(50)
//!     .cache_version("v4")
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.player.max_upload_bytes, 50 * 1024 * 1024);
//! assert_eq!(config.offline.store_name(), "soundscape-v4");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Default per-file upload ceiling (100 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * BYTES_PER_MB;

/// Default delay before skipping a track that failed to play.
pub const DEFAULT_ERROR_SKIP_DELAY_MS: u64 = 2_000;

/// Default event bus capacity.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Extensions accepted when a file's declared media type cannot be trusted.
pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "aac", "flac", "webm"];

/// Static assets the app shell needs to load with no network.
pub const DEFAULT_OFFLINE_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./style.css",
    "./app.js",
    "./manifest.json",
    "./icons/icon-192.svg",
    "./icons/icon-512.svg",
];

/// How uploaded bytes are made playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceBinding {
    /// Session-scoped reference to the file bytes, revoked on removal.
    #[default]
    Transient,
    /// Self-contained encoded copy of the bytes; nothing to revoke.
    Inline,
}

/// Settings for the playlist/transport controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Largest accepted file, in bytes.
    pub max_upload_bytes: u64,
    /// Lowercase extensions accepted when the declared type is untrustworthy.
    pub allowed_extensions: Vec<String>,
    /// Delay before advancing past a track that failed to play, in milliseconds.
    pub error_skip_delay_ms: u64,
    /// Resource binding strategy.
    pub resource_binding: ResourceBinding,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: DEFAULT_AUDIO_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            error_skip_delay_ms: DEFAULT_ERROR_SKIP_DELAY_MS,
            resource_binding: ResourceBinding::default(),
        }
    }
}

impl PlayerConfig {
    /// Delay before advancing past a failed track.
    pub fn error_skip_delay(&self) -> Duration {
        Duration::from_millis(self.error_skip_delay_ms)
    }

    /// Upload ceiling in whole megabytes, for messages.
    pub fn max_upload_mb(&self) -> f64 {
        self.max_upload_bytes as f64 / BYTES_PER_MB as f64
    }

    /// Whether `extension` (any case) is on the allow-list.
    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }

    fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            return Err(Error::Config(
                "player.max_upload_bytes must be greater than 0".to_string(),
            ));
        }
        if self.allowed_extensions.is_empty() {
            return Err(Error::Config(
                "player.allowed_extensions cannot be empty".to_string(),
            ));
        }
        if let Some(bad) = self
            .allowed_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(Error::Config(format!(
                "player.allowed_extensions entry {bad:?} must be a bare extension like \"mp3\""
            )));
        }
        Ok(())
    }
}

/// Settings for the offline cache worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    /// Store name prefix.
    pub namespace: String,
    /// Version tag; bumping it supersedes every previously cached asset.
    pub version: String,
    /// Asset paths, relative to the worker scope.
    pub assets: Vec<String>,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            namespace: "soundscape".to_string(),
            version: "v3".to_string(),
            assets: DEFAULT_OFFLINE_ASSETS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl OfflineConfig {
    /// Name of the store that is current for this version.
    pub fn store_name(&self) -> String {
        format!("{}-{}", self.namespace, self.version)
    }

    fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(Error::Config("offline.namespace cannot be empty".to_string()));
        }
        if self.version.trim().is_empty() {
            return Err(Error::Config("offline.version cannot be empty".to_string()));
        }
        if self.version.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "offline.version {:?} must not contain whitespace",
                self.version
            )));
        }
        if self.assets.is_empty() {
            return Err(Error::Config("offline.assets cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub player: PlayerConfig,
    pub offline: OfflineConfig,
    /// Capacity of the event bus channel.
    pub event_buffer_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            offline: OfflineConfig::default(),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

impl AppConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse and validate a JSON document. Absent fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.player.validate()?;
        self.offline.validate()?;
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "event_buffer_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug, Clone, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the upload ceiling in bytes.
    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.config.player.max_upload_bytes = bytes;
        self
    }

    /// Set the upload ceiling in megabytes.
    pub fn max_upload_mb(self, megabytes: u64) -> Self {
        self.max_upload_bytes(megabytes.saturating_mul(BYTES_PER_MB))
    }

    /// Replace the extension allow-list.
    pub fn allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.player.allowed_extensions = extensions
            .into_iter()
            .map(|ext| ext.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Set the delay before skipping a failed track.
    pub fn error_skip_delay(mut self, delay: Duration) -> Self {
        self.config.player.error_skip_delay_ms = delay.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    /// Choose the resource binding strategy.
    pub fn resource_binding(mut self, binding: ResourceBinding) -> Self {
        self.config.player.resource_binding = binding;
        self
    }

    /// Set the cache store namespace.
    pub fn cache_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.offline.namespace = namespace.into();
        self
    }

    /// Set the cache version tag.
    pub fn cache_version(mut self, version: impl Into<String>) -> Self {
        self.config.offline.version = version.into();
        self
    }

    /// Replace the offline asset list.
    pub fn offline_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.offline.assets = assets.into_iter().map(Into::into).collect();
        self
    }

    /// Set the event bus capacity.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.config.event_buffer_size = size;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<AppConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.player.max_upload_bytes, 100 * 1024 * 1024);
        assert_eq!(config.player.allowed_extensions.len(), 7);
        assert_eq!(config.player.error_skip_delay(), Duration::from_secs(2));
        assert_eq!(config.player.resource_binding, ResourceBinding::Transient);
        assert_eq!(config.offline.store_name(), "soundscape-v3");
        assert_eq!(config.offline.assets.len(), 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .max_upload_mb(10)
            .allowed_extensions(["MP3", "wav"])
            .error_skip_delay(Duration::from_millis(500))
            .resource_binding(ResourceBinding::Inline)
            .cache_namespace("player")
            .cache_version("v9")
            .offline_assets(["./", "./index.html"])
            .event_buffer_size(16)
            .build()
            .unwrap();

        assert_eq!(config.player.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.player.allows_extension("mp3"));
        assert!(config.player.allows_extension("WAV"));
        assert!(!config.player.allows_extension("flac"));
        assert_eq!(config.player.error_skip_delay_ms, 500);
        assert_eq!(config.player.resource_binding, ResourceBinding::Inline);
        assert_eq!(config.offline.store_name(), "player-v9");
        assert_eq!(config.offline.assets, vec!["./", "./index.html"]);
        assert_eq!(config.event_buffer_size, 16);
    }

    #[test]
    fn test_validation() {
        assert!(AppConfig::builder().max_upload_bytes(0).build().is_err());
        assert!(AppConfig::builder()
            .allowed_extensions(Vec::<String>::new())
            .build()
            .is_err());
        assert!(AppConfig::builder()
            .allowed_extensions([".mp3"])
            .build()
            .is_err());
        assert!(AppConfig::builder().cache_namespace(" ").build().is_err());
        assert!(AppConfig::builder().cache_version("").build().is_err());
        assert!(AppConfig::builder().cache_version("v 4").build().is_err());
        assert!(AppConfig::builder()
            .offline_assets(Vec::<String>::new())
            .build()
            .is_err());
        assert!(AppConfig::builder().event_buffer_size(0).build().is_err());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = AppConfig::from_json(
            r#"{ "player": { "max_upload_bytes": 2048 }, "offline": { "version": "v4" } }"#,
        )
        .unwrap();

        assert_eq!(config.player.max_upload_bytes, 2048);
        assert_eq!(config.player.allowed_extensions.len(), 7);
        assert_eq!(config.offline.store_name(), "soundscape-v4");
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            AppConfig::from_json("{ not json"),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{ "offline": { "assets": [] } }"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_resource_binding_serde() {
        let config = AppConfig::from_json(r#"{ "player": { "resource_binding": "inline" } }"#)
            .unwrap();
        assert_eq!(config.player.resource_binding, ResourceBinding::Inline);
    }
}
