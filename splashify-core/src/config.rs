//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Loads and saves settings as TOML from the cross-platform config path using
//! the [`directories`](https://docs.rs/directories) crate. The API access key
//! may live in the file, but the `UNSPLASH_ACCESS_KEY` environment variable
//! always wins.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?.config;
//! let key = config.api.resolve_access_key(&Config::config_path()?)?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use tokio::fs as TokioFs;

use crate::error::AppError;

/// Environment variable holding the API access key.
pub const ACCESS_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

/// Photo API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,

    /// Optional; `UNSPLASH_ACCESS_KEY` overrides it.
    pub access_key: Option<String>,

    /// Results per orientation and page.
    pub per_page: u32,

    /// Target image height hint sent with every search.
    pub image_height_hint: u32,

    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.unsplash.com".to_string(),
            access_key: None,
            per_page: 15,
            image_height_hint: 300,
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("splashify/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    /// Resolve the access key: environment first, then the config file.
    /// A missing or blank key is a configuration error.
    pub fn resolve_access_key(&self, config_path: &Path) -> Result<String, AppError> {
        Self::pick_access_key(std::env::var(ACCESS_KEY_ENV).ok(), self.access_key.as_deref())
            .ok_or_else(|| AppError::MissingCredential(config_path.to_path_buf()))
    }

    fn pick_access_key(env: Option<String>, file: Option<&str>) -> Option<String> {
        env.map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| file.map(str::trim).filter(|k| !k.is_empty()).map(String::from))
    }
}

/// Feed presentation and input pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Grid column count.
    pub columns: u16,

    /// Quiet window before a typed search is sent.
    #[serde(with = "humantime_serde")]
    pub search_debounce: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            columns: 6,
            search_debounce: Duration::from_millis(1000),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,

    /// Defaults to `<data dir>/logs`.
    pub directory: Option<PathBuf>,

    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            max_files: 5,
        }
    }
}

/// Result of [`Config::load`].
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// Parse error of a file that was replaced by defaults.
    pub rejected: Option<AppError>,
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads config from the TOML file in the app config dir, or returns
    /// defaults (and writes them out) when no file exists yet.
    pub async fn load() -> Result<LoadedConfig, AppError> {
        Self::load_from(&Self::config_path()?).await
    }

    /// A file that fails to parse yields defaults plus the parse error in
    /// `rejected`. Logging is not up yet when this runs, so the caller reports it.
    pub async fn load_from(path: &Path) -> Result<LoadedConfig, AppError> {
        if path.exists() {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(path).await?;
            let loaded = match Self::parse(&text) {
                Ok(config) => LoadedConfig {
                    config,
                    rejected: None,
                },
                Err(e) => LoadedConfig {
                    config: Self::default(),
                    rejected: Some(e),
                },
            };
            Ok(loaded)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            if let Err(e) = default_config.save_to(path).await {
                warn!("Could not write default config: {}", e);
            }

            Ok(LoadedConfig {
                config: default_config,
                rejected: None,
            })
        }
    }

    /// Parses a TOML document, clamping values the UI cannot work with.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        let mut cfg: Self = toml::from_str(text)?;
        cfg.feed.columns = cfg.feed.columns.clamp(1, 12);
        cfg.api.per_page = cfg.api.per_page.clamp(1, 30);
        Ok(cfg)
    }

    /// Saves config to the TOML file in the app config dir.
    pub async fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::config_path()?).await
    }

    async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await?;

        Ok(())
    }

    /// Where log files go when `logging.directory` is unset.
    pub fn log_dir(&self) -> Result<PathBuf, AppError> {
        match &self.logging.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("logs")),
        }
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    fn project_dirs() -> Result<ProjectDirs, AppError> {
        ProjectDirs::from("org", "splashify", "Splashify")
            .ok_or_else(|| AppError::Other("Could not determine config directory.".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_feed_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.api.per_page, 15);
        assert_eq!(cfg.api.image_height_hint, 300);
        assert_eq!(cfg.feed.columns, 6);
        assert_eq!(cfg.feed.search_debounce, Duration::from_millis(1000));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = Config::parse(
            r#"
            [feed]
            columns = 4
            search_debounce = "750ms"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.feed.columns, 4);
        assert_eq!(cfg.feed.search_debounce, Duration::from_millis(750));
        assert_eq!(cfg.api.base_url, "https://api.unsplash.com");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn out_of_range_columns_are_clamped() {
        let cfg = Config::parse("[feed]\ncolumns = 0\n").unwrap();
        assert_eq!(cfg.feed.columns, 1);
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!(
            Config::parse("[feed\ncolumns = 4"),
            Err(AppError::Config(_))
        ));
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("splashify-config-{}-{name}", std::process::id()))
            .join("config.toml")
    }

    #[tokio::test]
    async fn broken_file_falls_back_and_reports_error() {
        let path = scratch_path("broken");
        TokioFs::create_dir_all(path.parent().unwrap()).await.unwrap();
        TokioFs::write(&path, "[feed\ncolumns = 4").await.unwrap();

        let loaded = Config::load_from(&path).await.unwrap();
        assert_eq!(loaded.config.feed.columns, 6);
        assert!(matches!(loaded.rejected, Some(AppError::Config(_))));

        TokioFs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let path = scratch_path("missing");
        let _ = TokioFs::remove_dir_all(path.parent().unwrap()).await;

        let loaded = Config::load_from(&path).await.unwrap();
        assert!(loaded.rejected.is_none());
        assert!(path.exists());
        let written = Config::parse(&TokioFs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(written.api.per_page, loaded.config.api.per_page);

        TokioFs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }

    #[test]
    fn env_key_wins_over_file() {
        let key = ApiConfig::pick_access_key(Some("env-key".into()), Some("file-key"));
        assert_eq!(key.as_deref(), Some("env-key"));
    }

    #[test]
    fn blank_keys_are_missing() {
        assert_eq!(ApiConfig::pick_access_key(Some("  ".into()), Some("")), None);
        assert_eq!(
            ApiConfig::pick_access_key(None, Some(" file-key ")).as_deref(),
            Some("file-key")
        );
    }
}
