//! Configuration file loading with precedence handling.

use crate::model::{find_fixed_duration, DEFAULT_FIXED_DURATION, DEFAULT_SORT_KEY};
use crate::pipeline::SortOrder;
use crate::session::DEFAULT_FETCH_LIMIT;
use crate::state::StoreDefaults;
use crate::widget::CANDIDATE_DISPLAY_LIMIT;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "LOGDECK_CONFIG";
/// Env var overriding `per_page`.
pub const PER_PAGE_ENV: &str = "LOGDECK_PER_PAGE";
/// Env var overriding `log_filter`.
pub const LOG_FILTER_ENV: &str = "LOGDECK_LOG_FILTER";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permissions, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; unset fields fall back to defaults.
/// Corresponds to `~/.config/logdeck/config.toml`:
///
/// ```toml
/// per_page = 50
/// default_duration = "Past 1 Hour"
/// sort_key = "p_timestamp"
/// sort_order = "desc"
/// fetch_limit = 1000
/// candidate_limit = 50
/// log_file_path = "/tmp/logdeck.log"
/// log_filter = "logdeck=debug"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Rows per page.
    #[serde(default)]
    pub per_page: Option<usize>,

    /// Label of the initial rolling-window preset.
    #[serde(default)]
    pub default_duration: Option<String>,

    /// Initial sort column.
    #[serde(default)]
    pub sort_key: Option<String>,

    /// Initial sort direction.
    #[serde(default)]
    pub sort_order: Option<SortOrder>,

    /// Rows requested per log fetch.
    #[serde(default)]
    pub fetch_limit: Option<usize>,

    /// Filter candidates rendered before truncation.
    #[serde(default)]
    pub candidate_limit: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_filter: Option<String>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Rows per page.
    pub per_page: usize,
    /// Initial preset label.
    pub default_duration: String,
    /// Initial sort column.
    pub sort_key: String,
    /// Initial sort direction.
    pub sort_order: SortOrder,
    /// Rows requested per log fetch.
    pub fetch_limit: usize,
    /// Filter candidates rendered before truncation.
    pub candidate_limit: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Default tracing directive.
    pub log_filter: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let store = StoreDefaults::default();
        Self {
            per_page: store.per_page,
            default_duration: DEFAULT_FIXED_DURATION.name.to_string(),
            sort_key: DEFAULT_SORT_KEY.to_string(),
            sort_order: store.sort_order,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            candidate_limit: CANDIDATE_DISPLAY_LIMIT,
            log_file_path: default_log_path(),
            log_filter: "info".to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Defaults for a fresh store.
    ///
    /// A zero `per_page` or an unknown preset label falls back to the
    /// built-in value with a warning.
    pub fn store_defaults(&self) -> StoreDefaults {
        let fallback = StoreDefaults::default();

        let per_page = if self.per_page == 0 {
            warn!("per_page = 0 is invalid, using {}", fallback.per_page);
            fallback.per_page
        } else {
            self.per_page
        };

        let duration = find_fixed_duration(&self.default_duration).unwrap_or_else(|| {
            warn!(
                label = %self.default_duration,
                "Unknown default_duration, using {}",
                fallback.duration.name
            );
            fallback.duration
        });

        StoreDefaults {
            per_page,
            duration,
            sort_key: self.sort_key.clone(),
            sort_order: self.sort_order,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/logdeck/logdeck.log` on Linux, or the platform
/// equivalent. Falls back to the current directory when no state directory
/// exists (macOS, Windows).
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("logdeck").join("logdeck.log"),
        None => PathBuf::from("logdeck.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist (use defaults).
///
/// # Errors
///
/// Returns error if the file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path (`~/.config/logdeck/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("logdeck").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument
/// 2. `LOGDECK_CONFIG` environment variable
/// 3. Default path `~/.config/logdeck/config.toml`
///
/// Missing config files are NOT errors.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Apply environment variable overrides.
///
/// - `LOGDECK_PER_PAGE`: rows per page (ignored with a warning if not a number)
/// - `LOGDECK_LOG_FILTER`: default tracing directive
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(PER_PAGE_ENV) {
        match raw.trim().parse() {
            Ok(per_page) => config.per_page = per_page,
            Err(_) => warn!(value = %raw, "Ignoring non-numeric {PER_PAGE_ENV}"),
        }
    }

    if let Ok(filter) = std::env::var(LOG_FILTER_ENV) {
        config.log_filter = filter;
    }

    config
}

/// Merge config file into defaults.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        per_page: config.per_page.unwrap_or(defaults.per_page),
        default_duration: config.default_duration.unwrap_or(defaults.default_duration),
        sort_key: config.sort_key.unwrap_or(defaults.sort_key),
        sort_order: config.sort_order.unwrap_or(defaults.sort_order),
        fetch_limit: config.fetch_limit.unwrap_or(defaults.fetch_limit),
        candidate_limit: config.candidate_limit.unwrap_or(defaults.candidate_limit),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        log_filter: config.log_filter.unwrap_or(defaults.log_filter),
    }
}

/// Full chain: defaults → file → env.
///
/// # Errors
///
/// Returns error if a config file exists but cannot be read or parsed.
pub fn resolve_config(config_path: Option<PathBuf>) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    Ok(apply_env_overrides(merge_config(file)))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
