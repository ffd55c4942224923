//! Configuration module.
//!
//! Settings resolve in layers: built-in defaults, then the TOML file, then
//! environment overrides. See [`loader::resolve_config`].

pub mod loader;

pub use loader::{
    apply_env_overrides, default_config_path, default_log_path, load_config_file,
    load_config_with_precedence, merge_config, resolve_config, ConfigError, ConfigFile,
    ResolvedConfig,
};
