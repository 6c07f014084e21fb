//! Configuration loading and discovery for `unibuild.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::UnibuildConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name searched for in the project tree.
pub const CONFIG_FILE_NAME: &str = "unibuild.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse unibuild.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the product name
    pub name: Option<String>,
    /// Override the engine executable
    pub engine: Option<PathBuf>,
}

/// Find unibuild.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    find_config_from(cwd)
}

/// Find unibuild.toml by walking up from a specific directory.
///
/// This is the internal implementation that allows specifying the start
/// directory, useful for testing.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            // Reached root, no config found
            return None;
        }
    }
}

/// Load configuration from a unibuild.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// `find_config()` to locate the config file. If no config file is found,
/// returns a default configuration.
pub fn load_config(path: Option<&Path>) -> Result<UnibuildConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<UnibuildConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: UnibuildConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Create a default configuration when no unibuild.toml is found.
///
/// The product name falls back to the current directory name.
pub fn default_config() -> UnibuildConfig {
    let project_name = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unnamed".to_string());

    UnibuildConfig {
        project: super::schema::ProjectConfig { name: project_name, version: "0.1.0".to_string() },
        engine: super::schema::EngineConfig::default(),
        scenes: Vec::new(),
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut UnibuildConfig, overrides: &CliOverrides) {
    if let Some(ref name) = overrides.name {
        config.project.name = name.clone();
    }
    if let Some(ref engine) = overrides.engine {
        config.engine.executable = Some(engine.clone());
    }
}

/// Get the project root directory from a config file path.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}
