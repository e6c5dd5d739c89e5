/// Application configuration
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "TASK_TRACKER_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store file; relative paths resolve against the working directory
    pub store_file: PathBuf,
    /// Directory for rotated log files
    pub log_dir: PathBuf,
    /// trace | debug | info | warn | error | off
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_file: PathBuf::from("tasks.json"),
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
        }
    }
}

/// Config file path
/// Linux: ~/.config/task-tracker/config.toml
/// macOS: ~/Library/Application Support/task-tracker/config.toml
/// Windows: %APPDATA%\task-tracker\config.toml
pub fn get_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("task-tracker").join("config.toml"))
}

/// Load the configuration, falling back to defaults when there is no file
pub fn load_config() -> Result<Config> {
    match get_config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;

    crate::logging::normalize_level(&config.log_level)
        .with_context(|| format!("invalid log_level in {}", path.display()))?;

    Ok(config)
}

pub fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("failed to write config {}", path.display()))?;

    Ok(())
}

/// Persist a new default store file
pub fn set_store_file(store_file: PathBuf) -> Result<()> {
    let path = get_config_path().context("cannot determine config directory")?;
    let mut config = load_config_from(&path)?;
    config.store_file = store_file;
    save_config_to(&path, &config)?;
    println!("Store file set to: {}", config.store_file.display());
    Ok(())
}

pub fn show_config(config: &Config, store_file: &Path) {
    println!("Current config:");
    println!("  Store file: {}", store_file.display());
    println!("  Log dir:    {}", config.log_dir.display());
    println!("  Log level:  {}", config.log_level);
    println!();
    match get_config_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (no config directory available)"),
    }
}
