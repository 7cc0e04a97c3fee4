// Configuration loading and parsing (dashboard.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use gridstats_core::catalog::{Category, SeasonKind, Selection, SUPPORTED_YEARS};
use gridstats_core::schema;
use gridstats_core::view::{SortDirection, ViewState};
use serde::Deserialize;
use thiserror::Error;

/// File name of the dashboard config inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub view: ViewConfig,
    #[serde(default)]
    pub leaders: LeadersConfig,
}

/// Where exports are read from.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Static file server root, e.g. `http://localhost:5173/data`.
    pub base_url: String,
    /// Directory used by the local-load key.
    pub local_dir: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// Initial table selection and sort.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    pub category: Category,
    pub season: SeasonKind,
    pub year: u16,
    #[serde(default = "default_sort_key")]
    pub sort_key: String,
    #[serde(default = "default_sort_direction")]
    pub sort_direction: SortDirection,
}

fn default_sort_key() -> String {
    schema::RANK.to_string()
}

fn default_sort_direction() -> SortDirection {
    SortDirection::Ascending
}

impl ViewConfig {
    pub fn selection(&self) -> Selection {
        Selection::new(self.category, self.season, self.year)
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            sort_key: self.sort_key.clone(),
            sort_direction: self.sort_direction,
            ..ViewState::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeadersConfig {
    pub year: u16,
}

impl Default for LeadersConfig {
    fn default() -> Self {
        LeadersConfig {
            year: SUPPORTED_YEARS[0],
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/dashboard.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Existing files are never
/// overwritten.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the workspace root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = config.source.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(invalid(
            "source.base_url",
            format!("must be an http:// or https:// URL, got {url:?}"),
        ));
    }

    if config.source.timeout_secs == 0 {
        return Err(invalid("source.timeout_secs", "must be greater than 0"));
    }

    for (field, year) in [("view.year", config.view.year), ("leaders.year", config.leaders.year)] {
        if !SUPPORTED_YEARS.contains(&year) {
            return Err(invalid(
                field,
                format!("must be one of {SUPPORTED_YEARS:?}, got {year}"),
            ));
        }
    }

    let category = config.view.category;
    let key = config.view.sort_key.as_str();
    if !schema::has_column(schema::columns_for(category), key)
        && !schema::has_column(schema::advanced_for(category), key)
    {
        return Err(invalid(
            "view.sort_key",
            format!("`{key}` is not a {} column", category.as_str()),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
