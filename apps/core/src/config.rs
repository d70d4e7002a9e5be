use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_DIR_NAME: &str = "kapetayo";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_FILE_NAME: &str = "kapetayo.sqlite3";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub best_match_limit: usize,
    pub log_level: String,
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            store_path: base.join(STORE_FILE_NAME),
            catalog_path: None,
            best_match_limit: 6,
            log_level: "info".to_string(),
            config_path: base.join(CONFIG_FILE_NAME),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("{0}")]
    Invalid(String),
}

/// On-disk shape. Every field is optional so partial files fall back to
/// defaults field by field.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    store_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    catalog_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    best_match_limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_level: Option<String>,
}

impl From<&Config> for ConfigFile {
    fn from(value: &Config) -> Self {
        Self {
            store_path: Some(value.store_path.clone()),
            catalog_path: value.catalog_path.clone(),
            best_match_limit: Some(value.best_match_limit),
            log_level: Some(value.log_level.clone()),
        }
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.best_match_limit == 0 || cfg.best_match_limit > 50 {
        return Err("best_match_limit must be between 1 and 50".into());
    }

    if cfg.store_path.as_os_str().is_empty() {
        return Err("store_path is required".into());
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err("config_path is required".into());
    }

    if !LOG_LEVELS.contains(&cfg.log_level.as_str()) {
        return Err(format!(
            "log_level '{}' is not one of {}",
            cfg.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    Ok(())
}

/// Loads the config at `path` (or the default location). A missing file
/// yields the defaults; relative paths inside the file resolve against the
/// file's directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    if let Some(path) = path {
        config.config_path = path.to_path_buf();
    }

    let raw = match std::fs::read_to_string(&config.config_path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %config.config_path.display(), "no config file, using defaults");
            return Ok(config);
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: config.config_path.display().to_string(),
                source,
            })
        }
    };

    let file: ConfigFile = toml::from_str(&raw)?;
    let base_dir = config
        .config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    if let Some(store_path) = file.store_path {
        config.store_path = resolve(&base_dir, store_path);
    }
    if let Some(catalog_path) = file.catalog_path {
        config.catalog_path = Some(resolve(&base_dir, catalog_path));
    }
    if let Some(limit) = file.best_match_limit {
        config.best_match_limit = limit;
    }
    if let Some(level) = file.log_level {
        config.log_level = level.trim().to_ascii_lowercase();
    }

    validate(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg).map_err(ConfigError::Invalid)?;

    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let encoded = toml::to_string_pretty(&ConfigFile::from(cfg))?;
    std::fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Io {
        path: cfg.config_path.display().to_string(),
        source,
    })?;
    Ok(())
}

fn resolve(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}
