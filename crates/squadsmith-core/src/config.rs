// Configuration loading and parsing (squadsmith.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "squadsmith.toml";

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
// squadsmith.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub squad: SquadConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub data: DataPaths,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SquadConfig {
    /// Budget for the full squad, bench included, in millions.
    pub total_budget: f64,
    /// Money held back for the substitutes.
    pub bench_value: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    /// 0 means unlimited.
    #[serde(default)]
    pub node_limit: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub bootstrap: String,
    pub shortlist: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "squadsmith=info,warn".into(),
        }
    }
}

impl Config {
    /// Budget left for the starting XI once the bench is paid for.
    pub fn xi_budget(&self) -> f64 {
        xi_budget(self.squad.total_budget, self.squad.bench_value)
    }

    pub fn node_limit(&self) -> Option<u64> {
        match self.search.node_limit {
            0 => None,
            n => Some(n),
        }
    }
}

/// `max(0, total - bench)`.
pub fn xi_budget(total_budget: f64, bench_value: f64) -> f64 {
    (total_budget - bench_value).max(0.0)
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/squadsmith.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config_in` does.
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

/// Copy `defaults/squadsmith.toml` to `config/` unless a config file is
/// already there. Returns the written path, or `None` when nothing was
/// copied. An existing `config/squadsmith.toml` is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {CONFIG_FILE} in {}/config or {}/defaults; \
                 run from the project root or pass --config-dir",
                base_dir.display(),
                base_dir.display()
            ),
        });
    }

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    })?;

    Ok(Some(target))
}

/// Copy the default config into `base_dir/config/` if missing, then load.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let total = config.squad.total_budget;
    if !total.is_finite() || total <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "squad.total_budget".into(),
            message: format!("must be a finite number > 0, got {total}"),
        });
    }

    let bench = config.squad.bench_value;
    if !bench.is_finite() || !(0.0..=total).contains(&bench) {
        return Err(ConfigError::ValidationError {
            field: "squad.bench_value".into(),
            message: format!("must be between 0 and squad.total_budget ({total}), got {bench}"),
        });
    }

    let path_fields: &[(&str, &str)] = &[
        ("data.bootstrap", config.data.bootstrap.as_str()),
        ("data.shortlist", config.data.shortlist.as_str()),
    ];
    for (name, val) in path_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
