//! Configuration types and parsing for mariposa.yml
//!
//! Every setting can come from four places. [`Settings::resolve`] applies
//! them highest first: command-line flag, environment variable (both arrive
//! as [`SettingsOverrides`]), project file, built-in default.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default project file name
pub const CONFIG_FILE_NAME: &str = "mariposa.yml";

const DEFAULT_CONNECTION: &str = ":memory:";

const DEFAULT_DIRECTORY: &str = ".";

/// Backend engine selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// DuckDB, embedded and file-backed (default)
    #[default]
    DuckDb,
    /// PostgreSQL
    Postgres,
    /// MySQL / MariaDB
    Mysql,
}

impl Engine {
    /// All engines, in help order
    pub const ALL: [Engine; 3] = [Engine::DuckDb, Engine::Postgres, Engine::Mysql];
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::DuckDb => write!(f, "duckdb"),
            Engine::Postgres => write!(f, "postgres"),
            Engine::Mysql => write!(f, "mysql"),
        }
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "duckdb" => Ok(Engine::DuckDb),
            "postgres" | "postgresql" => Ok(Engine::Postgres),
            "mysql" | "mariadb" => Ok(Engine::Mysql),
            other => Err(format!(
                "unknown engine '{}' (expected one of: {})",
                other,
                Engine::ALL
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Project configuration from mariposa.yml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Backend engine
    #[serde(default)]
    pub engine: Option<Engine>,

    /// Connection descriptor for the engine
    #[serde(default)]
    pub connection: Option<String>,

    /// Directory holding the migrations, relative to the config file
    #[serde(default)]
    pub directory: Option<String>,

    /// PostgreSQL schema to put on the search path
    #[serde(default)]
    pub schema: Option<String>,

    /// Allow migrations older than the latest applied one to run
    #[serde(default)]
    pub out_of_order: Option<bool>,
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// A relative `directory` is resolved against the file's parent.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;

        if let (Some(dir), Some(parent)) = (&config.directory, path.parent()) {
            if Path::new(dir).is_relative() {
                config.directory = Some(parent.join(dir).display().to_string());
            }
        }
        Ok(config)
    }

    /// Load `mariposa.yml` from a directory if it exists
    pub fn load_optional_from_dir(dir: &Path) -> CoreResult<Option<Self>> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.connection.as_deref().is_some_and(str::is_empty) {
            return Err(CoreError::ConfigInvalid {
                message: "connection cannot be empty".to_string(),
            });
        }
        if self.directory.as_deref().is_some_and(str::is_empty) {
            return Err(CoreError::ConfigInvalid {
                message: "directory cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Values supplied by flags or environment variables
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub engine: Option<Engine>,
    pub connection: Option<String>,
    pub directory: Option<PathBuf>,
    pub schema: Option<String>,
    /// `None` defers to the project file
    pub out_of_order: Option<bool>,
    pub dry_run: bool,
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub engine: Engine,
    pub connection: String,
    pub directory: PathBuf,
    pub schema: Option<String>,
    pub out_of_order: bool,
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            connection: DEFAULT_CONNECTION.to_string(),
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            schema: None,
            out_of_order: false,
            dry_run: false,
        }
    }
}

impl Settings {
    /// Layer overrides over the project file over the defaults
    pub fn resolve(overrides: SettingsOverrides, config: Option<&Config>) -> Self {
        let defaults = Settings::default();
        let file = config.cloned().unwrap_or_default();

        Self {
            engine: overrides.engine.or(file.engine).unwrap_or(defaults.engine),
            connection: overrides
                .connection
                .or(file.connection)
                .unwrap_or(defaults.connection),
            directory: overrides
                .directory
                .or(file.directory.map(PathBuf::from))
                .unwrap_or(defaults.directory),
            schema: overrides.schema.or(file.schema),
            out_of_order: overrides
                .out_of_order
                .or(file.out_of_order)
                .unwrap_or(false),
            dry_run: overrides.dry_run,
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
