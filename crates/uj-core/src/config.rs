//! Configuration types and parsing for upjournal.yml

use crate::dialect::Dialect;
use crate::error::{CoreError, CoreResult};
use crate::journal_table::{JournalTable, DEFAULT_TABLE_NAME};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default database path (in-memory DuckDB)
const DEFAULT_DB_PATH: &str = ":memory:";

/// Config file names searched by [`Config::load_from_dir`], in order
const CONFIG_FILE_NAMES: &[&str] = &["upjournal.yml", "upjournal.yaml"];

/// Journal configuration from upjournal.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Backend dialect of the target database
    #[serde(default)]
    pub dialect: Dialect,

    /// Schema holding the journal table (backend's current schema when unset)
    #[serde(default)]
    pub schema: Option<String>,

    /// Journal table name
    #[serde(default = "default_table")]
    pub table: String,

    /// How backend errors raised while probing for the journal are treated
    #[serde(default)]
    pub probe_errors: ProbeErrorPolicy,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Named environment overrides (e.g., dev, staging, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Treatment of backend errors during existence probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeErrorPolicy {
    /// Only "object not found" errors mean absent; everything else propagates (default)
    #[default]
    Strict,
    /// Any backend error means absent
    Lenient,
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Environment-specific overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Journal schema override
    #[serde(default)]
    pub schema: Option<String>,
}

fn default_table() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            schema: None,
            table: default_table(),
            probe_errors: ProbeErrorPolicy::default(),
            database: DatabaseConfig::default(),
            targets: HashMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
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
        Self::from_yaml(&content)
    }

    /// Load configuration from a directory containing upjournal.yml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map_or_else(
                || {
                    Err(CoreError::ConfigNotFound {
                        path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                    })
                },
                |path| Self::load(&path),
            )
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.table.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Journal table name cannot be empty".to_string(),
            });
        }
        self.journal_table(None)?;
        for name in self.targets.keys() {
            self.journal_table(Some(name))?;
        }
        Ok(())
    }

    /// Get target configuration by name
    pub fn get_target(&self, name: &str) -> CoreResult<&TargetConfig> {
        self.targets.get(name).ok_or_else(|| {
            let mut available: Vec<&str> = self.targets.keys().map(String::as_str).collect();
            available.sort_unstable();
            CoreError::ConfigInvalid {
                message: format!(
                    "Target '{}' not found. Available targets: {}",
                    name,
                    available.join(", ")
                ),
            }
        })
    }

    /// Get database configuration, optionally applying target overrides
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => Ok(self
                .get_target(name)?
                .database
                .clone()
                .unwrap_or_else(|| self.database.clone())),
            None => Ok(self.database.clone()),
        }
    }

    /// Resolve the journal table descriptor, optionally applying target overrides
    pub fn journal_table(&self, target: Option<&str>) -> CoreResult<JournalTable> {
        let schema = match target {
            Some(name) => self
                .get_target(name)?
                .schema
                .as_deref()
                .or(self.schema.as_deref()),
            None => self.schema.as_deref(),
        };
        JournalTable::new(schema, &self.table)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
