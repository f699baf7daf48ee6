//! # Configuration
//!
//! Override hierarchy: defaults → config file → CLI flags.
//!
//! ```toml
//! [storage]
//! backend = "sqlite"          # or "memory"
//! database = "estimates.db"
//!
//! [export]
//! dir = "exports"
//!
//! [logging]
//! level = "info"
//! file = "home-estimator.log"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use estimate_core::db::StorageConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::GlobalArgs;

pub const DEFAULT_CONFIG_FILE: &str = "home-estimator.toml";
pub const DEFAULT_BACKEND: &str = "sqlite";
pub const DEFAULT_DATABASE: &str = "estimates.db";
pub const DEFAULT_EXPORT_DIR: &str = ".";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// every field is optional so a config file may set as little as it likes

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    pub backend: Option<String>,
    pub database: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Concrete settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub storage: StorageConfig,
    pub export_dir: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(
        contents: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` when given; otherwise [`DEFAULT_CONFIG_FILE`] if it
    /// exists, or all defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&contents, &path)
    }

    pub fn resolve(
        self,
        overrides: &GlobalArgs,
    ) -> ResolvedConfig {
        let pick = |flag: &Option<String>, file: Option<String>, default: &str| {
            flag.clone()
                .or(file)
                .unwrap_or_else(|| default.to_string())
        };

        ResolvedConfig {
            storage: StorageConfig {
                backend: pick(&overrides.backend, self.storage.backend, DEFAULT_BACKEND),
                connection_string: pick(&overrides.db, self.storage.database, DEFAULT_DATABASE),
            },
            export_dir: overrides
                .export_dir
                .clone()
                .or(self.export.dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR)),
            log_level: pick(&overrides.log_level, self.logging.level, DEFAULT_LOG_LEVEL),
            log_file: self.logging.file,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml: &str) -> FileConfig {
        FileConfig::parse(toml, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn empty_file_resolves_to_defaults() {
        let resolved = parse("").resolve(&GlobalArgs::default());

        assert_eq!(
            resolved,
            ResolvedConfig {
                storage: StorageConfig {
                    backend: "sqlite".to_string(),
                    connection_string: "estimates.db".to_string(),
                },
                export_dir: PathBuf::from("."),
                log_level: "warn".to_string(),
                log_file: None,
            }
        );
    }

    #[test]
    fn file_values_are_used() {
        let resolved = parse(
            r#"
            [storage]
            backend = "memory"
            database = "ignored"

            [export]
            dir = "out"

            [logging]
            level = "debug"
            file = "run.log"
            "#,
        )
        .resolve(&GlobalArgs::default());

        assert_eq!(resolved.storage.backend, "memory");
        assert_eq!(resolved.export_dir, PathBuf::from("out"));
        assert_eq!(resolved.log_level, "debug");
        assert_eq!(resolved.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn flags_override_file() {
        let overrides = GlobalArgs {
            backend: Some("sqlite".to_string()),
            db: Some(":memory:".to_string()),
            export_dir: Some(PathBuf::from("elsewhere")),
            log_level: Some("trace".to_string()),
            ..GlobalArgs::default()
        };

        let resolved = parse(
            r#"
            [storage]
            backend = "memory"
            database = "file.db"
            [export]
            dir = "out"
            "#,
        )
        .resolve(&overrides);

        assert_eq!(resolved.storage.backend, "sqlite");
        assert_eq!(resolved.storage.connection_string, ":memory:");
        assert_eq!(resolved.export_dir, PathBuf::from("elsewhere"));
        assert_eq!(resolved.log_level, "trace");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = FileConfig::parse("[storage]\nengine = \"x\"", Path::new("bad.toml"));

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = FileConfig::load(Some(&dir.path().join("nope.toml")));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        fs::write(&path, "[export]\ndir = \"reports\"\n").unwrap();

        let config = FileConfig::load(Some(&path)).unwrap();

        assert_eq!(config.export.dir, Some(PathBuf::from("reports")));
    }
}
