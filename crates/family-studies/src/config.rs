//! Runtime configuration.
//!
//! Defaults, then `FAMILY_STUDIES_*` environment variables
//! (e.g. `FAMILY_STUDIES_LOG_FILTER=family_studies=debug`).

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FAMILY_STUDIES";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FamilyStudiesConfig {
    /// SQLite database file.
    pub database_path: String,
    /// `tracing` filter directives.
    pub log_filter: String,
    /// Log format: "compact" or "json".
    pub log_format: String,
}

impl Default for FamilyStudiesConfig {
    fn default() -> Self {
        Self {
            database_path: "family-studies.db".to_string(),
            log_filter: "info".to_string(),
            log_format: "compact".to_string(),
        }
    }
}

impl FamilyStudiesConfig {
    /// Load from defaults and the process environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from defaults overlaid with the given environment source.
    pub fn load_from(environment: config::Environment) -> anyhow::Result<Self> {
        let defaults_json = serde_json::to_string(&Self::default())
            .with_context(|| "failed to serialize defaults")?;
        let settings = config::Config::builder()
            .add_source(
                config::File::from_str(&defaults_json, config::FileFormat::Json).required(false),
            )
            .add_source(environment)
            .build()
            .with_context(|| "failed to load configuration")?;
        let cfg: FamilyStudiesConfig = settings
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn log_format(&self) -> anyhow::Result<LogFormat> {
        self.log_format.parse()
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.database_path.trim().is_empty() {
            anyhow::bail!("database_path must not be empty");
        }
        self.log_format()?;
        crate::logging::parse_filter(&self.log_filter)?;
        Ok(())
    }
}
