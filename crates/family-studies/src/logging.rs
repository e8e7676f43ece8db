//! Tracing subscriber setup.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unsupported log format {:?}, expected compact or json", other),
        }
    }
}

/// Parse `tracing` filter directives.
pub fn parse_filter(filter: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| anyhow::anyhow!("invalid log filter {:?}: {}", filter, e))
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` when one was already installed (the first one stays).
pub fn init_logging(filter: &str, format: LogFormat) -> anyhow::Result<bool> {
    let filter = parse_filter(filter)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    Ok(installed.is_ok())
}
