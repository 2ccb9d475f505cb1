//! Configuration management for the fraud dashboard

use anyhow::{bail, Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

/// Synthetic data configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Number of transactions generated at start-up
    pub count: usize,
    /// Fixed seed for reproducible sessions (entropy when absent)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Days before now that timestamps are spread across
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

fn default_lookback_days() -> u32 {
    30
}

/// Initial dashboard selectors
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Alert threshold on the stacked score
    pub threshold: f64,
    /// Date range label ("Last 24h", "Last 7d", "Last 30d")
    #[serde(default = "default_date_range")]
    pub date_range: String,
    /// Alerts per trend bucket the analyst team can absorb
    #[serde(default = "default_analyst_capacity")]
    pub analyst_capacity: u32,
    /// Initial search text
    #[serde(default)]
    pub search_query: String,
}

fn default_date_range() -> String {
    "Last 24h".to_string()
}

fn default_analyst_capacity() -> u32 {
    18
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Reject values the dashboard cannot start from
    pub fn validate(&self) -> Result<()> {
        if self.generator.count == 0 {
            bail!("generator.count must be positive");
        }
        if !(0.0..=1.0).contains(&self.dashboard.threshold) {
            bail!(
                "dashboard.threshold must be within [0, 1], got {}",
                self.dashboard.threshold
            );
        }
        if self.generator.lookback_days == 0 {
            bail!("generator.lookback_days must be positive");
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            bail!(
                "logging.format must be \"json\" or \"pretty\", got {:?}",
                self.logging.format
            );
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig {
                count: 200,
                seed: None,
                lookback_days: default_lookback_days(),
            },
            dashboard: DashboardConfig {
                threshold: 0.5,
                date_range: default_date_range(),
                analyst_capacity: default_analyst_capacity(),
                search_query: String::new(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
