//! Driver configuration.
//!
//! Command-line arguments take precedence over environment variables, which
//! take precedence over defaults.

use std::path::PathBuf;

use tourney::EngineConfig;

/// Complete driver configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Scenario file to run
    pub scenario: PathBuf,
    /// Write the report here instead of stdout
    pub output: Option<PathBuf>,
    /// Pretty-print the report
    pub pretty: bool,
    /// Engine settings, seed included
    pub engine: EngineConfig,
}

impl CliConfig {
    /// Load configuration from overrides and environment variables
    ///
    /// # Errors
    ///
    /// * `MissingRequired` when no scenario file is given
    /// * `Invalid` when `TOURNEY_DRAW_SEED` is set but not a number
    pub fn from_env(
        scenario_override: Option<PathBuf>,
        seed_override: Option<u64>,
        output: Option<PathBuf>,
        pretty: bool,
    ) -> Result<Self, ConfigError> {
        let scenario = scenario_override
            .or_else(|| std::env::var("TOURNEY_SCENARIO").ok().map(PathBuf::from))
            .ok_or_else(|| ConfigError::MissingRequired {
                var: "TOURNEY_SCENARIO".to_string(),
                hint: "Pass a scenario file as the first argument".to_string(),
            })?;

        let raw_seed = std::env::var("TOURNEY_DRAW_SEED").ok();
        if let Some(raw) = raw_seed.filter(|raw| raw.parse::<u64>().is_err()) {
            return Err(ConfigError::Invalid {
                var: "TOURNEY_DRAW_SEED".to_string(),
                reason: format!("expected an unsigned integer, got {raw:?}"),
            });
        }

        let mut engine = EngineConfig::from_env();
        if let Some(seed) = seed_override {
            engine = engine.with_draw_seed(seed);
        }

        Ok(Self {
            scenario,
            output,
            pretty: pretty || parse_env_or("TOURNEY_PRETTY", false),
            engine,
        })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
