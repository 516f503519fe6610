use crate::error::{Error, Result};

pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;
pub const DEFAULT_CPM: f64 = 2.5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STATS_CONCURRENCY: usize = 4;

/// Everything the pipeline is parameterized on. Defaults that used to be
/// scattered constants (lookback window, CPM) live here and flow into
/// `analyze` explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    /// Trailing date range, in days, within which videos are considered.
    pub lookback_days: u32,
    /// Cost-per-thousand-views multiplier for earnings estimation.
    pub cpm: f64,
    /// Per-remote-call timeout.
    pub timeout_secs: u64,
    /// How many statistics batches may be in flight at once.
    pub stats_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            cpm: DEFAULT_CPM,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            stats_concurrency: DEFAULT_STATS_CONCURRENCY,
        }
    }
}

impl Config {
    /// Build a configuration from the environment. `YOUTUBE_API_KEY` is
    /// required; the rest fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("YOUTUBE_API_KEY")
            .map_err(|_| Error::Config("YOUTUBE_API_KEY is not set".to_string()))?;

        let mut config = Config {
            api_key,
            ..Default::default()
        };

        if let Ok(days) = std::env::var("TUBEPULSE_LOOKBACK_DAYS") {
            config.lookback_days = days
                .parse()
                .map_err(|_| Error::Config(format!("invalid TUBEPULSE_LOOKBACK_DAYS: {}", days)))?;
        }
        if let Ok(cpm) = std::env::var("TUBEPULSE_CPM") {
            config.cpm = cpm
                .parse()
                .map_err(|_| Error::Config(format!("invalid TUBEPULSE_CPM: {}", cpm)))?;
        }
        if let Ok(secs) = std::env::var("TUBEPULSE_TIMEOUT_SECS") {
            config.timeout_secs = secs
                .parse()
                .map_err(|_| Error::Config(format!("invalid TUBEPULSE_TIMEOUT_SECS: {}", secs)))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("API key must not be empty".to_string()));
        }
        if self.cpm < 0.0 {
            return Err(Error::Config(format!("CPM must not be negative: {}", self.cpm)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_cpm_is_rejected() {
        let config = Config {
            api_key: "key".to_string(),
            cpm: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_are_the_documented_ones() {
        let config = Config::default();
        assert_eq!(config.lookback_days, 90);
        assert_eq!(config.cpm, 2.5);
        assert_eq!(config.stats_concurrency, 4);
    }
}
