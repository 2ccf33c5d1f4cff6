//! Application configuration loaded from the environment.

use heska_core::Chain;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Minutes between scan cycles when `SCAN_INTERVAL_MINUTES` is unset.
pub const DEFAULT_SCAN_INTERVAL_MINUTES: u64 = 5;

/// Largest interval whose length in seconds still fits a `u64`.
pub const MAX_SCAN_INTERVAL_MINUTES: u64 = u64::MAX / 60;

/// Social volume a HOT sector must exceed when `SOCIAL_THRESHOLD` is unset.
pub const DEFAULT_SOCIAL_THRESHOLD: u64 = 1000;

/// Chains monitored when `CHAINS` is unset.
pub const DEFAULT_CHAINS: &[Chain] = &[Chain::Solana];

const REQUIRED: [&str; 4] = [
    "SHARPE_API_KEY",
    "LUNARCRUSH_API_KEY",
    "TELEGRAM_BOT_TOKEN",
    "TELEGRAM_CHAT_ID",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "Missing required environment variables: {}\nPlease create a .env file with these values.",
        .0.join(", ")
    )]
    Missing(Vec<&'static str>),
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Optional base-URL overrides for the external APIs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub sharpe: Option<String>,
    pub lunarcrush: Option<String>,
    pub xscanr: Option<String>,
}

/// Agent configuration. Loaded once at startup and never mutated.
#[derive(Clone)]
pub struct AgentConfig {
    pub sharpe_api_key: String,
    pub lunarcrush_api_key: String,
    pub telegram_bot_token: String,
    /// Numeric chat id or `@channel` username.
    pub telegram_chat_id: String,
    pub scan_interval_minutes: u64,
    pub social_threshold: u64,
    /// Chains to monitor.
    pub chains: Vec<Chain>,
    pub endpoints: Endpoints,
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("sharpe_api_key", &"<redacted>")
            .field("lunarcrush_api_key", &"<redacted>")
            .field("telegram_bot_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("scan_interval_minutes", &self.scan_interval_minutes)
            .field("social_threshold", &self.social_threshold)
            .field("chains", &self.chains)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl AgentConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any key/value lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED
            .iter()
            .copied()
            .filter(|&name| get(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let scan_interval_minutes = match get("SCAN_INTERVAL_MINUTES") {
            Some(raw) => {
                parse_positive("SCAN_INTERVAL_MINUTES", &raw, MAX_SCAN_INTERVAL_MINUTES)?
            }
            None => DEFAULT_SCAN_INTERVAL_MINUTES,
        };

        let social_threshold = match get("SOCIAL_THRESHOLD") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                name: "SOCIAL_THRESHOLD",
                value: raw.clone(),
                reason: format!("{}", e),
            })?,
            None => DEFAULT_SOCIAL_THRESHOLD,
        };

        let chains = match get("CHAINS") {
            Some(raw) => parse_chains(&raw)?,
            None => DEFAULT_CHAINS.to_vec(),
        };

        Ok(Self {
            sharpe_api_key: get("SHARPE_API_KEY").unwrap_or_default(),
            lunarcrush_api_key: get("LUNARCRUSH_API_KEY").unwrap_or_default(),
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            telegram_chat_id: get("TELEGRAM_CHAT_ID").unwrap_or_default(),
            scan_interval_minutes,
            social_threshold,
            chains,
            endpoints: Endpoints {
                sharpe: get("SHARPE_API_URL"),
                lunarcrush: get("LUNARCRUSH_API_URL"),
                xscanr: get("XSCANR_API_URL"),
            },
        })
    }

    /// Pause between the end of one cycle and the start of the next.
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_minutes * 60)
    }

    /// Comma-separated chain list for logging.
    pub fn chains_display(&self) -> String {
        self.chains
            .iter()
            .map(|c| c.slug())
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn parse_positive(name: &'static str, raw: &str, max: u64) -> Result<u64, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason,
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(invalid("must be greater than zero".to_string())),
        Ok(value) if value > max => Err(invalid(format!("must be at most {}", max))),
        Ok(value) => Ok(value),
        Err(e) => Err(invalid(e.to_string())),
    }
}

fn parse_chains(raw: &str) -> Result<Vec<Chain>, ConfigError> {
    let chains = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Chain>().map_err(|e| ConfigError::Invalid {
                name: "CHAINS",
                value: raw.to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if chains.is_empty() {
        Ok(DEFAULT_CHAINS.to_vec())
    } else {
        Ok(chains)
    }
}
