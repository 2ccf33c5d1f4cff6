//! Blockchain chain identifiers used for launch scanning.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chain name that did not match any known chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown chain: {0}")]
pub struct UnknownChain(pub String);

/// Blockchain network a token can launch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Solana,
    Ethereum,
    Base,
    Bsc,
    Arbitrum,
    Polygon,
    Avalanche,
}

impl Chain {
    /// Lowercase slug used in API query parameters and configuration.
    pub fn slug(self) -> &'static str {
        match self {
            Chain::Solana => "solana",
            Chain::Ethereum => "ethereum",
            Chain::Base => "base",
            Chain::Bsc => "bsc",
            Chain::Arbitrum => "arbitrum",
            Chain::Polygon => "polygon",
            Chain::Avalanche => "avalanche",
        }
    }

    /// Short ticker-style label used in alert headlines (e.g. "SOL").
    pub fn short_name(self) -> &'static str {
        match self {
            Chain::Solana => "SOL",
            Chain::Ethereum => "ETH",
            Chain::Base => "BASE",
            Chain::Bsc => "BSC",
            Chain::Arbitrum => "ARB",
            Chain::Polygon => "POL",
            Chain::Avalanche => "AVAX",
        }
    }

    /// Get all chain variants.
    pub fn all() -> &'static [Chain] {
        &[
            Chain::Solana,
            Chain::Ethereum,
            Chain::Base,
            Chain::Bsc,
            Chain::Arbitrum,
            Chain::Polygon,
            Chain::Avalanche,
        ]
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Chain {
    type Err = UnknownChain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Chain::all()
            .iter()
            .copied()
            .find(|chain| chain.slug().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownChain(name.to_string()))
    }
}
