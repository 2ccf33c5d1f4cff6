//! Capability traits for the external data sources.
//!
//! Each source exposes a single read operation. The agent only talks to
//! these traits, so tests can swap in in-memory fakes.

use crate::FeedResult;
use async_trait::async_trait;
use heska_core::{Chain, Launch, NarrativeMetrics, TrendingCoin};

/// Narrative analytics for a sector (momentum and social volume).
#[async_trait]
pub trait NarrativeSource: Send + Sync {
    /// Current metrics for `category`, or `None` when the source has nothing.
    async fn narrative(&self, category: &str) -> FeedResult<Option<NarrativeMetrics>>;
}

/// Ranked list of coins trending on social media.
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Trending coins for `category`, highest ranked first.
    async fn trending(&self, category: &str) -> FeedResult<Vec<TrendingCoin>>;
}

/// Scanner for influencer-driven token launches.
#[async_trait]
pub trait LaunchSource: Send + Sync {
    /// Launches on `chain` within the last `hours`.
    async fn recent_launches(&self, chain: Chain, hours: u32) -> FeedResult<Vec<Launch>>;
}
