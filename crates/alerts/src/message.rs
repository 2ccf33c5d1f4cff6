//! Alert message formatting.
//!
//! Messages are Telegram HTML. Anything that comes from an external API is
//! escaped before it is interpolated.

use chrono::{DateTime, Utc};
use heska_core::{Chain, Launch, NarrativeMetrics, SectorState, TrendingCoin, MEMECOIN_CATEGORY};
use teloxide::utils::html::escape;

/// Sent once when the agent starts watching.
pub fn started_message() -> String {
    "🚀 <b>Heska Agent started</b> - monitoring meme narratives".to_string()
}

/// Sent once on graceful shutdown.
pub fn stopped_message() -> String {
    "🛑 <b>Heska Agent stopped</b>".to_string()
}

/// Sector heating up (HOT or WARMING).
pub fn sector_heat_message(state: SectorState, metrics: &NarrativeMetrics) -> String {
    format!(
        "🔥 <b>Heska | {} {}</b>\n\
         Momentum: {:.2}x | Social volume rising\n\
         Sharpe shows {} narrative heating up.",
        MEMECOIN_CATEGORY.to_uppercase(),
        state,
        metrics.momentum,
        MEMECOIN_CATEGORY
    )
}

/// Trending coin whose social volume exploded.
pub fn trending_coin_message(coin: &TrendingCoin) -> String {
    format!(
        "🆕 <b>Heska | NEW HOT MEME: ${}</b>\n\
         Social volume +{:.0}% in 24h\n\
         Contributors surging | Trend: UP\n\
         Check liquidity and holder distribution before entering.",
        escape(&coin.symbol),
        coin.social_volume_24h_change
    )
}

/// Influencer-driven launch on `chain`.
pub fn launch_message(launch: &Launch, chain: Chain) -> String {
    format!(
        "⚡ <b>Heska | NEW {} MEME: ${}</b>\n\
         From @{} ({}k followers)\n\
         MC: ${}k | Liq: ${}k\n\
         Tweet: {}",
        chain.short_name(),
        escape(&launch.ticker),
        escape(&launch.influencer_handle),
        thousands(launch.followers as f64),
        thousands(launch.market_cap),
        thousands(launch.liquidity),
        escape(&launch.tweet_url)
    )
}

/// Append the alert timestamp footer.
pub fn with_timestamp(message: &str, now: DateTime<Utc>) -> String {
    format!("{}\n\n⏰ {}", message, now.format("%Y-%m-%d %H:%M:%S UTC"))
}

/// Whole thousands, e.g. 125_400 -> "125".
fn thousands(value: f64) -> String {
    format!("{:.0}", value / 1000.0)
}
