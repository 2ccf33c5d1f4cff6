//! Records returned by the narrative, trend and launch data sources.

use compact_str::CompactString;
use serde::{Deserialize, Deserializer, Serialize};

/// Ticker symbol of a coin (e.g. "DOGE2").
pub type Ticker = CompactString;

/// Narrative category every source is queried for.
pub const MEMECOIN_CATEGORY: &str = "memecoins";

/// Only the top of the trending list is considered.
pub const TRENDING_TOP_N: usize = 5;

/// 24h social-volume change (percent) a trending coin must exceed.
pub const SOCIAL_SPIKE_PCT: f64 = 100.0;

/// Follower count an influencer must exceed for a launch to matter.
pub const MIN_INFLUENCER_FOLLOWERS: u64 = 50_000;

/// How far back the launch scan looks, in hours.
pub const LAUNCH_LOOKBACK_HOURS: u32 = 1;

fn unknown_ticker() -> Ticker {
    CompactString::new("UNKNOWN")
}

fn unknown_influencer() -> String {
    "Unknown".to_string()
}

fn ticker_or_unknown<'de, D>(deserializer: D) -> Result<Ticker, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Ticker>::deserialize(deserializer)?.unwrap_or_else(unknown_ticker))
}

fn influencer_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_influencer))
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integer or float count; negative and null read as zero.
fn count_from_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = number_or_zero(deserializer)?;
    Ok(if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    })
}

/// Sector-level narrative metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NarrativeMetrics {
    /// Current activity relative to baseline (1.0 = normal).
    #[serde(default)]
    pub momentum: f64,
    /// Absolute social mention volume.
    #[serde(default)]
    pub social_volume: f64,
}

/// One entry of a ranked trending list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCoin {
    #[serde(default = "unknown_ticker", deserialize_with = "ticker_or_unknown")]
    pub symbol: Ticker,
    /// Percentage change of social volume over 24h (150.0 = +150%).
    #[serde(default, deserialize_with = "number_or_zero")]
    pub social_volume_24h_change: f64,
}

impl TrendingCoin {
    pub fn new(symbol: &str, social_volume_24h_change: f64) -> Self {
        Self {
            symbol: CompactString::new(symbol),
            social_volume_24h_change,
        }
    }

    /// Social volume more than doubled in the last day.
    #[inline]
    pub fn is_spiking(&self) -> bool {
        self.social_volume_24h_change > SOCIAL_SPIKE_PCT
    }
}

/// A freshly launched token attributed to an influencer post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    #[serde(default = "unknown_ticker", deserialize_with = "ticker_or_unknown")]
    pub ticker: Ticker,
    #[serde(
        default = "unknown_influencer",
        deserialize_with = "influencer_or_unknown"
    )]
    pub influencer_handle: String,
    #[serde(default, deserialize_with = "count_from_number")]
    pub followers: u64,
    /// Market capitalization in USD.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub market_cap: f64,
    /// Pool liquidity in USD.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub liquidity: f64,
    /// Link to the post that announced the launch.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub tweet_url: String,
}

impl Launch {
    /// Launch promoted by an account above [`MIN_INFLUENCER_FOLLOWERS`].
    #[inline]
    pub fn has_major_influencer(&self) -> bool {
        self.followers > MIN_INFLUENCER_FOLLOWERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trending_coin_defaults() {
        let coin: TrendingCoin = serde_json::from_str("{}").unwrap();
        assert_eq!(coin, TrendingCoin::new("UNKNOWN", 0.0));
    }

    #[test]
    fn test_trending_coin_spike_is_strict() {
        assert!(TrendingCoin::new("DOGE2", 150.0).is_spiking());
        assert!(!TrendingCoin::new("DOGE2", 100.0).is_spiking());
        assert!(!TrendingCoin::new("DOGE2", -20.0).is_spiking());
    }

    #[test]
    fn test_launch_defaults() {
        let launch: Launch = serde_json::from_str(r#"{"followers": 12}"#).unwrap();
        assert_eq!(launch.ticker, "UNKNOWN");
        assert_eq!(launch.influencer_handle, "Unknown");
        assert_eq!(launch.followers, 12);
        assert_eq!(launch.market_cap, 0.0);
        assert_eq!(launch.tweet_url, "");
    }

    #[test]
    fn test_launch_influencer_threshold() {
        let mut launch: Launch = serde_json::from_str("{}").unwrap();
        launch.followers = 40_000;
        assert!(!launch.has_major_influencer());
        launch.followers = 50_000;
        assert!(!launch.has_major_influencer());
        launch.followers = 50_001;
        assert!(launch.has_major_influencer());
    }

    #[test]
    fn test_launch_followers_accepts_float() {
        let launches: Vec<Launch> = serde_json::from_str(
            r#"[{"ticker": "CATZ", "followers": 120000.0}, {"ticker": "OK", "followers": 60000}]"#,
        )
        .unwrap();
        assert_eq!(launches.len(), 2);
        assert_eq!(launches[0].followers, 120_000);
        assert!(launches[0].has_major_influencer());
        assert_eq!(launches[1].followers, 60_000);
    }

    #[test]
    fn test_launch_nulls_fall_back_to_defaults() {
        let launch: Launch = serde_json::from_str(
            r#"{"ticker": null, "influencer_handle": null, "followers": null,
                "market_cap": null, "liquidity": 1500.5, "tweet_url": null}"#,
        )
        .unwrap();
        assert_eq!(launch.ticker, "UNKNOWN");
        assert_eq!(launch.influencer_handle, "Unknown");
        assert_eq!(launch.followers, 0);
        assert_eq!(launch.market_cap, 0.0);
        assert_eq!(launch.liquidity, 1500.5);
        assert_eq!(launch.tweet_url, "");
    }

    #[test]
    fn test_negative_followers_read_as_zero() {
        let launch: Launch = serde_json::from_str(r#"{"followers": -5}"#).unwrap();
        assert_eq!(launch.followers, 0);
    }

    #[test]
    fn test_trending_null_symbol_does_not_poison_list() {
        let coins: Vec<TrendingCoin> = serde_json::from_str(
            r#"[{"symbol": "DOGE2", "social_volume_24h_change": 150},
                {"symbol": null, "social_volume_24h_change": null}]"#,
        )
        .unwrap();
        assert_eq!(
            coins,
            vec![
                TrendingCoin::new("DOGE2", 150.0),
                TrendingCoin::new("UNKNOWN", 0.0)
            ]
        );
    }

    #[test]
    fn test_narrative_metrics_ignores_extra_fields() {
        let metrics: NarrativeMetrics =
            serde_json::from_str(r#"{"momentum": 1.4, "social_volume": 900, "rank": 3}"#)
                .unwrap();
        assert_eq!(
            metrics,
            NarrativeMetrics {
                momentum: 1.4,
                social_volume: 900.0
            }
        );
    }
}
