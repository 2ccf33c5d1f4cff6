//! REST API clients for the narrative, trend and launch sources.
//!
//! Every client shares the same shape: a `reqwest::Client` with a request
//! timeout, an overridable base URL, and JSON decoding through serde.

use crate::error::{FeedError, FeedResult};
use crate::source::{LaunchSource, NarrativeSource, TrendSource};
use async_trait::async_trait;
use heska_core::{Chain, Launch, NarrativeMetrics, TrendingCoin};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Per-request timeout for every data source.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn http_client() -> FeedResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| FeedError::ConnectionFailed(e.to_string()))
}

fn ensure_success(source_name: &'static str, response: Response) -> FeedResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FeedError::from_status(source_name, status))
    }
}

fn trim_base(url: impl Into<String>) -> String {
    let mut url = url.into();
    while url.ends_with('/') {
        url.pop();
    }
    url
}

/// Sharpe narrative analytics client.
pub struct SharpeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SharpeClient {
    pub const BASE_URL: &'static str = "https://api.sharpe.ai";
    const NAME: &'static str = "sharpe";

    pub fn new(api_key: impl Into<String>) -> FeedResult<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: Self::BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Point the client at a different host (staging, mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base(base_url);
        self
    }
}

/// Sharpe answers either with the metrics object itself or wrapped in `data`.
fn parse_narrative(body: serde_json::Value) -> FeedResult<Option<NarrativeMetrics>> {
    match body {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            parse_narrative(map.remove("data").unwrap_or_default())
        }
        other => Ok(Some(serde_json::from_value(other)?)),
    }
}

#[async_trait]
impl NarrativeSource for SharpeClient {
    async fn narrative(&self, category: &str) -> FeedResult<Option<NarrativeMetrics>> {
        let url = format!("{}/v1/narratives/{}", self.base_url, category);

        let response = self
            .http
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Sharpe: no narrative data for {}", category);
            return Ok(None);
        }

        let body: serde_json::Value = ensure_success(Self::NAME, response)?.json().await?;
        let metrics = parse_narrative(body)?;
        debug!("Sharpe: {} narrative {:?}", category, metrics);
        Ok(metrics)
    }
}

/// LunarCrush social trend client.
pub struct LunarCrushClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct LunarCrushResponse {
    #[serde(default)]
    data: Vec<TrendingCoin>,
}

impl LunarCrushClient {
    pub const BASE_URL: &'static str = "https://lunarcrush.com";
    const NAME: &'static str = "lunarcrush";

    pub fn new(api_key: impl Into<String>) -> FeedResult<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: Self::BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base(base_url);
        self
    }
}

#[async_trait]
impl TrendSource for LunarCrushClient {
    async fn trending(&self, category: &str) -> FeedResult<Vec<TrendingCoin>> {
        let url = format!(
            "{}/api4/public/category/{}/coins/v1",
            self.base_url, category
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let body: LunarCrushResponse = ensure_success(Self::NAME, response)?.json().await?;
        debug!("LunarCrush: {} trending coins in {}", body.data.len(), category);
        Ok(body.data)
    }
}

/// XScanr launch scanner client. The public endpoint needs no key.
pub struct XScanrClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum XScanrResponse {
    Bare(Vec<Launch>),
    Wrapped {
        #[serde(default)]
        launches: Vec<Launch>,
    },
}

impl XScanrClient {
    pub const BASE_URL: &'static str = "https://api.xscanr.com";
    const NAME: &'static str = "xscanr";

    pub fn new() -> FeedResult<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: Self::BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base(base_url);
        self
    }
}

#[async_trait]
impl LaunchSource for XScanrClient {
    async fn recent_launches(&self, chain: Chain, hours: u32) -> FeedResult<Vec<Launch>> {
        let url = format!("{}/v1/launches", self.base_url);
        let hours = hours.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[("chain", chain.slug()), ("hours", hours.as_str())])
            .send()
            .await?;

        let body: XScanrResponse = ensure_success(Self::NAME, response)?.json().await?;
        let launches = match body {
            XScanrResponse::Bare(launches) => launches,
            XScanrResponse::Wrapped { launches } => launches,
        };
        debug!("XScanr: {} launches on {} in last {}h", launches.len(), chain, hours);
        Ok(launches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_trim_base() {
        assert_eq!(trim_base("http://localhost:8080//"), "http://localhost:8080");
        assert_eq!(trim_base("http://localhost"), "http://localhost");
    }

    #[test]
    fn test_parse_narrative_shapes() {
        let bare = parse_narrative(json!({"momentum": 1.6, "social_volume": 1500})).unwrap();
        assert_eq!(
            bare,
            Some(NarrativeMetrics {
                momentum: 1.6,
                social_volume: 1500.0
            })
        );

        let wrapped =
            parse_narrative(json!({"data": {"momentum": 1.3, "social_volume": 10}})).unwrap();
        assert_eq!(wrapped.map(|m| m.momentum), Some(1.3));

        assert_eq!(parse_narrative(json!(null)).unwrap(), None);
        assert_eq!(parse_narrative(json!({"data": null})).unwrap(), None);
        assert!(parse_narrative(json!("hot")).is_err());
    }

    #[tokio::test]
    async fn test_sharpe_sends_key_and_parses_metrics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/narratives/memecoins"))
            .and(header("x-api-key", "sharpe-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"momentum": 1.6, "social_volume": 1500.0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SharpeClient::new("sharpe-key")
            .unwrap()
            .with_base_url(server.uri());
        let metrics = client.narrative("memecoins").await.unwrap();

        assert_eq!(
            metrics,
            Some(NarrativeMetrics {
                momentum: 1.6,
                social_volume: 1500.0
            })
        );
    }

    #[tokio::test]
    async fn test_sharpe_not_found_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = SharpeClient::new("k").unwrap().with_base_url(server.uri());
        assert_eq!(client.narrative("memecoins").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sharpe_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = SharpeClient::new("k").unwrap().with_base_url(server.uri());
        let err = client.narrative("memecoins").await.unwrap_err();
        assert!(matches!(
            err,
            FeedError::HttpStatus {
                source_name: "sharpe",
                status: 500
            }
        ));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_lunarcrush_preserves_rank_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api4/public/category/memecoins/coins/v1"))
            .and(header("authorization", "Bearer lunar-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"symbol": "DOGE2", "social_volume_24h_change": 150.0, "rank": 1},
                    {"symbol": "PEPE", "social_volume_24h_change": 12.5},
                    {"social_volume_24h_change": 400}
                ]
            })))
            .mount(&server)
            .await;

        let client = LunarCrushClient::new("lunar-key")
            .unwrap()
            .with_base_url(server.uri());
        let coins = client.trending("memecoins").await.unwrap();

        assert_eq!(
            coins,
            vec![
                TrendingCoin::new("DOGE2", 150.0),
                TrendingCoin::new("PEPE", 12.5),
                TrendingCoin::new("UNKNOWN", 400.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_lunarcrush_bad_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = LunarCrushClient::new("nope")
            .unwrap()
            .with_base_url(server.uri());
        let err = client.trending("memecoins").await.unwrap_err();
        assert!(matches!(err, FeedError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn test_xscanr_query_and_wrapped_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/launches"))
            .and(query_param("chain", "solana"))
            .and(query_param("hours", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "launches": [{
                    "ticker": "CATZ",
                    "influencer_handle": "bigcat",
                    "followers": 120000,
                    "market_cap": 250000.0,
                    "liquidity": 40000.0,
                    "tweet_url": "https://x.com/bigcat/status/1"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = XScanrClient::new().unwrap().with_base_url(server.uri());
        let launches = client.recent_launches(Chain::Solana, 1).await.unwrap();

        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].ticker, "CATZ");
        assert_eq!(launches[0].followers, 120_000);
        assert_eq!(launches[0].tweet_url, "https://x.com/bigcat/status/1");
    }

    #[tokio::test]
    async fn test_xscanr_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/launches"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"ticker": "A", "followers": 1},
                {"ticker": "B", "followers": 2}
            ])))
            .mount(&server)
            .await;

        let client = XScanrClient::new().unwrap().with_base_url(server.uri());
        let launches = client.recent_launches(Chain::Solana, 1).await.unwrap();
        let tickers: Vec<&str> = launches.iter().map(|l| l.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = XScanrClient::new().unwrap().with_base_url(server.uri());
        let err = client.recent_launches(Chain::Solana, 1).await.unwrap_err();
        assert!(matches!(err, FeedError::ParseError(_)));
    }
}
