//! The polling loop.
//!
//! Each cycle runs three independent steps in a fixed order: narrative heat
//! check, trending-coin scan, new-launch scan. A failing step is logged and
//! skipped; the other two still run. Between cycles the loop sleeps for the
//! configured interval and watches for a shutdown request.

use crate::config::AgentConfig;
use futures_util::FutureExt;
use heska_alerts::{
    launch_message, sector_heat_message, started_message, stopped_message,
    trending_coin_message, with_timestamp, AlertError, AlertSink,
};
use heska_core::{
    Chain, SectorState, Ticker, LAUNCH_LOOKBACK_HOURS, MEMECOIN_CATEGORY, TRENDING_TOP_N,
};
use heska_feeds::{FeedError, LaunchSource, NarrativeSource, TrendSource};
use std::any::Any;
use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Wait after a cycle blew up outside the guarded steps.
pub const FALLBACK_DELAY: Duration = Duration::from_secs(60);

/// Failure of a single step within a cycle.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("fetch failed: {0}")]
    Feed(#[from] FeedError),
    #[error("alert failed: {0}")]
    Alert(#[from] AlertError),
}

impl StepError {
    /// Whether the next cycle has a fair chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            StepError::Feed(e) => e.is_transient(),
            StepError::Alert(_) => true,
        }
    }
}

/// Mutable agent state, threaded through every cycle.
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    /// Last observed narrative heat.
    pub sector: SectorState,
    seen: HashSet<Ticker>,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an alert already went out for `ticker`.
    pub fn has_seen(&self, ticker: &str) -> bool {
        self.seen.contains(ticker)
    }

    /// Record `ticker` as alerted. Tickers are never removed.
    pub fn mark_seen(&mut self, ticker: Ticker) {
        self.seen.insert(ticker);
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Loop tuning derived from the configuration.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub scan_interval: Duration,
    pub social_threshold: f64,
    pub fallback_delay: Duration,
    /// Chain the launch scan watches.
    pub launch_chain: Chain,
}

impl From<&AgentConfig> for AgentSettings {
    fn from(config: &AgentConfig) -> Self {
        Self {
            scan_interval: config.scan_interval(),
            social_threshold: config.social_threshold as f64,
            fallback_delay: FALLBACK_DELAY,
            launch_chain: Chain::Solana,
        }
    }
}

/// What each step produced in one cycle. `None` means the step failed or had
/// nothing to report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub sector: Option<SectorState>,
    pub hot_coins: Option<Vec<Ticker>>,
    pub launches: Option<Vec<Ticker>>,
}

impl CycleReport {
    /// Number of coin/launch alerts sent this cycle.
    pub fn alert_count(&self) -> usize {
        self.hot_coins.as_ref().map_or(0, Vec::len) + self.launches.as_ref().map_or(0, Vec::len)
    }
}

/// Run one step, log its failure, and turn the outcome into an `Option`.
async fn guarded<T, F>(step: &'static str, fut: F) -> Option<T>
where
    F: Future<Output = Result<T, StepError>>,
{
    match fut.await {
        Ok(value) => Some(value),
        Err(e) => {
            error!(step, transient = e.is_transient(), error = %e, "Step failed");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

/// Resolves once shutdown has been requested. Never resolves if the sender
/// is gone without having asked for shutdown.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Narrative watcher wired to its data sources and alert sink.
pub struct Agent {
    settings: AgentSettings,
    narratives: Arc<dyn NarrativeSource>,
    trends: Arc<dyn TrendSource>,
    launches: Arc<dyn LaunchSource>,
    sink: Arc<dyn AlertSink>,
}

impl Agent {
    pub fn new(
        settings: AgentSettings,
        narratives: Arc<dyn NarrativeSource>,
        trends: Arc<dyn TrendSource>,
        launches: Arc<dyn LaunchSource>,
        sink: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            settings,
            narratives,
            trends,
            launches,
            sink,
        }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    async fn alert(&self, message: &str) -> Result<(), AlertError> {
        self.sink
            .send(&with_timestamp(message, chrono::Utc::now()))
            .await
    }

    /// Best-effort lifecycle message; failures are only logged.
    async fn announce(&self, message: &str) {
        if let Err(e) = self.sink.send(message).await {
            warn!(error = %e, "Failed to send lifecycle notification");
        }
    }

    /// Classify the memecoin narrative and alert when it heats up.
    ///
    /// The stored classification is overwritten whenever metrics arrive, even
    /// if the alert cannot be delivered. An empty source result leaves it as is.
    pub async fn check_narrative_heat(
        &self,
        state: &mut AgentState,
    ) -> Result<Option<SectorState>, StepError> {
        let Some(metrics) = self.narratives.narrative(MEMECOIN_CATEGORY).await? else {
            debug!("No narrative data this cycle");
            return Ok(None);
        };

        let previous = state.sector;
        let current = SectorState::classify(&metrics, self.settings.social_threshold);
        state.sector = current;

        if current.alerts_from(previous) {
            info!("Sector state changed: {} → {}", previous, current);
            self.alert(&sector_heat_message(current, &metrics)).await?;
        } else if current != previous {
            info!("Sector state changed: {} → {} (no alert)", previous, current);
        }

        Ok(Some(current))
    }

    /// Alert on top trending coins whose social volume exploded.
    pub async fn find_hot_coins(&self, state: &mut AgentState) -> Result<Vec<Ticker>, StepError> {
        let trending = self.trends.trending(MEMECOIN_CATEGORY).await?;
        let mut alerted = Vec::new();

        for coin in trending.iter().take(TRENDING_TOP_N) {
            if !coin.is_spiking() || state.has_seen(&coin.symbol) {
                continue;
            }

            self.alert(&trending_coin_message(coin)).await?;
            state.mark_seen(coin.symbol.clone());
            info!(
                ticker = %coin.symbol,
                change_pct = coin.social_volume_24h_change,
                "New hot coin detected"
            );
            alerted.push(coin.symbol.clone());
        }

        Ok(alerted)
    }

    /// Alert on fresh launches pushed by large influencer accounts.
    pub async fn scan_new_launches(
        &self,
        state: &mut AgentState,
    ) -> Result<Vec<Ticker>, StepError> {
        let chain = self.settings.launch_chain;
        let launches = self
            .launches
            .recent_launches(chain, LAUNCH_LOOKBACK_HOURS)
            .await?;
        let mut alerted = Vec::new();

        for launch in &launches {
            if !launch.has_major_influencer() || state.has_seen(&launch.ticker) {
                continue;
            }

            self.alert(&launch_message(launch, chain)).await?;
            state.mark_seen(launch.ticker.clone());
            info!(
                ticker = %launch.ticker,
                influencer = %launch.influencer_handle,
                followers = launch.followers,
                "New launch detected"
            );
            alerted.push(launch.ticker.clone());
        }

        Ok(alerted)
    }

    /// Run the three steps once, in order, regardless of individual failures.
    pub async fn run_cycle(&self, state: &mut AgentState) -> CycleReport {
        info!("=== Heska scan cycle ===");

        let sector = guarded("narrative_heat", self.check_narrative_heat(state))
            .await
            .flatten();
        let hot_coins = guarded("trending_coins", self.find_hot_coins(state)).await;
        let launches = guarded("new_launches", self.scan_new_launches(state)).await;

        CycleReport {
            sector,
            hot_coins,
            launches,
        }
    }

    /// Poll until `shutdown` flips to true, then send the stop notification.
    ///
    /// Shutdown is only observed between cycles. A panic escaping a cycle is
    /// logged and followed by the fallback delay instead of the scan interval.
    pub async fn run(&self, state: &mut AgentState, mut shutdown: watch::Receiver<bool>) {
        info!("👁️ Heska is now watching...");
        self.announce(&started_message()).await;

        loop {
            if *shutdown.borrow() {
                break;
            }

            let outcome = AssertUnwindSafe(self.run_cycle(state)).catch_unwind().await;
            let pause = match outcome {
                Ok(report) => {
                    info!(
                        sector = %state.sector,
                        alerts = report.alert_count(),
                        tracked = state.seen_count(),
                        "Cycle complete"
                    );
                    info!(
                        "Sleeping for {} minutes...",
                        self.settings.scan_interval.as_secs() / 60
                    );
                    self.settings.scan_interval
                }
                Err(panic) => {
                    error!("Error in main loop: {}", panic_message(panic.as_ref()));
                    self.settings.fallback_delay
                }
            };

            tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        info!("🛑 Heska shutting down...");
        self.announce(&stopped_message()).await;
    }
}
