//! Heska - Meme Narrative Watcher
//!
//! Polls narrative, social-trend and launch APIs and posts Telegram alerts
//! when memecoin activity crosses its thresholds.

mod agent;
mod config;

use agent::{Agent, AgentSettings, AgentState};
use clap::Parser;
use config::AgentConfig;
use heska_alerts::TelegramBot;
use heska_feeds::{FeedError, LunarCrushClient, SharpeClient, XScanrClient};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Heska CLI
#[derive(Parser, Debug)]
#[command(name = "heska")]
#[command(about = "Meme narrative watcher with Telegram alerts", long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error (RUST_LOG takes precedence)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn build_agent(config: &AgentConfig) -> Result<Agent, FeedError> {
    let mut sharpe = SharpeClient::new(config.sharpe_api_key.as_str())?;
    if let Some(url) = &config.endpoints.sharpe {
        sharpe = sharpe.with_base_url(url.as_str());
    }

    let mut lunar = LunarCrushClient::new(config.lunarcrush_api_key.as_str())?;
    if let Some(url) = &config.endpoints.lunarcrush {
        lunar = lunar.with_base_url(url.as_str());
    }

    let mut xscanr = XScanrClient::new()?;
    if let Some(url) = &config.endpoints.xscanr {
        xscanr = xscanr.with_base_url(url.as_str());
    }

    let telegram = TelegramBot::new(&config.telegram_bot_token, &config.telegram_chat_id);

    Ok(Agent::new(
        AgentSettings::from(config),
        Arc::new(sharpe),
        Arc::new(lunar),
        Arc::new(xscanr),
        Arc::new(telegram),
    ))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_level);

    let config = match AgentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("🚀 Heska Agent starting...");
    info!("  Scan interval: {} min", config.scan_interval_minutes);
    info!("  Social threshold: {}", config.social_threshold);
    info!("  Chains: {}", config.chains_display());

    let agent = match build_agent(&config) {
        Ok(agent) => agent,
        Err(e) => {
            error!("Failed to create API clients: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("  Launch scan chain: {}", agent.settings().launch_chain);

    // Ctrl+C only flips the flag; the loop notices it between cycles.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    let mut state = AgentState::new();
    agent.run(&mut state, shutdown_rx).await;

    info!(
        "👋 Heska stopped ({} tickers alerted, sector {})",
        state.seen_count(),
        state.sector
    );
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_log_level() {
        let args = Args::parse_from(["heska"]);
        assert_eq!(args.log_level, "info");

        let args = Args::parse_from(["heska", "--log-level", "debug"]);
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_build_agent_applies_overrides() {
        let config = AgentConfig::from_lookup(|name| match name {
            "SHARPE_API_KEY" | "LUNARCRUSH_API_KEY" => Some("key".to_string()),
            "TELEGRAM_BOT_TOKEN" => Some("123:abc".to_string()),
            "TELEGRAM_CHAT_ID" => Some("@heska".to_string()),
            "SCAN_INTERVAL_MINUTES" => Some("10".to_string()),
            "SHARPE_API_URL" => Some("http://127.0.0.1:1".to_string()),
            _ => None,
        })
        .unwrap();

        let agent = build_agent(&config).unwrap();
        assert_eq!(
            agent.settings().scan_interval,
            std::time::Duration::from_secs(600)
        );
    }
}
