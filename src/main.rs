use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use clap::{Parser, Subcommand};
use tokio::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use privacy_index::config::Config;
use privacy_index::display::{format_percent, format_price, format_usd_compact, nice_ticks, resample};
use privacy_index::models::{privacy, CoinRecord};
use privacy_index::services::{
    market_stats, tech_breakdown, CoinCache, CoinCollector, KeyValueStore, LocalStorage,
    MemoryStorage, SampleOutcome,
};
use privacy_index::sources::{CoinGecko, SourceError};
use privacy_index::IndexEngine;

type Engine = IndexEngine<dyn KeyValueStore>;

#[derive(Parser)]
#[command(name = "privacy-index", about = "ANON20 privacy coin index")]
struct Cli {
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh on an interval and print the dashboard each cycle
    Run,
    /// Fetch once, print the dashboard, record today's sample
    Once,
    /// Print stored daily samples
    History,
    /// Delete the baseline and all daily samples
    ResetBaseline,
}

fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    if config.storage.enabled {
        let storage = LocalStorage::new(&config.storage.data_dir)?;
        tracing::info!("✓ Storage at {}", storage.path().display());
        Ok(Arc::new(storage))
    } else {
        tracing::info!("Storage disabled, keeping index state in memory");
        Ok(Arc::new(MemoryStorage::new()))
    }
}

fn print_dashboard(engine: &Engine, coins: &[CoinRecord]) {
    let now = chrono::Utc::now();
    let snapshot = engine.snapshot(coins, now);
    let stats = market_stats(coins);

    println!("\n⏱️  {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("─────────────────────────────────────────────────────────");
    println!(
        "   ANON20  {:>10.4}  {}  ({} constituents{})",
        snapshot.value,
        format_percent(Some(snapshot.change_24h)),
        snapshot.constituents.len(),
        if snapshot.launched { "" } else { ", pre-launch" }
    );
    println!(
        "   Market  {}  vol {}  {}  ({} coins)",
        format_usd_compact(stats.total_market_cap),
        format_usd_compact(stats.total_volume),
        format_percent(Some(stats.weighted_change_24h)),
        stats.coin_count
    );

    println!("\n   {:<3} {:<8} {:>14} {:>10} {:>9} {:>8} {:<20}", "#", "Symbol", "Price", "MCap", "24h", "Weight", "Tech");
    println!("   ─── ──────── ────────────── ────────── ───────── ──────── ────────────────────");
    for (i, c) in snapshot.constituents.iter().enumerate() {
        let coin = coins.iter().find(|r| r.id == c.id);
        let symbol = coin.map(|r| r.symbol.to_uppercase()).unwrap_or_else(|| c.id.clone());
        println!(
            "   {:<3} {:<8} {:>14} {:>10} {:>9} {:>7.2}% {:<20}",
            i + 1,
            symbol,
            format_price(c.price),
            format_usd_compact(c.market_cap),
            format_percent(c.change_24h),
            c.weight * 100.0,
            privacy::lookup(&c.id).tech.to_string(),
        );
    }

    if let Some(leader) = snapshot.constituents.first()
        .and_then(|c| coins.iter().find(|r| r.id == c.id))
    {
        let points = resample(leader.history_7d(), 28);
        if let (Some(lo), Some(hi)) = (
            points.iter().copied().reduce(f64::min),
            points.iter().copied().reduce(f64::max),
        ) {
            let ticks: Vec<String> = nice_ticks(lo, hi, 5).iter().map(|t| format_price(*t)).collect();
            println!("\n   {} 7d: {} points, axis {}", leader.symbol.to_uppercase(), points.len(), ticks.join(" | "));
        }
    }

    println!("\n   {:<22} {:>6} {:>10}", "Technology", "Coins", "MCap");
    for row in tech_breakdown(coins) {
        println!("   {:<22} {:>6} {:>10}", row.tech.to_string(), row.coin_count, format_usd_compact(row.market_cap));
    }
}

fn record_sample(engine: &Engine, coins: &[CoinRecord]) {
    match engine.record_daily(coins, chrono::Utc::now()) {
        Ok(SampleOutcome::Recorded(sample)) => {
            println!("💾 Daily sample {} = {:.4}", sample.date, sample.value);
        }
        Ok(outcome) => tracing::debug!("Daily sample skipped: {:?}", outcome),
        Err(e) => tracing::warn!("Failed to store daily sample: {}", e),
    }
}

async fn run_loop(
    engine: &Engine,
    collector: &CoinCollector,
    interval: Duration,
) {
    println!("\n🔄 Refreshing every {}s (Ctrl-C to stop)", interval.as_secs());

    loop {
        let wait = match collector.refresh().await {
            Ok(coins) => {
                print_dashboard(engine, &coins);
                record_sample(engine, &coins);
                interval
            }
            Err(e @ SourceError::RateLimited { .. }) => {
                let wait = e.retry_after().unwrap_or(interval);
                println!("⚠️  Rate limited, waiting {}s", wait.as_secs());
                wait
            }
            Err(e) => {
                println!("❌ {}", e);
                if let Some(coins) = collector.cache().last() {
                    tracing::info!("Showing last good data ({} coins)", coins.len());
                    print_dashboard(engine, &coins);
                }
                interval
            }
        };

        let stats = collector.get_stats();
        tracing::debug!(
            "requests={} ok={} failed={}",
            stats.total_requests.load(Ordering::Relaxed),
            stats.successful.load(Ordering::Relaxed),
            stats.failed.load(Ordering::Relaxed),
        );

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                println!("\n👋 Stopping");
                return;
            }
        }
    }
}

#[tokio::main(worker_threads = 2)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,privacy_index=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load_or_default(&cli.config)?;
    tracing::info!("✓ Configuration loaded");

    let store = open_store(&config)?;
    let engine: Engine = IndexEngine::new(&config.index, store);

    match cli.command.unwrap_or(Command::Once) {
        Command::History => {
            let history = engine.history();
            if history.is_empty() {
                println!("No daily samples stored yet");
            }
            for sample in history {
                println!("{}  {:>10.4}  ({} constituents)", sample.date, sample.value, sample.constituents);
            }
        }
        Command::ResetBaseline => {
            engine.reset()?;
            println!("✓ Baseline and daily history cleared");
        }
        Command::Once => {
            let collector = build_collector(&config)?;
            let coins = collector.collect().await?;
            print_dashboard(&engine, &coins);
            record_sample(&engine, &coins);
        }
        Command::Run => {
            let collector = build_collector(&config)?;
            run_loop(&engine, &collector, Duration::from_secs(config.refresh.interval_secs)).await;
        }
    }

    Ok(())
}

fn build_collector(config: &Config) -> Result<CoinCollector, SourceError> {
    println!("📡 Connecting to CoinGecko...");
    let source = Arc::new(CoinGecko::new(&config.provider)?);
    let cache = Arc::new(CoinCache::new(config.refresh.cache_ttl_secs));
    Ok(CoinCollector::new(source, cache))
}
