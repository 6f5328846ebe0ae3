// Diagnostic runner: pushes a synthetic market-movers workload through every
// guard operation and prints the monitor's counters as JSON.
//
// Usage: anr-guard [config.toml]

use anr_guard::{AsyncGuard, GuardConfig, MonitoringService, OperationKind};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

const SYMBOLS: [&str; 8] = ["AAPL", "MSFT", "NVDA", "TSLA", "AMZN", "META", "GOOGL", "AMD"];

#[derive(Debug, Clone)]
struct Mover {
    symbol: String,
    price: f64,
    change_percent: f64,
}

#[derive(Debug, Serialize)]
struct Tip {
    symbol: String,
    action: &'static str,
    target_price: f64,
}

fn sample_movers(count: usize) -> Vec<Mover> {
    (0..count)
        .map(|i| Mover {
            symbol: SYMBOLS[i % SYMBOLS.len()].to_string(),
            price: 20.0 + (i % 97) as f64 * 3.5,
            change_percent: (i * 37 % 21) as f64 - 10.0,
        })
        .collect()
}

fn to_tip(mover: Mover) -> Tip {
    let action = match mover.change_percent {
        c if c >= 5.0 => "BUY",
        c if c <= -5.0 => "SELL",
        _ => "HOLD",
    };
    Tip {
        symbol: mover.symbol,
        action,
        target_price: mover.price * (1.0 + mover.change_percent / 200.0),
    }
}

fn volatility(changes: Vec<f64>) -> f64 {
    if changes.is_empty() {
        return 0.0;
    }
    let n = changes.len() as f64;
    let mean = changes.iter().sum::<f64>() / n;
    (changes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n).sqrt()
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => GuardConfig::load(&path)
            .await
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => GuardConfig::default(),
    };

    let monitor = Arc::new(MonitoringService::new(&config));
    monitor.initialize();
    let guard = AsyncGuard::new(config, Arc::clone(&monitor));

    let movers = sample_movers(500);
    let changes: Vec<f64> = movers.iter().map(|m| m.change_percent).collect();

    let tips = guard.process_list(movers, to_tip).await?;
    let buys = tips.iter().filter(|t| t.action == "BUY").count();
    info!("Generated {} tips ({buys} BUY)", tips.len());

    let sigma = guard.execute_in_isolate(volatility, changes).await?;
    info!("Change volatility: {sigma:.2}%");

    let refresh = guard
        .execute_with_timeout_for(OperationKind::Ui, async {
            Ok::<_, Infallible>(tips.first().map(|t| t.symbol.clone()))
        })
        .await?;
    info!("Top tip: {refresh:?}");

    let slow = async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok::<_, Infallible>(())
    };
    if let Err(e) = guard
        .execute_with_timeout(slow, Duration::from_millis(50))
        .await
    {
        warn!("Expected: {e}");
    }

    guard.yield_to_main_thread().await;

    let stats = monitor.get_performance_stats();
    monitor.dispose();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
