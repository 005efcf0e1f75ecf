//! Stock Watcher - Binary Entry Point
//!
//! Small terminal watcher around the library: connects to the configured
//! stream endpoint, prints status transitions and incoming notifications,
//! and shuts down cleanly on Ctrl-C.
//!
//! Configuration comes from the environment; see
//! [`StreamConfig::from_env`](stock_notify::StreamConfig::from_env).

use std::collections::HashSet;
use std::time::Duration;

use stock_notify::{StockNotifier, StreamConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StreamConfig::from_env();
    if !config.enabled {
        info!("live updates disabled (STOCK_NOTIFY_ENABLED), nothing to do");
        return;
    }
    info!(endpoint = %config.endpoint, "watching stock notifications");

    let notifier = StockNotifier::start(config);
    let mut status = notifier.status_watch();
    let mut poll = tokio::time::interval(Duration::from_secs(1));
    let mut seen: HashSet<String> = HashSet::new();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = status.borrow().describe();
                println!("{} [status] {}", clock(), line);
            }
            _ = poll.tick() => {
                for n in notifier.notifications() {
                    if seen.insert(n.id.clone()) {
                        println!(
                            "{} [stock] {} ({}): {} on hand (min {}){}",
                            clock(),
                            n.name,
                            n.code,
                            n.stock,
                            n.min_threshold,
                            if n.changed { " *" } else { "" },
                        );
                    }
                }
            }
        }
    }

    println!("{} [status] shutting down", clock());
    notifier.shutdown().await;
}

fn clock() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
