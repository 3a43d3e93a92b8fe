use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use dashboard_core::domain::format::format_currency;
use dashboard_core::domain::{MarketSnapshot, WeatherReport, WidgetState};
use dashboard_core::impls::OfflineFetcher;
use dashboard_core::{Dashboard, DashboardBuilder, DashboardConfig};

/// Live dashboard data engine.
#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about)]
struct Args {
    /// TOML config file (DASHBOARD_* env vars still override it).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never touch the network; every widget shows fallback data.
    #[arg(long)]
    offline: bool,

    /// Load every widget once, print the snapshot as JSON and exit.
    #[arg(long)]
    once: bool,

    /// Log as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = match DashboardConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load config");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = DashboardBuilder::new(config);
    if args.offline {
        builder = builder.fetcher(Arc::new(OfflineFetcher));
    }
    let mut dashboard = match builder.build() {
        Ok(dashboard) => dashboard,
        Err(e) => {
            tracing::error!(error = %e, "failed to build dashboard");
            return ExitCode::FAILURE;
        }
    };

    if args.once {
        dashboard.refresh_all().await;
        return print_snapshot(&dashboard);
    }

    dashboard.start().await;
    let watcher = tokio::spawn(log_updates(
        dashboard.market().subscribe(),
        dashboard.weather().subscribe(),
    ));

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
    tracing::info!("shutting down");
    watcher.abort();
    dashboard.shutdown().await;
    ExitCode::SUCCESS
}

fn print_snapshot(dashboard: &Dashboard) -> ExitCode {
    match serde_json::to_string_pretty(&dashboard.snapshot()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to encode snapshot");
            ExitCode::FAILURE
        }
    }
}

/// Log one line per committed widget update.
async fn log_updates(
    mut market: watch::Receiver<WidgetState<MarketSnapshot>>,
    mut weather: watch::Receiver<WidgetState<WeatherReport>>,
) {
    loop {
        tokio::select! {
            changed = market.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = market.borrow_and_update().clone();
                if !state.loading {
                    tracing::info!(
                        widget = "market",
                        origin = ?state.origin,
                        revenue = %format_currency(state.data.stats.revenue as f64),
                        conversion_rate = state.data.stats.conversion_rate,
                        "updated"
                    );
                }
            }
            changed = weather.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = weather.borrow_and_update().clone();
                if !state.loading {
                    tracing::info!(
                        widget = "weather",
                        origin = ?state.origin,
                        temp = state.data.current.temp,
                        description = %state.data.current.description,
                        "updated"
                    );
                }
            }
        }
    }
}
