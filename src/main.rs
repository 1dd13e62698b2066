// src/main.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

use employee_directory::{
    client::{ApiClient, DirectoryApi},
    config,
    health::{StatusPoller, StatusVariant},
    metrics::MetricsRegistry,
    perf,
    search::{SearchPanel, ViewState},
    view,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Employee directory client")]
struct Cli {
    /// YAML or JSON config file (defaults to ./directory.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print request metrics to stderr on exit
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check backend and database health once
    Status {
        #[arg(long, value_enum)]
        variant: Option<StatusVariant>,
    },
    /// Keep checking health until Ctrl+C
    Watch {
        #[arg(long, value_enum)]
        variant: Option<StatusVariant>,
        /// Seconds between polls
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
    /// Search for employees named "John Smith"
    Search,
    /// Run the backend's streamed performance test
    Perf,
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("employee_directory=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_ref())
        .await
        .context("Failed to load configuration")?;
    if cli.metrics {
        config.metrics.enabled = true;
    }
    info!("Using directory API at {}", config.base_url);

    let metrics_registry = if config.metrics.enabled {
        Some(MetricsRegistry::new()?)
    } else {
        None
    };
    let metrics = metrics_registry.as_ref().map(|r| r.collector());

    let client = ApiClient::from_config(&config, metrics.clone())
        .context("Failed to create HTTP client")?;

    match cli.command {
        Command::Status { variant } => {
            let variant = variant.unwrap_or(config.status.variant);
            let poller = StatusPoller::new(Arc::new(client), variant, metrics);
            let snapshot = poller.refresh().await;
            println!("{}", view::render_statuses(&snapshot, variant.shows_details()));
        }
        Command::Watch { variant, interval } => {
            let variant = variant.unwrap_or(config.status.variant);
            let every = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.status.interval());
            watch(Arc::new(client), variant, every, metrics).await;
        }
        Command::Search => search(Arc::new(client)).await,
        Command::Perf => {
            tokio::select! {
                result = perf::run_performance_test(&client, |event| {
                    println!("{}", view::render_event(event));
                }) => {
                    if let Err(e) = result {
                        println!("Error: {}", e);
                    }
                }
                _ = shutdown_signal() => {}
            }
        }
        Command::Config => print!("{}", config::to_yaml(&config)?),
    }

    if let Some(registry) = &metrics_registry {
        eprint!("{}", registry.gather()?);
    }

    Ok(())
}

async fn watch(
    api: Arc<dyn DirectoryApi>,
    variant: StatusVariant,
    every: Duration,
    metrics: Option<Arc<employee_directory::metrics::MetricsCollector>>,
) {
    let poller = Arc::new(StatusPoller::new(api, variant, metrics));

    let closer = poller.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        closer.close();
    });

    poller
        .run(every, |snapshot| {
            println!("{}\n", view::render_statuses(snapshot, variant.shows_details()));
        })
        .await;
}

async fn search(api: Arc<dyn DirectoryApi>) {
    let panel = SearchPanel::new(api);
    let mut rx = panel.subscribe();

    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if state != ViewState::Idle {
                println!("{}", view::render_search(&state));
            }
        }
    });

    tokio::select! {
        result = panel.search() => {
            if let Err(e) = result {
                error!("Search did not run: {}", e);
            }
        }
        _ = shutdown_signal() => panel.close(),
    }

    drop(panel);
    if let Err(e) = printer.await {
        error!("Printer task failed: {}", e);
    }
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_rejects_zero_interval() {
        let err = Cli::try_parse_from(["employee-directory", "watch", "--interval", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_watch_accepts_interval_and_variant() {
        let cli = Cli::try_parse_from([
            "employee-directory",
            "watch",
            "--interval",
            "5",
            "--variant",
            "backend-only",
        ])
        .unwrap();
        match cli.command {
            Command::Watch { variant, interval } => {
                assert_eq!(variant, Some(StatusVariant::BackendOnly));
                assert_eq!(interval, Some(5));
            }
            other => panic!("expected watch, got {:?}", other),
        }
    }
}
