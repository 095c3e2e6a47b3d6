use anyhow::Result;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, Level};

use building_companion::history::{
    AccessFilter, AccessHistoryController, HistorySource, HttpHistorySource, MockHistorySource,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    Mock,
    Http,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Biometric,
    Password,
    BuildingAccess,
}

impl From<FilterArg> for AccessFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => AccessFilter::All,
            FilterArg::Biometric => AccessFilter::Biometric,
            FilterArg::Password => AccessFilter::Password,
            FilterArg::BuildingAccess => AccessFilter::BuildingAccess,
        }
    }
}

/// Print the access history as it appears in the app
#[derive(Debug, Parser)]
#[command(name = "access-history", version, about)]
struct Args {
    #[arg(short, long, value_enum, default_value = "all")]
    filter: FilterArg,

    #[arg(short, long, value_enum, default_value = "mock")]
    source: SourceArg,

    /// Access-log service URL (http source only)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Request timeout for the http source, in seconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Artificial latency of the mock source, in milliseconds
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    /// Print rows as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let source: Arc<dyn HistorySource> = match args.source {
        SourceArg::Mock => Arc::new(MockHistorySource::new(Duration::from_millis(args.latency_ms))),
        SourceArg::Http => {
            let Some(endpoint) = args.endpoint.clone() else {
                anyhow::bail!("--endpoint is required with --source http");
            };
            Arc::new(HttpHistorySource::new(endpoint, Duration::from_secs(args.timeout_secs))?)
        }
    };

    let controller = AccessHistoryController::new(source);
    controller.refresh().await;
    if let Some(message) = controller.last_error() {
        error!("{}", message);
        std::process::exit(1);
    }

    controller.set_filter(args.filter.into());
    let rows = controller.visible_rows(Utc::now());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No access events for this filter");
    }
    for row in rows {
        println!(
            "{:<18} {:<16} {:<15} {}",
            row.title,
            row.relative_time,
            row.ip_address,
            row.pills.join(" · ")
        );
    }

    Ok(())
}
