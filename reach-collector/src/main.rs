use std::path::PathBuf;
use std::process::ExitCode;

use reach_collector::config::CollectorConfig;
use reach_collector::fetch::TokioSleeper;
use reach_collector::navitime::{MockReachableSource, NavitimeClient};
use reach_collector::pipeline::{self, RunSummary};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match collect().await {
        Ok(summary) => {
            info!(
                rows = summary.rows,
                stations = summary.stations,
                flat = %summary.flat_path.display(),
                structured = %summary.structured_path.display(),
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "collection failed");
            ExitCode::FAILURE
        }
    }
}

async fn collect() -> Result<RunSummary, Box<dyn std::error::Error>> {
    let mut config = match std::env::var_os("REACH_CONFIG") {
        Some(path) => {
            info!(path = ?path, "loading config");
            CollectorConfig::load(path)?
        }
        None => CollectorConfig::default(),
    };

    if let Some(dir) = std::env::var_os("REACH_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    // Replay recorded responses instead of calling the live service
    if let Some(dir) = std::env::var_os("REACH_MOCK_DIR") {
        let source = MockReachableSource::new(&dir)?;
        info!(dir = ?dir, recordings = source.len(), "replaying recorded responses");
        return Ok(pipeline::run(&config, source, TokioSleeper).await?);
    }

    let client = NavitimeClient::new(config.navitime_config())?;
    info!(endpoint = %client.base_url(), "querying live service");
    Ok(pipeline::run(&config, client, TokioSleeper).await?)
}
