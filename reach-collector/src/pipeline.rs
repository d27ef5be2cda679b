//! One collection run end to end: validate, collect, aggregate, write.

use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::aggregate::aggregate;
use crate::collect::{CollectError, RangeMatrixDriver, ReachableSource};
use crate::config::{CollectorConfig, ConfigError};
use crate::fetch::Sleeper;
use crate::output::{OutputError, OutputWriter};

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub stations: usize,
    pub flat_path: PathBuf,
    pub structured_path: PathBuf,
}

/// Run the whole collection against `source`.
///
/// Nothing is written unless every matrix cell was fetched. Both artifacts
/// are attempted even if the first one fails to write.
pub async fn run<P, S>(
    config: &CollectorConfig,
    source: P,
    sleeper: S,
) -> Result<RunSummary, PipelineError>
where
    P: ReachableSource,
    S: Sleeper,
{
    config.validate()?;

    let run_config = config.run_config();
    info!(
        origins = run_config.targets.len(),
        bands = run_config.ranges.len(),
        "starting collection"
    );

    let driver = RangeMatrixDriver::new(source, sleeper).with_pacing(config.pacing());
    let rows = driver.run(&run_config.matrix()).await?;

    let structured = aggregate(&rows, &run_config, Utc::now());
    let stations = structured.stations_by_id.len();

    let writer = OutputWriter::new(&config.output_dir);
    let (flat_path, structured_path) = writer.write_all(&rows, &structured).into_result()?;

    info!(rows = rows.len(), stations, "run complete");
    Ok(RunSummary {
        rows: rows.len(),
        stations,
        flat_path,
        structured_path,
    })
}
