//! JSON artifact writer.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::aggregate::StructuredOutput;
use crate::domain::FlatRow;

use super::error::OutputError;

/// File name of the flat row dump.
pub const FLAT_FILE: &str = "reachable_flat.json";

/// File name of the aggregated station index.
pub const STRUCTURED_FILE: &str = "reachable_structured.json";

/// Outcome of writing both artifacts. Each write succeeds or fails on its own.
#[derive(Debug)]
pub struct WriteReport {
    pub flat: Result<PathBuf, OutputError>,
    pub structured: Result<PathBuf, OutputError>,
}

impl WriteReport {
    /// Both paths, or the first failure.
    pub fn into_result(self) -> Result<(PathBuf, PathBuf), OutputError> {
        Ok((self.flat?, self.structured?))
    }
}

/// Writes the run's artifacts into one directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the artifacts go to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the flat rows to `reachable_flat.json`.
    pub fn write_flat(&self, rows: &[FlatRow]) -> Result<PathBuf, OutputError> {
        let path = self.write_json(FLAT_FILE, rows)?;
        info!(path = %path.display(), rows = rows.len(), "wrote flat rows");
        Ok(path)
    }

    /// Write the station index to `reachable_structured.json`.
    pub fn write_structured(&self, output: &StructuredOutput) -> Result<PathBuf, OutputError> {
        let path = self.write_json(STRUCTURED_FILE, output)?;
        info!(
            path = %path.display(),
            stations = output.stations_by_id.len(),
            "wrote structured output"
        );
        Ok(path)
    }

    /// Write both artifacts. A failure on one does not stop the other.
    pub fn write_all(&self, rows: &[FlatRow], output: &StructuredOutput) -> WriteReport {
        WriteReport {
            flat: self.write_flat(rows),
            structured: self.write_structured(output),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf, OutputError> {
        let path = self.dir.join(name);

        std::fs::create_dir_all(&self.dir).map_err(|source| OutputError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let json = serde_json::to_string_pretty(value).map_err(|source| OutputError::Serialize {
            path: path.clone(),
            source,
        })?;

        // Write beside the target and rename, so readers never see a partial file
        let tmp = self.dir.join(format!(".{name}.tmp"));
        std::fs::write(&tmp, json).map_err(|source| OutputError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| {
            let _ = std::fs::remove_file(&tmp);
            OutputError::Write {
                path: path.clone(),
                source,
            }
        })?;

        Ok(path)
    }
}
