//! File boundaries around the streaming core.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use crate::engine::{AggregationEngine, AggregationOutcome, AggregatorConfig};
use crate::report::{to_json_bytes, Report};
use crate::AggregateError;

/// Open `path` and aggregate it line by line.
pub fn aggregate_file<P: AsRef<Path>>(
    path: P,
    config: AggregatorConfig,
) -> Result<AggregationOutcome, AggregateError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AggregateError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    info!(input = %path.display(), "aggregating");
    AggregationEngine::new(config).process(BufReader::new(file))
}

/// Encode `report` and write it to `path` in a single write.
///
/// The report is fully encoded before the file is created, so an encoding
/// failure never leaves a truncated file behind. Returns the blake3 digest
/// of the bytes written.
pub fn write_report_file<P: AsRef<Path>>(
    path: P,
    report: &Report,
) -> Result<blake3::Hash, AggregateError> {
    let path = path.as_ref();
    let bytes = to_json_bytes(report)?;
    fs::write(path, &bytes).map_err(|source| AggregateError::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    })?;

    let digest = blake3::hash(&bytes);
    info!(output = %path.display(), bytes = bytes.len(), %digest, "report written");
    Ok(digest)
}
