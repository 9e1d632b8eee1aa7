//! Scenario files on disk.

use std::fs;
use std::path::Path;

use ems_core::scenario::ScenarioParams;

use crate::error::ExperimentError;

/// Reads and validates a JSON scenario file.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<ScenarioParams, ExperimentError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let params = ScenarioParams::from_json_str(&json)?;
    tracing::debug!(path = %path.display(), patients = params.total_patients(), "loaded scenario");
    Ok(params)
}
