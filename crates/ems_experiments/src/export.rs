//! Result export: CSV (create or append), JSON and Parquet.

use std::path::Path;

use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/parquet.rs"]
mod parquet;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export simulation results to Parquet format.
///
/// # Errors
///
/// Returns an error if `results` is empty or if file creation or Parquet
/// writing fails.
pub fn export_to_parquet(
    results: &[SimulationResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    parquet::export_to_parquet_impl(results, file)
}

/// Export simulation results as a pretty-printed JSON array.
pub fn export_to_json(
    results: &[SimulationResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}

/// Export results paired with their parameter sets to a new CSV file.
///
/// `results[i]` must belong to `parameter_sets[i]`.
pub fn export_to_csv(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(results, parameter_sets, file, true)
}

/// Append results to a CSV file, writing the header only when the file is
/// new or empty.
pub fn append_to_csv(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let (file, is_empty) = writer_utils::open_for_append(path)?;
    csv::export_to_csv_impl(results, parameter_sets, file, is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::result;
    use ems_core::scenario::{ScenarioParams, SelectionPolicyKind};
    use tempfile::{tempdir, NamedTempFile};

    fn fixtures() -> (Vec<SimulationResult>, Vec<ParameterSet>) {
        let results = vec![
            result(SelectionPolicyKind::Random, 0, 120.5, true),
            result(SelectionPolicyKind::Myopic, 0, 160.25, false),
        ];
        let sets = results
            .iter()
            .map(|r| {
                ParameterSet::new(
                    ScenarioParams::default().with_policy(r.policy),
                    format!("exp-{}", r.policy),
                    0,
                    r.seed,
                )
            })
            .collect();
        (results, sets)
    }

    #[test]
    fn test_export_to_json() {
        let (results, _) = fixtures();
        let file = NamedTempFile::new().unwrap();
        export_to_json(&results, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("total_survival_probability"));
        assert!(contents.contains("\"myopic\""));
    }

    #[test]
    fn test_export_to_csv_writes_header_and_rows() {
        let (results, sets) = fixtures();
        let file = NamedTempFile::new().unwrap();
        export_to_csv(&results, &sets, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("experiment_id,run_id,seed,policy"));
        assert!(lines[2].contains("160.25"));
    }

    #[test]
    fn test_append_to_csv_writes_header_once() {
        let (results, sets) = fixtures();
        let dir = tempdir().unwrap();
        let path = dir.path().join("runs.csv");

        append_to_csv(&results, &sets, &path).unwrap();
        append_to_csv(&results, &sets, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 5);
        assert_eq!(contents.matches("experiment_id").count(), 1);
    }

    #[test]
    fn test_csv_rejects_mismatched_lengths() {
        let (results, sets) = fixtures();
        let file = NamedTempFile::new().unwrap();
        assert!(export_to_csv(&results, &sets[..1], file.path()).is_err());
    }

    #[test]
    fn test_export_to_parquet() {
        let (results, _) = fixtures();
        let file = NamedTempFile::new().unwrap();
        export_to_parquet(&results, file.path()).unwrap();
        assert!(std::fs::metadata(file.path()).unwrap().len() > 0);
    }

    #[test]
    fn test_empty_results_are_rejected() {
        let file = NamedTempFile::new().unwrap();
        assert!(export_to_parquet(&[], file.path()).is_err());
    }
}
