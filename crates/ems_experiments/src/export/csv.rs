use crate::metrics::SimulationResult;
use crate::parameters::{timing_label, ParameterSet};

const HEADER: [&str; 18] = [
    "experiment_id",
    "run_id",
    "seed",
    "policy",
    "travel_time_mode",
    "ambulance_count",
    "hospital_count",
    "immediate_count",
    "delayed_count",
    "total_patients",
    "patients_served",
    "total_survival_probability",
    "survival_rate",
    "completed",
    "stalled_at",
    "events_processed",
    "final_time",
    "policy_fallbacks",
];

pub(crate) fn export_to_csv_impl(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
    write_header: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if results.len() != parameter_sets.len() {
        return Err(format!(
            "Results length ({}) doesn't match parameter_sets length ({})",
            results.len(),
            parameter_sets.len()
        )
        .into());
    }

    let mut wtr = csv::Writer::from_writer(file);
    if write_header {
        wtr.write_record(HEADER)?;
    }

    for (result, param_set) in results.iter().zip(parameter_sets.iter()) {
        let params = &param_set.params;
        wtr.write_record([
            param_set.experiment_id.clone(),
            param_set.run_id.to_string(),
            param_set.seed.to_string(),
            result.policy.as_str().to_string(),
            timing_label(params.travel_time_mode).to_string(),
            params.ambulance_count.to_string(),
            params.hospitals.len().to_string(),
            result.immediate_count.to_string(),
            result.delayed_count.to_string(),
            result.total_patients.to_string(),
            result.patients_served.to_string(),
            result.total_survival_probability.to_string(),
            result.survival_rate.to_string(),
            result.completed.to_string(),
            result.stalled_at.map(|t| t.to_string()).unwrap_or_default(),
            result.events_processed.to_string(),
            result.final_time.to_string(),
            result.policy_fallbacks.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
