//! Per-run records and per-policy summaries.

use ems_core::clock::SimTime;
use ems_core::scenario::SelectionPolicyKind;
use ems_core::simulation::{RunOutcome, RunReport};
use serde::Serialize;

/// Flattened result of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub policy: SelectionPolicyKind,
    pub seed: u64,
    pub immediate_count: usize,
    pub delayed_count: usize,
    pub total_patients: usize,
    pub patients_served: usize,
    /// Sum of survival probabilities over departed patients.
    pub total_survival_probability: f64,
    /// Total survival divided by total patients.
    pub survival_rate: f64,
    pub completed: bool,
    /// Time of the last handled event when the run stalled.
    pub stalled_at: Option<SimTime>,
    pub events_processed: usize,
    pub final_time: SimTime,
    pub policy_fallbacks: usize,
}

impl SimulationResult {
    pub fn from_report(policy: SelectionPolicyKind, seed: u64, report: &RunReport) -> Self {
        let stalled_at = match report.outcome {
            RunOutcome::Completed => None,
            RunOutcome::Stalled { at } => Some(at),
        };
        Self {
            policy,
            seed,
            immediate_count: report.immediate_count,
            delayed_count: report.delayed_count,
            total_patients: report.total_patients(),
            patients_served: report.patients_served,
            total_survival_probability: report.total_survival_probability,
            survival_rate: report.survival_rate(),
            completed: report.is_complete(),
            stalled_at,
            events_processed: report.events_processed,
            final_time: report.final_time,
            policy_fallbacks: report.policy_fallbacks,
        }
    }
}

/// Aggregate over every trial of one policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicySummary {
    pub policy: SelectionPolicyKind,
    pub trials: usize,
    pub mean_total_survival: f64,
    /// Sample standard deviation; 0 for a single trial.
    pub std_total_survival: f64,
    pub min_total_survival: f64,
    pub max_total_survival: f64,
    pub mean_survival_rate: f64,
    pub stalled_runs: usize,
}

impl PolicySummary {
    fn from_results(policy: SelectionPolicyKind, results: &[&SimulationResult]) -> Self {
        let n = results.len() as f64;
        let totals: Vec<f64> = results.iter().map(|r| r.total_survival_probability).collect();
        let mean = totals.iter().sum::<f64>() / n;
        let std = if results.len() > 1 {
            (totals.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        Self {
            policy,
            trials: results.len(),
            mean_total_survival: mean,
            std_total_survival: std,
            min_total_survival: totals.iter().copied().fold(f64::INFINITY, f64::min),
            max_total_survival: totals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_survival_rate: results.iter().map(|r| r.survival_rate).sum::<f64>() / n,
            stalled_runs: results.iter().filter(|r| !r.completed).count(),
        }
    }
}

/// One summary per policy present in `results`, in configuration-enum order.
pub fn summarize_by_policy(results: &[SimulationResult]) -> Vec<PolicySummary> {
    SelectionPolicyKind::ALL
        .iter()
        .filter_map(|&policy| {
            let runs: Vec<&SimulationResult> =
                results.iter().filter(|r| r.policy == policy).collect();
            (!runs.is_empty()).then(|| PolicySummary::from_results(policy, &runs))
        })
        .collect()
}
