//! Example: compare dispatch policies on sampled mass-casualty incidents.
//!
//! Samples 200 incidents, runs every policy on each one in parallel, prints
//! the per-policy survival summary and writes the per-run table to CSV.

use ems_core::scenario::SelectionPolicyKind;
use ems_experiments::parameter_spaces::mass_casualty_trials;
use ems_experiments::{export_to_csv, run_parallel_experiments, summarize_by_policy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Generating mass-casualty trials...");
    let parameter_sets = mass_casualty_trials(200, &SelectionPolicyKind::ALL);
    println!("Generated {} runs", parameter_sets.len());

    let results = run_parallel_experiments(&parameter_sets, None)?;

    println!("\n=== Survival by policy ===");
    for summary in summarize_by_policy(&results) {
        println!(
            "{:<10} mean {:>8.2} ± {:<6.2} rate {:>6.2}%  stalled {}/{}",
            summary.policy.as_str(),
            summary.mean_total_survival,
            summary.std_total_survival,
            summary.mean_survival_rate * 100.0,
            summary.stalled_runs,
            summary.trials
        );
    }

    export_to_csv(&results, &parameter_sets, "policy_comparison.csv")?;
    println!("\nWrote policy_comparison.csv");
    Ok(())
}
