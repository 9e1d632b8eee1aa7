//! Parallel simulation execution using rayon.
//!
//! Every parameter set becomes its own [SimulationRun] with its own world
//! and random stream, so trials share no state.

use ems_core::error::ConfigError;
use ems_core::simulation::SimulationRun;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::error::ExperimentError;
use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

/// Run one parameter set to termination.
pub fn run_single_simulation(param_set: &ParameterSet) -> Result<SimulationResult, ConfigError> {
    let params = param_set.scenario_params();
    let policy = params.selection_policy;
    let report = SimulationRun::new(params)?.run();
    tracing::debug!(
        experiment = %param_set.experiment_id,
        run = param_set.run_id,
        total_survival = report.total_survival_probability,
        "trial finished"
    );
    Ok(SimulationResult::from_report(policy, param_set.seed, &report))
}

/// Run multiple simulations in parallel with a progress bar.
///
/// Results come back in the order of `parameter_sets`.
pub fn run_parallel_experiments(
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
) -> Result<Vec<SimulationResult>, ExperimentError> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Run multiple simulations in parallel, optionally showing a progress bar.
///
/// `num_threads` of `None` uses rayon's default pool size. The first
/// invalid scenario aborts the sweep.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<SimulationResult>, ExperimentError> {
    let total = parameter_sets.len();
    let pb = (show_progress && total > 0).then(|| {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    });

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    tracing::info!(runs = total, threads = pool.current_num_threads(), "starting sweep");
    let results: Result<Vec<SimulationResult>, ConfigError> = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_simulation(param_set);
                if let Some(ref progress_bar) = pb {
                    progress_bar.inc(1);
                }
                result
            })
            .collect()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    let results = results?;
    let stalled = results.iter().filter(|r| !r.completed).count();
    if stalled > 0 {
        tracing::warn!(stalled, runs = total, "some runs stalled");
    }
    Ok(results)
}
