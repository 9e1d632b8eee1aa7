use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ems_core::scenario::{ScenarioParams, SelectionPolicyKind};
use ems_core::simulation::SimulationRun;
use ems_experiments::config::load_scenario;
use ems_experiments::parameter_spaces::mass_casualty_trials;
use ems_experiments::{
    append_to_csv, export_to_csv, export_to_json, export_to_parquet,
    run_parallel_experiments_with_progress, summarize_by_policy, ParameterSet, SimulationResult,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "ems_core=info,ems_experiments=info";

#[derive(Parser)]
#[command(
    name = "ems_sim",
    about = "Mass-casualty EMS dispatch simulation",
    long_about = "Runs single EMS scenarios or Monte Carlo sweeps comparing\n\
                  ambulance dispatch policies by total patient survival."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scenario and print its report as JSON
    Run {
        /// Scenario JSON file (defaults to the built-in scenario)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the configured selection policy
        #[arg(long)]
        policy: Option<SelectionPolicyKind>,
        /// Override the configured random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Append the result to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compare policies over sampled mass-casualty incidents
    Sweep {
        /// Incidents to sample; every policy runs each one
        #[arg(long, default_value_t = 100)]
        trials: usize,
        /// Policies to compare
        #[arg(
            long,
            value_delimiter = ',',
            default_values_t = [SelectionPolicyKind::Random, SelectionPolicyKind::Myopic]
        )]
        policies: Vec<SelectionPolicyKind>,
        /// Worker threads (defaults to the number of cores)
        #[arg(long)]
        threads: Option<usize>,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: Option<PathBuf>,
        #[arg(long)]
        parquet: Option<PathBuf>,
        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            policy,
            seed,
            output,
        } => run(config, policy, seed, output),
        Commands::Sweep {
            trials,
            policies,
            threads,
            csv,
            json,
            parquet,
            quiet,
        } => sweep(trials, &policies, threads, csv, json, parquet, !quiet),
    }
}

fn run(
    config: Option<PathBuf>,
    policy: Option<SelectionPolicyKind>,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut params = match config {
        Some(path) => load_scenario(path)?,
        None => ScenarioParams::default(),
    };
    if let Some(policy) = policy {
        params = params.with_policy(policy);
    }
    if let Some(seed) = seed {
        params = params.with_seed(seed);
    }

    let report = SimulationRun::new(params.clone())?.run();
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(path) = output {
        let result = SimulationResult::from_report(params.selection_policy, params.random_seed, &report);
        let seed = params.random_seed;
        let set = ParameterSet::new(params, "single-run".to_string(), 0, seed);
        append_to_csv(&[result], &[set], &path)?;
        tracing::info!(path = %path.display(), "appended result");
    }
    Ok(())
}

fn sweep(
    trials: usize,
    policies: &[SelectionPolicyKind],
    threads: Option<usize>,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
    parquet: Option<PathBuf>,
    show_progress: bool,
) -> Result<(), Box<dyn Error>> {
    let parameter_sets = mass_casualty_trials(trials, policies);
    let results = run_parallel_experiments_with_progress(&parameter_sets, threads, show_progress)?;

    println!(
        "{:<10} {:>7} {:>10} {:>9} {:>9} {:>9} {:>9} {:>8}",
        "policy", "trials", "mean", "std", "min", "max", "rate", "stalled"
    );
    for summary in summarize_by_policy(&results) {
        println!(
            "{:<10} {:>7} {:>10.3} {:>9.3} {:>9.3} {:>9.3} {:>9.4} {:>8}",
            summary.policy.as_str(),
            summary.trials,
            summary.mean_total_survival,
            summary.std_total_survival,
            summary.min_total_survival,
            summary.max_total_survival,
            summary.mean_survival_rate,
            summary.stalled_runs
        );
    }

    if let Some(path) = csv {
        export_to_csv(&results, &parameter_sets, &path)?;
        tracing::info!(path = %path.display(), "wrote csv");
    }
    if let Some(path) = json {
        export_to_json(&results, &path)?;
        tracing::info!(path = %path.display(), "wrote json");
    }
    if let Some(path) = parquet {
        export_to_parquet(&results, &path)?;
        tracing::info!(path = %path.display(), "wrote parquet");
    }
    Ok(())
}
