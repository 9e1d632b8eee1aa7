//! Monte Carlo harness for comparing EMS dispatch policies.
//!
//! Builds parameter sets (a grid over policies, fleet sizes, timing modes and
//! seeds, or the sampled mass-casualty space), runs each as an independent
//! [ems_core::simulation::SimulationRun] on a rayon pool, and turns the
//! reports into per-run records and per-policy summaries.
//!
//! # Quick Start
//!
//! ```no_run
//! use ems_core::scenario::SelectionPolicyKind;
//! use ems_experiments::{parameter_spaces, run_parallel_experiments, summarize_by_policy};
//!
//! let sets = parameter_spaces::mass_casualty_trials(
//!     50,
//!     &[SelectionPolicyKind::Random, SelectionPolicyKind::Myopic],
//! );
//! let results = run_parallel_experiments(&sets, None).expect("sweep");
//! for summary in summarize_by_policy(&results) {
//!     println!("{}: {:.2}", summary.policy, summary.mean_total_survival);
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod parameter_spaces;
pub mod parameters;
pub mod runner;

pub use error::ExperimentError;
pub use export::{append_to_csv, export_to_csv, export_to_json, export_to_parquet};
pub use metrics::{summarize_by_policy, PolicySummary, SimulationResult};
pub use parameters::{ParameterSet, ParameterSpace};
pub use runner::{run_parallel_experiments, run_parallel_experiments_with_progress};
