//! Parameter variation for policy comparisons.
//!
//! A [ParameterSpace] expands a base scenario into one [ParameterSet] per
//! combination of policy, ambulance count, timing mode and seed (grid
//! search). Sampled spaces live in [crate::parameter_spaces].

use ems_core::distributions::TimingMode;
use ems_core::scenario::{ScenarioParams, SelectionPolicyKind};

/// One run of an experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    /// Base scenario parameters.
    pub params: ScenarioParams,
    /// Identifies the configuration; runs that differ only by seed share it.
    pub experiment_id: String,
    /// Run index within the experiment.
    pub run_id: usize,
    /// Seed used for this run.
    pub seed: u64,
}

impl ParameterSet {
    pub fn new(params: ScenarioParams, experiment_id: String, run_id: usize, seed: u64) -> Self {
        Self {
            params,
            experiment_id,
            run_id,
            seed,
        }
    }

    /// Scenario parameters with this run's seed applied.
    pub fn scenario_params(&self) -> ScenarioParams {
        self.params.clone().with_seed(self.seed)
    }

    pub fn policy(&self) -> SelectionPolicyKind {
        self.params.selection_policy
    }
}

/// Grid of scenario variations. Dimensions left empty fall back to the base
/// scenario's value.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    base: ScenarioParams,
    policies: Vec<SelectionPolicyKind>,
    ambulance_counts: Vec<usize>,
    timing_modes: Vec<TimingMode>,
    seeds: Vec<u64>,
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self {
            base: ScenarioParams::default(),
            policies: Vec::new(),
            ambulance_counts: Vec::new(),
            timing_modes: Vec::new(),
            seeds: Vec::new(),
        }
    }

    pub fn grid() -> Self {
        Self::new()
    }

    pub fn base(mut self, params: ScenarioParams) -> Self {
        self.base = params;
        self
    }

    pub fn policies(mut self, policies: Vec<SelectionPolicyKind>) -> Self {
        self.policies = policies;
        self
    }

    pub fn ambulance_counts(mut self, counts: Vec<usize>) -> Self {
        self.ambulance_counts = counts;
        self
    }

    pub fn timing_modes(mut self, modes: Vec<TimingMode>) -> Self {
        self.timing_modes = modes;
        self
    }

    pub fn seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Seeds `0..runs`.
    pub fn runs_per_config(self, runs: usize) -> Self {
        self.seeds((0..runs as u64).collect())
    }

    fn or_base<T: Clone>(values: &[T], base: T) -> Vec<T> {
        if values.is_empty() {
            vec![base]
        } else {
            values.to_vec()
        }
    }

    /// Cartesian product of every dimension, seeds innermost.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let policies = Self::or_base(&self.policies, self.base.selection_policy);
        let ambulances = Self::or_base(&self.ambulance_counts, self.base.ambulance_count);
        let timings = Self::or_base(&self.timing_modes, self.base.travel_time_mode);
        let seeds = Self::or_base(&self.seeds, self.base.random_seed);

        let mut sets = Vec::with_capacity(policies.len() * ambulances.len() * timings.len() * seeds.len());
        for &policy in &policies {
            for &ambulance_count in &ambulances {
                for &timing in &timings {
                    let params = self
                        .base
                        .clone()
                        .with_policy(policy)
                        .with_ambulances(ambulance_count)
                        .with_timing(timing);
                    let experiment_id = format!("{policy}-a{ambulance_count}-{}", timing_label(timing));
                    for (run_id, &seed) in seeds.iter().enumerate() {
                        sets.push(ParameterSet::new(params.clone(), experiment_id.clone(), run_id, seed));
                    }
                }
            }
        }
        sets
    }
}

pub(crate) fn timing_label(mode: TimingMode) -> &'static str {
    match mode {
        TimingMode::Deterministic => "deterministic",
        TimingMode::Stochastic => "stochastic",
    }
}
