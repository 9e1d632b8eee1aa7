//! Pre-defined parameter spaces.

use ems_core::distributions::TimingMode;
use ems_core::scenario::{HospitalParams, ScenarioParams, SelectionPolicyKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::parameters::{ParameterSet, ParameterSpace};

pub const MASS_CASUALTY_AMBULANCES: usize = 30;
pub const MASS_CASUALTY_PATIENTS_MIN: usize = 200;
pub const MASS_CASUALTY_PATIENTS_MAX: usize = 250;
pub const IMMEDIATE_SHARE_MIN: f64 = 0.10;
pub const IMMEDIATE_SHARE_MAX: f64 = 0.40;

/// Offset separating the patient-mix stream from the run's own stream.
const MIX_STREAM: u64 = 0x5A5A_5A5A;

/// Three receiving hospitals; the farthest has no Immediate capacity.
pub fn mass_casualty_hospitals() -> Vec<HospitalParams> {
    vec![
        HospitalParams::new(5.59, 6, 15),
        HospitalParams::new(4.24, 5, 12),
        HospitalParams::new(6.95, 0, 8),
    ]
}

/// Patient counts of one incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatientMix {
    pub immediate: usize,
    pub delayed: usize,
}

impl PatientMix {
    pub fn total(&self) -> usize {
        self.immediate + self.delayed
    }
}

/// Total uniform in `[200, 250]`, Immediate share uniform in `[0.10, 0.40)`.
pub fn sample_patient_mix<R: Rng + ?Sized>(rng: &mut R) -> PatientMix {
    let total = rng.gen_range(MASS_CASUALTY_PATIENTS_MIN..=MASS_CASUALTY_PATIENTS_MAX);
    let share = rng.gen_range(IMMEDIATE_SHARE_MIN..IMMEDIATE_SHARE_MAX);
    let immediate = (total as f64 * share).round() as usize;
    PatientMix {
        immediate,
        delayed: total - immediate,
    }
}

/// The mix of trial `seed`, identical for every policy.
pub fn patient_mix_for_seed(seed: u64) -> PatientMix {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(MIX_STREAM));
    sample_patient_mix(&mut rng)
}

pub fn mass_casualty_scenario(mix: PatientMix) -> ScenarioParams {
    ScenarioParams::default()
        .with_patients(mix.immediate, mix.delayed)
        .with_ambulances(MASS_CASUALTY_AMBULANCES)
        .with_hospitals(mass_casualty_hospitals())
        .with_timing(TimingMode::Stochastic)
}

/// `trials` sampled incidents, each run once per policy. Trial `i` uses seed
/// `i` for both its patient mix and its run.
pub fn mass_casualty_trials(trials: usize, policies: &[SelectionPolicyKind]) -> Vec<ParameterSet> {
    let mut sets = Vec::with_capacity(trials * policies.len());
    for &policy in policies {
        for trial in 0..trials {
            let seed = trial as u64;
            let params = mass_casualty_scenario(patient_mix_for_seed(seed)).with_policy(policy);
            sets.push(ParameterSet::new(params, format!("mass-casualty-{policy}"), trial, seed));
        }
    }
    sets
}

/// Small deterministic grid for smoke runs.
pub fn minimal_space() -> ParameterSpace {
    ParameterSpace::grid()
        .base(
            ScenarioParams::default()
                .with_patients(5, 10)
                .with_timing(TimingMode::Deterministic),
        )
        .policies(SelectionPolicyKind::ALL.to_vec())
        .runs_per_config(2)
}

/// Fleet-size sweep on the default three-hospital scenario.
pub fn fleet_size_space() -> ParameterSpace {
    ParameterSpace::grid()
        .policies(SelectionPolicyKind::ALL.to_vec())
        .ambulance_counts(vec![1, 2, 5, 10])
        .runs_per_config(20)
}
