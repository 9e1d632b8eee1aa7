//! Scenario setup: validate a configuration and populate a world with every
//! patient, ambulance and hospital of the run.
//!
//! All entities exist from time zero. Patients are numbered Immediate first,
//! then Delayed, and that numbering is the scene's waiting order.

use bevy_ecs::prelude::{Resource, World};
use serde::{Deserialize, Serialize};

use crate::clock::SimulationClock;
use crate::distributions::{ServiceTimeModel, SimRng, TimingMode, TravelTimeModel};
use crate::ecs::{Ambulance, Hospital, Patient, TriageClass};
use crate::error::ConfigError;
use crate::selection::SelectionPolicyResource;
use crate::systems::next_event_times::refresh_next_event_times;
use crate::telemetry::SimTelemetry;

pub use crate::selection::SelectionPolicyKind;

/// One receiving hospital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HospitalParams {
    /// Distance from the scene; travel time scales with it.
    pub distance: f64,
    pub immediate_servers: u32,
    pub delayed_servers: u32,
}

impl HospitalParams {
    pub fn new(distance: f64, immediate_servers: u32, delayed_servers: u32) -> Self {
        Self {
            distance,
            immediate_servers,
            delayed_servers,
        }
    }
}

/// Parameters for building a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub immediate_patient_count: usize,
    pub delayed_patient_count: usize,
    pub ambulance_count: usize,
    pub hospitals: Vec<HospitalParams>,
    #[serde(default)]
    pub selection_policy: SelectionPolicyKind,
    #[serde(default)]
    pub travel_time_mode: TimingMode,
    #[serde(default)]
    pub random_seed: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            immediate_patient_count: 20,
            delayed_patient_count: 50,
            ambulance_count: 2,
            hospitals: vec![
                HospitalParams::new(5.0, 1, 6),
                HospitalParams::new(10.0, 2, 8),
                HospitalParams::new(20.0, 3, 10),
            ],
            selection_policy: SelectionPolicyKind::Random,
            travel_time_mode: TimingMode::Stochastic,
            random_seed: 12,
        }
    }
}

impl ScenarioParams {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_patients(mut self, immediate: usize, delayed: usize) -> Self {
        self.immediate_patient_count = immediate;
        self.delayed_patient_count = delayed;
        self
    }

    pub fn with_ambulances(mut self, count: usize) -> Self {
        self.ambulance_count = count;
        self
    }

    pub fn with_hospitals(mut self, hospitals: Vec<HospitalParams>) -> Self {
        self.hospitals = hospitals;
        self
    }

    pub fn with_policy(mut self, policy: SelectionPolicyKind) -> Self {
        self.selection_policy = policy;
        self
    }

    pub fn with_timing(mut self, mode: TimingMode) -> Self {
        self.travel_time_mode = mode;
        self
    }

    pub fn total_patients(&self) -> usize {
        self.immediate_patient_count + self.delayed_patient_count
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ambulance_count == 0 {
            return Err(ConfigError::NoAmbulances);
        }
        if self.hospitals.is_empty() {
            return Err(ConfigError::NoHospitals);
        }
        for (index, hospital) in self.hospitals.iter().enumerate() {
            if !hospital.distance.is_finite() || hospital.distance <= 0.0 {
                return Err(ConfigError::InvalidDistance {
                    index,
                    distance: hospital.distance,
                });
            }
        }
        Ok(())
    }
}

/// Patient population of the run, fixed at build time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Resource)]
pub struct PatientCounts {
    pub immediate: usize,
    pub delayed: usize,
}

impl PatientCounts {
    pub fn total(&self) -> usize {
        self.immediate + self.delayed
    }
}

/// Validates `params`, inserts the run resources and spawns every entity.
/// Installs the policy named by `params.selection_policy`.
pub fn build_scenario(world: &mut World, params: ScenarioParams) -> Result<(), ConfigError> {
    let policy = params.selection_policy.build();
    build_scenario_with_policy(world, params, SelectionPolicyResource::new(policy))
}

/// Like [build_scenario] but with a caller-provided selection policy.
pub fn build_scenario_with_policy(
    world: &mut World,
    params: ScenarioParams,
    policy: SelectionPolicyResource,
) -> Result<(), ConfigError> {
    params.validate()?;

    world.insert_resource(SimulationClock::default());
    world.insert_resource(SimRng::seeded(params.random_seed));
    world.insert_resource(TravelTimeModel::new(params.travel_time_mode));
    world.insert_resource(ServiceTimeModel::new(params.travel_time_mode));
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(PatientCounts {
        immediate: params.immediate_patient_count,
        delayed: params.delayed_patient_count,
    });
    world.insert_resource(policy);

    for (id, hospital) in params.hospitals.iter().enumerate() {
        world.spawn(Hospital::new(
            id as u32,
            hospital.distance,
            hospital.immediate_servers,
            hospital.delayed_servers,
        ));
    }

    for id in 0..params.ambulance_count {
        world.spawn(Ambulance::at_scene(id as u32));
    }

    let classes = std::iter::repeat(TriageClass::Immediate)
        .take(params.immediate_patient_count)
        .chain(std::iter::repeat(TriageClass::Delayed).take(params.delayed_patient_count));
    for (id, class) in classes.enumerate() {
        world.spawn(Patient::at_scene(id as u32, class));
    }

    refresh_next_event_times(world);
    tracing::debug!(
        patients = params.total_patients(),
        ambulances = params.ambulance_count,
        hospitals = params.hospitals.len(),
        policy = params.selection_policy.as_str(),
        seed = params.random_seed,
        "scenario built"
    );
    Ok(())
}
