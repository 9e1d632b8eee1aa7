//! Shared setup for unit tests, integration tests and benches.

use bevy_ecs::prelude::{Entity, World};

use crate::clock::{NextEventTimes, SimulationClock};
use crate::distributions::{ServiceTimeModel, SimRng, TimingMode, TravelTimeModel};
use crate::ecs::{Ambulance, Hospital, Patient};
use crate::scenario::{HospitalParams, PatientCounts, ScenarioParams, SelectionPolicyKind};
use crate::selection::{RandomSelection, SelectionPolicyResource};
use crate::telemetry::SimTelemetry;

pub const TEST_SEED: u64 = 7;

/// A world with every run resource but no entities. Systems can be run
/// against it once the test has spawned what it needs.
pub fn create_test_world(mode: TimingMode) -> World {
    let mut world = World::new();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(SimRng::seeded(TEST_SEED));
    world.insert_resource(TravelTimeModel::new(mode));
    world.insert_resource(ServiceTimeModel::new(mode));
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(NextEventTimes::default());
    world.insert_resource(PatientCounts::default());
    world.insert_resource(SelectionPolicyResource::new(Box::new(RandomSelection)));
    world
}

/// One hospital at distance 1 with the given servers, one ambulance,
/// deterministic timing and FIFO-head selection.
pub fn single_hospital_params(
    immediate: usize,
    delayed: usize,
    immediate_servers: u32,
    delayed_servers: u32,
) -> ScenarioParams {
    ScenarioParams::default()
        .with_patients(immediate, delayed)
        .with_ambulances(1)
        .with_hospitals(vec![HospitalParams::new(
            1.0,
            immediate_servers,
            delayed_servers,
        )])
        .with_policy(SelectionPolicyKind::FifoHead)
        .with_timing(TimingMode::Deterministic)
}

/// Patients ordered by id.
pub fn patients_of(world: &World) -> Vec<(Entity, Patient)> {
    let mut patients: Vec<(Entity, Patient)> = world
        .iter_entities()
        .filter_map(|e| e.get::<Patient>().map(|p| (e.id(), *p)))
        .collect();
    patients.sort_by_key(|(_, p)| p.id);
    patients
}

/// Ambulances ordered by id.
pub fn ambulances_of(world: &World) -> Vec<(Entity, Ambulance)> {
    let mut ambulances: Vec<(Entity, Ambulance)> = world
        .iter_entities()
        .filter_map(|e| e.get::<Ambulance>().map(|a| (e.id(), *a)))
        .collect();
    ambulances.sort_by_key(|(_, a)| a.id);
    ambulances
}

/// Hospitals ordered by id.
pub fn hospitals_of(world: &World) -> Vec<(Entity, Hospital)> {
    let mut hospitals: Vec<(Entity, Hospital)> = world
        .iter_entities()
        .filter_map(|e| e.get::<Hospital>().map(|h| (e.id(), h.clone())))
        .collect();
    hospitals.sort_by_key(|(_, h)| h.id);
    hospitals
}
