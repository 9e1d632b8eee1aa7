#![allow(dead_code)]

use bevy_ecs::prelude::World;
use ems_core::distributions::TimingMode;
use ems_core::scenario::{build_scenario, HospitalParams, ScenarioParams, SelectionPolicyKind};

/// Builder for reproducible scenario worlds.
#[derive(Clone, Debug)]
pub struct TestWorldBuilder {
    params: ScenarioParams,
}

impl Default for TestWorldBuilder {
    fn default() -> Self {
        Self {
            params: ScenarioParams::default()
                .with_patients(0, 0)
                .with_ambulances(1)
                .with_hospitals(vec![HospitalParams::new(1.0, 1, 1)])
                .with_policy(SelectionPolicyKind::FifoHead)
                .with_timing(TimingMode::Deterministic)
                .with_seed(42),
        }
    }
}

impl TestWorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.random_seed = seed;
        self
    }

    pub fn with_patients(mut self, immediate: usize, delayed: usize) -> Self {
        self.params = self.params.with_patients(immediate, delayed);
        self
    }

    pub fn with_ambulances(mut self, count: usize) -> Self {
        self.params.ambulance_count = count;
        self
    }

    /// Replace the hospital list; each entry is (distance, immediate servers, delayed servers).
    pub fn with_hospitals(mut self, hospitals: &[(f64, u32, u32)]) -> Self {
        self.params.hospitals = hospitals
            .iter()
            .map(|(d, i, del)| HospitalParams::new(*d, *i, *del))
            .collect();
        self
    }

    pub fn with_policy(mut self, policy: SelectionPolicyKind) -> Self {
        self.params.selection_policy = policy;
        self
    }

    pub fn stochastic(mut self) -> Self {
        self.params.travel_time_mode = TimingMode::Stochastic;
        self
    }

    pub fn params(&self) -> ScenarioParams {
        self.params.clone()
    }

    /// Build the world with every entity spawned.
    pub fn build(self) -> World {
        let mut world = World::new();
        build_scenario(&mut world, self.params).expect("valid test scenario");
        world
    }
}

/// The mass-casualty layout used by the experiment harness, at a fixed mix.
pub fn mass_casualty_builder(immediate: usize, delayed: usize) -> TestWorldBuilder {
    TestWorldBuilder::new()
        .with_patients(immediate, delayed)
        .with_ambulances(30)
        .with_hospitals(&[(5.59, 6, 15), (4.24, 5, 12), (6.95, 0, 8)])
        .stochastic()
}
