//! One complete simulation run: world, schedule and the final report.

use bevy_ecs::prelude::{Schedule, World};
use serde::Serialize;

use crate::clock::{SimTime, SimulationClock};
use crate::error::ConfigError;
use crate::runner::{run_next_event, run_next_event_with_hook, simulation_schedule, StepOutcome};
use crate::scenario::{build_scenario, build_scenario_with_policy, PatientCounts, ScenarioParams};
use crate::selection::{SelectionPolicy, SelectionPolicyResource};
use crate::telemetry::SimTelemetry;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    /// Patients were left with no pending event (e.g. a class with no
    /// servers anywhere). `at` is the time of the last handled event.
    Stalled { at: SimTime },
}

/// Aggregate result of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub total_survival_probability: f64,
    pub patients_served: usize,
    pub immediate_count: usize,
    pub delayed_count: usize,
    pub outcome: RunOutcome,
    pub events_processed: usize,
    pub final_time: SimTime,
    pub policy_fallbacks: usize,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }

    pub fn total_patients(&self) -> usize {
        self.immediate_count + self.delayed_count
    }

    /// Mean survival probability per patient; 0 for an empty scene.
    pub fn survival_rate(&self) -> f64 {
        match self.total_patients() {
            0 => 0.0,
            n => self.total_survival_probability / n as f64,
        }
    }
}

pub struct SimulationRun {
    world: World,
    schedule: Schedule,
    outcome: Option<RunOutcome>,
}

impl SimulationRun {
    /// Builds a run from configuration, using the configured selection policy.
    pub fn new(params: ScenarioParams) -> Result<Self, ConfigError> {
        let mut world = World::new();
        build_scenario(&mut world, params)?;
        Ok(Self::from_world(world))
    }

    /// Builds a run with a caller-provided policy; `params.selection_policy`
    /// is ignored.
    pub fn with_policy(
        params: ScenarioParams,
        policy: Box<dyn SelectionPolicy>,
    ) -> Result<Self, ConfigError> {
        let mut world = World::new();
        build_scenario_with_policy(&mut world, params, SelectionPolicyResource::new(policy))?;
        Ok(Self::from_world(world))
    }

    fn from_world(world: World) -> Self {
        Self {
            world,
            schedule: simulation_schedule(),
            outcome: None,
        }
    }

    /// Handles one event. Once the run has ended this keeps returning the
    /// terminal outcome without touching the world.
    pub fn step(&mut self) -> StepOutcome {
        match self.outcome {
            Some(RunOutcome::Completed) => return StepOutcome::Completed,
            Some(RunOutcome::Stalled { .. }) => return StepOutcome::Stalled,
            None => {}
        }
        let outcome = run_next_event(&mut self.world, &mut self.schedule);
        self.observe(outcome);
        outcome
    }

    /// Runs to termination and returns the report.
    pub fn run(&mut self) -> RunReport {
        while let StepOutcome::Processed(_) = self.step() {}
        self.report()
    }

    /// Like [Self::run], invoking `hook` after every handled event.
    pub fn run_with_hook<F>(&mut self, mut hook: F) -> RunReport
    where
        F: FnMut(&World, &crate::clock::Event),
    {
        while self.outcome.is_none() {
            let outcome = run_next_event_with_hook(&mut self.world, &mut self.schedule, &mut hook);
            self.observe(outcome);
        }
        self.report()
    }

    fn observe(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Processed(_) => {}
            StepOutcome::Completed => {
                self.outcome = Some(RunOutcome::Completed);
                let report = self.report();
                tracing::info!(
                    served = report.patients_served,
                    total_survival = report.total_survival_probability,
                    final_time = report.final_time,
                    events = report.events_processed,
                    "run completed"
                );
            }
            StepOutcome::Stalled => {
                let at = self.world.resource::<SimulationClock>().now();
                self.outcome = Some(RunOutcome::Stalled { at });
                let telemetry = self.world.resource::<SimTelemetry>();
                let counts = self.world.resource::<PatientCounts>();
                tracing::warn!(
                    at,
                    served = telemetry.served,
                    total = counts.total(),
                    "run stalled with patients left unserved"
                );
            }
        }
    }

    /// Aggregate statistics so far. A run that has not reached a terminal
    /// step is reported as stalled at the current time unless every patient
    /// has already departed.
    pub fn report(&self) -> RunReport {
        let telemetry = self.world.resource::<SimTelemetry>();
        let counts = self.world.resource::<PatientCounts>();
        let now = self.world.resource::<SimulationClock>().now();
        let outcome = match self.outcome {
            Some(outcome) => outcome,
            None if telemetry.served >= counts.total() => RunOutcome::Completed,
            None => RunOutcome::Stalled { at: now },
        };
        RunReport {
            total_survival_probability: telemetry.total_survival_probability,
            patients_served: telemetry.served,
            immediate_count: counts.immediate,
            delayed_count: counts.delayed,
            outcome,
            events_processed: telemetry.events.len(),
            final_time: now,
            policy_fallbacks: telemetry.policy_fallbacks,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn telemetry(&self) -> &SimTelemetry {
        self.world.resource::<SimTelemetry>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

/// Builds and runs a scenario to termination.
pub fn run_scenario(params: ScenarioParams) -> Result<RunReport, ConfigError> {
    Ok(SimulationRun::new(params)?.run())
}
