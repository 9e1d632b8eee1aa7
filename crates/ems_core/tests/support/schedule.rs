#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use ems_core::runner::{run_next_event, run_until_done, simulation_schedule, StepOutcome};

/// Owns a reusable `Schedule` so tests can step or drain a run.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    pub fn run_one(&mut self, world: &mut World) -> StepOutcome {
        run_next_event(world, &mut self.schedule)
    }

    pub fn run_until_done(&mut self, world: &mut World, max_steps: usize) -> usize {
        run_until_done(world, &mut self.schedule, max_steps)
    }

    /// Drain the run; every run terminates, so no step cap is needed.
    pub fn run_full(&mut self, world: &mut World) -> usize {
        self.run_until_done(world, usize::MAX)
    }
}
