//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Each step asks [NextEventTimes] for the earliest pending category, moves
//! the [SimulationClock] there, inserts the event as [CurrentEvent] and runs
//! the schedule. The last system of the schedule recomputes
//! [NextEventTimes] from the updated entities.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, Event, EventKind, NextEventTimes, SimulationClock};
use crate::scenario::PatientCounts;
use crate::systems::{
    hospital_arrival::hospital_arrival_system, next_event_times::next_event_times_system,
    patient_departure::patient_departure_system, pickup::pickup_system,
};
use crate::telemetry::SimTelemetry;

fn is_pickup(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::Pickup)
        .unwrap_or(false)
}

fn is_dropoff(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::Dropoff)
        .unwrap_or(false)
}

fn is_departure(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::Departure)
        .unwrap_or(false)
}

/// Result of a single runner step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Processed(Event),
    /// Every patient has departed.
    Completed,
    /// Patients remain but no category has a pending event, or the handler
    /// for the next event could not act on it.
    Stalled,
}

/// Every patient of the run has departed.
pub fn is_complete(world: &World) -> bool {
    let total = world
        .get_resource::<PatientCounts>()
        .map(|c| c.total())
        .unwrap_or(0);
    let served = world
        .get_resource::<SimTelemetry>()
        .map(|t| t.served)
        .unwrap_or(0);
    served >= total
}

fn begin_step(world: &mut World) -> Result<Event, StepOutcome> {
    if is_complete(world) {
        return Err(StepOutcome::Completed);
    }
    let next = world
        .get_resource::<NextEventTimes>()
        .and_then(|times| times.next_event());
    let Some(event) = next else {
        return Err(StepOutcome::Stalled);
    };
    world.resource_mut::<SimulationClock>().advance_to(event.timestamp);
    world.insert_resource(CurrentEvent(event));
    Ok(event)
}

fn recorded_events(world: &World) -> usize {
    world
        .get_resource::<SimTelemetry>()
        .map(|t| t.events.len())
        .unwrap_or(0)
}

/// Runs the schedule for `event`. Every handled event appends to the trace,
/// so a step that records nothing left the world unchanged and would repeat
/// forever.
fn process(world: &mut World, schedule: &mut Schedule, event: Event) -> StepOutcome {
    let before = recorded_events(world);
    schedule.run(world);
    if recorded_events(world) == before {
        tracing::warn!(time = event.timestamp, kind = ?event.kind, "event handler made no progress");
        return StepOutcome::Stalled;
    }
    StepOutcome::Processed(event)
}

/// Runs one simulation step: picks the next event, advances the clock, then
/// runs the schedule.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> StepOutcome {
    match begin_step(world) {
        Ok(event) => process(world, schedule, event),
        Err(outcome) => outcome,
    }
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> StepOutcome
where
    F: FnMut(&World, &Event),
{
    match begin_step(world) {
        Ok(event) => {
            let outcome = process(world, schedule, event);
            if matches!(outcome, StepOutcome::Processed(_)) {
                hook(world, &event);
            }
            outcome
        }
        Err(outcome) => outcome,
    }
}

/// Runs steps until the run completes, stalls, or `max_steps` is reached.
/// Returns the number of events processed.
pub fn run_until_done(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps {
        match run_next_event(world, schedule) {
            StepOutcome::Processed(_) => steps += 1,
            StepOutcome::Completed | StepOutcome::Stalled => break,
        }
    }
    steps
}

/// Like [run_until_done], invoking `hook` after each processed event.
pub fn run_until_done_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps {
        match run_next_event_with_hook(world, schedule, &mut hook) {
            StepOutcome::Processed(_) => steps += 1,
            StepOutcome::Completed | StepOutcome::Stalled => break,
        }
    }
    steps
}

/// Builds the simulation schedule: one handler per event category, gated on
/// [CurrentEvent], followed by the [NextEventTimes] refresh.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            pickup_system.run_if(is_pickup),
            hospital_arrival_system.run_if(is_dropoff),
            patient_departure_system.run_if(is_departure),
            next_event_times_system,
        )
            .chain(),
    );
    schedule
}
