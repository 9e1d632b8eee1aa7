//! Discrete-event simulation of an emergency-medical-services pipeline.
//!
//! Patients wait at a scene, ambulances carry them to hospitals, hospitals
//! treat them in class-specific servers, and every departing patient adds a
//! survival probability to the run total. Runs are driven by [runner] over a
//! bevy_ecs [bevy_ecs::world::World]; [simulation::SimulationRun] wraps the
//! whole lifecycle for callers that only want a [simulation::RunReport].

pub mod clock;
pub mod distributions;
pub mod ecs;
pub mod error;
pub mod runner;
pub mod scenario;
pub mod selection;
pub mod simulation;
pub mod survival;
pub mod systems;
pub mod telemetry;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
