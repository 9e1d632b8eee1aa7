//! Run the default three-hospital scenario and print its event trace.
//!
//! Run with: cargo run -p ems_core --example scenario_run

use bevy_ecs::prelude::World;
use ems_core::runner::{run_until_done, simulation_schedule};
use ems_core::scenario::{build_scenario, ScenarioParams, SelectionPolicyKind};
use ems_core::telemetry::SimTelemetry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let params = ScenarioParams::default()
        .with_policy(SelectionPolicyKind::Myopic)
        .with_seed(123);
    let total = params.total_patients();

    let mut world = World::new();
    build_scenario(&mut world, params)?;

    let mut schedule = simulation_schedule();
    // Three events per patient.
    let steps = run_until_done(&mut world, &mut schedule, 3 * total);

    let telemetry = world.resource::<SimTelemetry>();
    println!("--- Scenario run ({total} patients, myopic, seed 123) ---");
    println!("Events handled: {steps}");
    println!("Patients served: {}/{}", telemetry.served, total);
    println!("Total survival: {:.3}", telemetry.total_survival_probability);
    println!("Policy fallbacks: {}", telemetry.policy_fallbacks);

    println!("\nFirst 20 events:");
    for record in telemetry.events.iter().take(20) {
        println!(
            "  t={:>8.2}  {:<9} patient={:<3} ambulance={:<4} hospital={}",
            record.time,
            format!("{:?}", record.kind),
            record.patient,
            record
                .ambulance
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
            record.hospital
        );
    }
    Ok(())
}
