pub mod hospital_arrival;
pub mod next_event_times;
pub mod patient_departure;
pub mod pickup;

use bevy_ecs::prelude::Entity;
use rand::rngs::StdRng;

use crate::clock::SimTime;
use crate::distributions::ServiceTimeModel;
use crate::ecs::Patient;
use crate::survival::sll_surv;

/// Puts `patient` on a server at `now`: draws its treatment time and fixes
/// its survival probability at the scheduled departure.
pub fn admit(patient: &mut Patient, now: SimTime, service: &ServiceTimeModel, rng: &mut StdRng) {
    patient.departure_time = now + service.sample(patient.class, rng);
    patient.survival_probability = sll_surv(patient.departure_time, patient.class);
}

/// Entity with the smallest time; equal times go to the lowest id.
pub(crate) fn earliest(candidates: impl Iterator<Item = (Entity, SimTime, u32)>) -> Option<Entity> {
    candidates
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)))
        .map(|(entity, _, _)| entity)
}

#[cfg(test)]
mod end_to_end_tests {
    use bevy_ecs::prelude::World;

    use crate::clock::{EventKind, NEVER};
    use crate::distributions::TimingMode;
    use crate::ecs::{Patient, PatientLocation, TriageClass};
    use crate::runner::{run_until_done, simulation_schedule};
    use crate::scenario::{build_scenario, HospitalParams, ScenarioParams, SelectionPolicyKind};
    use crate::survival::sll_surv;
    use crate::telemetry::SimTelemetry;

    fn single_hospital(immediate: usize, delayed: usize, servers: (u32, u32)) -> ScenarioParams {
        ScenarioParams::default()
            .with_patients(immediate, delayed)
            .with_ambulances(1)
            .with_hospitals(vec![HospitalParams::new(1.0, servers.0, servers.1)])
            .with_policy(SelectionPolicyKind::FifoHead)
            .with_timing(TimingMode::Deterministic)
    }

    #[test]
    fn one_patient_runs_pickup_dropoff_departure() {
        let mut world = World::new();
        build_scenario(&mut world, single_hospital(0, 1, (1, 1))).expect("scenario");

        let mut schedule = simulation_schedule();
        let steps = run_until_done(&mut world, &mut schedule, 100);
        assert_eq!(steps, 3);

        let telemetry = world.resource::<SimTelemetry>();
        let kinds: Vec<EventKind> = telemetry.events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Pickup, EventKind::Dropoff, EventKind::Departure]
        );
        assert_eq!(telemetry.events[1].time, 1.5);
        assert_eq!(telemetry.events[2].time, 181.5);
        assert!((telemetry.total_survival_probability - sll_surv(181.5, TriageClass::Delayed)).abs() < 1e-12);
    }

    #[test]
    fn queued_patient_is_admitted_when_server_frees() {
        let mut world = World::new();
        build_scenario(&mut world, single_hospital(0, 2, (1, 1))).expect("scenario");
        let mut schedule = simulation_schedule();
        run_until_done(&mut world, &mut schedule, 100);

        let mut patients: Vec<Patient> = world.query::<&Patient>().iter(&world).copied().collect();
        patients.sort_by_key(|p| p.id);
        assert!(patients.iter().all(|p| p.location == PatientLocation::Departed));
        // Second patient arrives at 4.5 but waits for the first to leave at 181.5.
        assert_eq!(patients[1].departure_time, 181.5 + 180.0);
        assert_ne!(patients[1].departure_time, NEVER);
        assert_eq!(world.resource::<SimTelemetry>().served, 2);
    }
}
