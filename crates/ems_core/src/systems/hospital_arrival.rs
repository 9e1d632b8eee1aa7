use bevy_ecs::prelude::{Entity, Query, Res, ResMut};

use crate::clock::{EventKind, SimulationClock, NEVER};
use crate::distributions::{ServiceTimeModel, SimRng, TravelTimeModel};
use crate::ecs::{Ambulance, Hospital, Patient, PatientLocation};
use crate::telemetry::{EventRecord, SimTelemetry};

use super::{admit, earliest};

/// The loaded ambulance with the earliest dropoff time hands its patient to
/// the hospital and heads back to the scene. The patient takes a free server
/// of its class or joins that class's queue.
#[allow(clippy::too_many_arguments)]
pub fn hospital_arrival_system(
    clock: Res<SimulationClock>,
    travel: Res<TravelTimeModel>,
    service: Res<ServiceTimeModel>,
    mut rng: ResMut<SimRng>,
    mut telemetry: ResMut<SimTelemetry>,
    mut patients: Query<&mut Patient>,
    mut ambulances: Query<(Entity, &mut Ambulance)>,
    mut hospitals: Query<&mut Hospital>,
) {
    let now = clock.now();

    let Some(ambulance_entity) = earliest(
        ambulances
            .iter()
            .filter(|(_, a)| a.is_carrying())
            .map(|(entity, a)| (entity, a.dropoff_time, a.id)),
    ) else {
        return;
    };
    let Ok((_, mut ambulance)) = ambulances.get_mut(ambulance_entity) else {
        return;
    };
    let Some(patient_entity) = ambulance.patient else {
        return;
    };
    let Ok(mut patient) = patients.get_mut(patient_entity) else {
        return;
    };
    let Some(hospital_entity) = patient.hospital else {
        tracing::warn!(patient = patient.id, "carried patient has no destination");
        return;
    };
    let Ok(mut hospital) = hospitals.get_mut(hospital_entity) else {
        return;
    };

    // Return trip is drawn before any treatment time.
    let back_at_scene = now + travel.sample(hospital.distance, &mut rng.0);
    ambulance.unload(back_at_scene);

    patient.location = PatientLocation::AtHospital;
    patient.arrival_time = NEVER;
    if hospital.accept(patient_entity, patient.class) {
        admit(&mut patient, now, &service, &mut rng.0);
    } else {
        tracing::trace!(
            patient = patient.id,
            hospital = hospital.id,
            queued = hospital.queued(patient.class),
            "no free server; patient queued"
        );
    }

    telemetry.record_event(EventRecord {
        time: now,
        kind: EventKind::Dropoff,
        patient: patient.id,
        ambulance: Some(ambulance.id),
        hospital: hospital.id,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::clock::{CurrentEvent, Event};
    use crate::distributions::TimingMode;
    use crate::ecs::TriageClass;
    use crate::test_helpers::create_test_world;

    fn carried(world: &mut World, id: u32, hospital: Entity, arrival: f64) -> Entity {
        let patient = world
            .spawn(Patient {
                hospital: Some(hospital),
                location: PatientLocation::InTransit,
                arrival_time: arrival,
                ..Patient::at_scene(id, TriageClass::Immediate)
            })
            .id();
        let mut ambulance = Ambulance::at_scene(id);
        ambulance.load(patient, arrival);
        world.spawn(ambulance);
        patient
    }

    fn run_dropoff(world: &mut World, at: f64) {
        world.resource_mut::<SimulationClock>().advance_to(at);
        world.insert_resource(CurrentEvent(Event {
            timestamp: at,
            kind: EventKind::Dropoff,
        }));
        let mut schedule = Schedule::default();
        schedule.add_systems(hospital_arrival_system);
        schedule.run(world);
    }

    #[test]
    fn dropoff_admits_when_server_free_and_queues_otherwise() {
        let mut world = create_test_world(TimingMode::Deterministic);
        let hospital = world.spawn(Hospital::new(0, 4.0, 1, 0)).id();
        let first = carried(&mut world, 0, hospital, 6.0);
        let second = carried(&mut world, 1, hospital, 6.0);

        run_dropoff(&mut world, 6.0);
        let admitted = *world.get::<Patient>(first).expect("patient");
        assert_eq!(admitted.location, PatientLocation::AtHospital);
        assert_eq!(admitted.arrival_time, NEVER);
        assert_eq!(admitted.departure_time, 96.0);
        assert!(admitted.survival_probability > 0.0);

        run_dropoff(&mut world, 6.0);
        let queued = *world.get::<Patient>(second).expect("patient");
        assert!(queued.is_queued());
        let h = world.get::<Hospital>(hospital).expect("hospital");
        assert_eq!(h.occupancy[TriageClass::Immediate], 2);
        assert_eq!(h.queued(TriageClass::Immediate), 1);

        let mut ambulances: Vec<Ambulance> =
            world.query::<&Ambulance>().iter(&world).copied().collect();
        ambulances.sort_by_key(|a| a.id);
        assert!(ambulances.iter().all(|a| !a.is_carrying() && a.timers_consistent()));
        assert_eq!(ambulances[0].pickup_ready_time, 12.0);
        assert_eq!(world.resource::<SimTelemetry>().events.len(), 2);
    }
}
