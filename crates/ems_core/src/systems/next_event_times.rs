//! Keeps [NextEventTimes] in sync with entity state after every handled event.

use bevy_ecs::prelude::{Query, ResMut, World};

use crate::clock::{NextEventTimes, NEVER};
use crate::ecs::{Ambulance, Patient};

/// Category minimums over the given entities.
///
/// Pickup is only eligible while someone waits at the scene; dropoff needs a
/// loaded ambulance; departure needs an admitted patient.
pub fn compute_next_event_times<'a>(
    patients: impl Iterator<Item = &'a Patient>,
    ambulances: impl Iterator<Item = &'a Ambulance>,
) -> NextEventTimes {
    let mut anyone_waiting = false;
    let mut departure = NEVER;
    for patient in patients {
        if patient.is_waiting() {
            anyone_waiting = true;
        } else if patient.is_admitted() {
            departure = departure.min(patient.departure_time);
        }
    }

    let mut pickup = NEVER;
    let mut dropoff = NEVER;
    for ambulance in ambulances {
        if ambulance.is_carrying() {
            dropoff = dropoff.min(ambulance.dropoff_time);
        } else {
            pickup = pickup.min(ambulance.pickup_ready_time);
        }
    }

    NextEventTimes {
        pickup: if anyone_waiting { pickup } else { NEVER },
        dropoff,
        departure,
    }
}

pub fn next_event_times_system(
    mut times: ResMut<NextEventTimes>,
    patients: Query<&Patient>,
    ambulances: Query<&Ambulance>,
) {
    *times = compute_next_event_times(patients.iter(), ambulances.iter());
}

/// Recomputes [NextEventTimes] directly on a world (used at build time).
pub fn refresh_next_event_times(world: &mut World) {
    let patients: Vec<Patient> = world.query::<&Patient>().iter(world).copied().collect();
    let ambulances: Vec<Ambulance> = world.query::<&Ambulance>().iter(world).copied().collect();
    let times = compute_next_event_times(patients.iter(), ambulances.iter());
    world.insert_resource(times);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{PatientLocation, TriageClass};
    use bevy_ecs::prelude::Entity;

    #[test]
    fn pickup_is_skipped_when_scene_is_empty() {
        let mut patient = Patient::at_scene(0, TriageClass::Delayed);
        patient.location = PatientLocation::InTransit;
        let idle = Ambulance::at_scene(0);

        let times = compute_next_event_times([patient].iter(), [idle].iter());
        assert_eq!(times.pickup, NEVER);
    }

    #[test]
    fn categories_take_minimum_over_eligible_entities() {
        let waiting = Patient::at_scene(0, TriageClass::Immediate);
        let mut admitted = Patient::at_scene(1, TriageClass::Delayed);
        admitted.location = PatientLocation::AtHospital;
        admitted.departure_time = 200.0;
        let mut queued = Patient::at_scene(2, TriageClass::Delayed);
        queued.location = PatientLocation::AtHospital;

        let mut returning = Ambulance::at_scene(0);
        returning.pickup_ready_time = 12.0;
        let mut idle = Ambulance::at_scene(1);
        idle.pickup_ready_time = 7.0;
        let mut loaded = Ambulance::at_scene(2);
        loaded.load(Entity::from_raw(9), 4.0);

        let times = compute_next_event_times(
            [waiting, admitted, queued].iter(),
            [returning, idle, loaded].iter(),
        );
        assert_eq!(times.pickup, 7.0);
        assert_eq!(times.dropoff, 4.0);
        assert_eq!(times.departure, 200.0);
    }
}
