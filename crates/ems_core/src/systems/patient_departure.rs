use bevy_ecs::prelude::{Entity, Query, Res, ResMut};

use crate::clock::{EventKind, SimulationClock};
use crate::distributions::{ServiceTimeModel, SimRng};
use crate::ecs::{Hospital, Patient, PatientLocation};
use crate::telemetry::{DepartureRecord, EventRecord, SimTelemetry};

use super::{admit, earliest};

/// The admitted patient with the earliest departure time leaves, banking its
/// survival probability. Its server goes to the head of the same class queue.
pub fn patient_departure_system(
    clock: Res<SimulationClock>,
    service: Res<ServiceTimeModel>,
    mut rng: ResMut<SimRng>,
    mut telemetry: ResMut<SimTelemetry>,
    mut patients: Query<(Entity, &mut Patient)>,
    mut hospitals: Query<&mut Hospital>,
) {
    let now = clock.now();

    let Some(departing) = earliest(
        patients
            .iter()
            .filter(|(_, p)| p.is_admitted())
            .map(|(entity, p)| (entity, p.departure_time, p.id)),
    ) else {
        return;
    };
    let Ok((_, mut patient)) = patients.get_mut(departing) else {
        return;
    };
    let Some(hospital_entity) = patient.hospital else {
        return;
    };
    let Ok(mut hospital) = hospitals.get_mut(hospital_entity) else {
        return;
    };

    patient.location = PatientLocation::Departed;
    let class = patient.class;
    let record = DepartureRecord {
        patient: patient.id,
        class,
        hospital: hospital.id,
        departed_at: now,
        survival_probability: patient.survival_probability,
    };
    telemetry.record_departure(record);
    telemetry.record_event(EventRecord {
        time: now,
        kind: EventKind::Departure,
        patient: record.patient,
        ambulance: None,
        hospital: hospital.id,
    });

    if let Some(next) = hospital.release(class) {
        if let Ok((_, mut queued)) = patients.get_mut(next) {
            admit(&mut queued, now, &service, &mut rng.0);
        }
    }
}
