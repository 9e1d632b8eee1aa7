use bevy_ecs::prelude::{Entity, Query, Res, ResMut};

use crate::clock::{EventKind, SimulationClock};
use crate::distributions::{ServiceTimeModel, SimRng, TravelTimeModel};
use crate::ecs::{Ambulance, Hospital, Patient, PatientLocation};
use crate::selection::{
    resolve_selection, HospitalView, SelectionPolicyResource, SelectionState, WaitingPatient,
};
use crate::telemetry::{EventRecord, SimTelemetry};

use super::earliest;

/// The idle ambulance with the earliest ready time takes the patient and
/// hospital chosen by the selection policy.
#[allow(clippy::too_many_arguments)]
pub fn pickup_system(
    clock: Res<SimulationClock>,
    policy: Res<SelectionPolicyResource>,
    travel: Res<TravelTimeModel>,
    service: Res<ServiceTimeModel>,
    mut rng: ResMut<SimRng>,
    mut telemetry: ResMut<SimTelemetry>,
    mut patients: Query<(Entity, &mut Patient)>,
    mut ambulances: Query<(Entity, &mut Ambulance)>,
    hospitals: Query<(Entity, &Hospital)>,
) {

    let Some(ambulance_entity) = earliest(
        ambulances
            .iter()
            .filter(|(_, a)| !a.is_carrying())
            .map(|(entity, a)| (entity, a.pickup_ready_time, a.id)),
    ) else {
        return;
    };

    let mut waiting: Vec<WaitingPatient> = patients
        .iter()
        .filter(|(_, p)| p.is_waiting())
        .map(|(entity, p)| WaitingPatient {
            entity,
            id: p.id,
            class: p.class,
        })
        .collect();
    waiting.sort_by_key(|p| p.id);

    let mut hospital_views: Vec<HospitalView> = hospitals
        .iter()
        .map(|(entity, h)| HospitalView {
            entity,
            id: h.id,
            distance: h.distance,
            servers: h.servers,
            occupancy: h.occupancy,
        })
        .collect();
    hospital_views.sort_by_key(|h| h.id);

    let state = SelectionState {
        now: clock.now(),
        picked_up: telemetry.picked_up,
        waiting,
        hospitals: hospital_views,
        travel: *travel,
        service: *service,
    };

    let Some(selection) = resolve_selection(policy.0.as_ref(), &state, &mut rng.0) else {
        return;
    };
    let Ok((_, hospital)) = hospitals.get(selection.hospital) else {
        return;
    };

    let arrival_time = clock.now() + travel.sample(hospital.distance, &mut rng.0);

    let Ok((_, mut patient)) = patients.get_mut(selection.patient) else {
        return;
    };
    debug_assert_eq!(patient.location, PatientLocation::AtScene);
    patient.location = PatientLocation::InTransit;
    patient.hospital = Some(selection.hospital);
    patient.arrival_time = arrival_time;

    let Ok((_, mut ambulance)) = ambulances.get_mut(ambulance_entity) else {
        return;
    };
    ambulance.load(selection.patient, arrival_time);

    telemetry.picked_up += 1;
    if selection.fallback {
        telemetry.policy_fallbacks += 1;
    }
    telemetry.record_event(EventRecord {
        time: clock.now(),
        kind: EventKind::Pickup,
        patient: patient.id,
        ambulance: Some(ambulance.id),
        hospital: hospital.id,
    });
}
