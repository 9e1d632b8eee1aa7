#![allow(dead_code)]

use bevy_ecs::prelude::{Entity, World};
use ems_core::clock::{SimTime, NEVER};
use ems_core::ecs::{Ambulance, Hospital, Patient, PatientLocation, TriageClass};

/// Builder for patient fixtures placed directly into a world.
#[derive(Clone, Debug)]
pub struct PatientBuilder {
    id: u32,
    class: TriageClass,
    location: PatientLocation,
    hospital: Option<Entity>,
    arrival_time: SimTime,
    departure_time: SimTime,
}

impl PatientBuilder {
    pub fn new(id: u32, class: TriageClass) -> Self {
        Self {
            id,
            class,
            location: PatientLocation::AtScene,
            hospital: None,
            arrival_time: NEVER,
            departure_time: NEVER,
        }
    }

    pub fn in_transit_to(mut self, hospital: Entity, arrival_time: SimTime) -> Self {
        self.location = PatientLocation::InTransit;
        self.hospital = Some(hospital);
        self.arrival_time = arrival_time;
        self
    }

    pub fn admitted_at(mut self, hospital: Entity, departure_time: SimTime) -> Self {
        self.location = PatientLocation::AtHospital;
        self.hospital = Some(hospital);
        self.departure_time = departure_time;
        self
    }

    /// Spawn the patient. An admitted patient also takes a server at its
    /// hospital, so the hospital must already exist.
    pub fn spawn(self, world: &mut World) -> Entity {
        let entity = world
            .spawn(Patient {
                hospital: self.hospital,
                location: self.location,
                arrival_time: self.arrival_time,
                departure_time: self.departure_time,
                ..Patient::at_scene(self.id, self.class)
            })
            .id();
        if let (PatientLocation::AtHospital, Some(hospital)) = (self.location, self.hospital) {
            let mut hospital = world.get_mut::<Hospital>(hospital).expect("hospital spawned");
            assert!(hospital.accept(entity, self.class), "no free server for admitted patient");
        }
        entity
    }
}

/// Spawn an idle ambulance ready for pickup at `ready_at`.
pub fn spawn_ambulance(world: &mut World, id: u32, ready_at: SimTime) -> Entity {
    world
        .spawn(Ambulance {
            pickup_ready_time: ready_at,
            ..Ambulance::at_scene(id)
        })
        .id()
}

/// Spawn an ambulance carrying `patient`, due at its hospital at `dropoff_at`.
pub fn spawn_loaded_ambulance(
    world: &mut World,
    id: u32,
    patient: Entity,
    dropoff_at: SimTime,
) -> Entity {
    let mut ambulance = Ambulance::at_scene(id);
    ambulance.load(patient, dropoff_at);
    world.spawn(ambulance).id()
}

pub fn spawn_hospital(
    world: &mut World,
    id: u32,
    distance: f64,
    immediate_servers: u32,
    delayed_servers: u32,
) -> Entity {
    world
        .spawn(Hospital::new(id, distance, immediate_servers, delayed_servers))
        .id()
}
