use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

use bevy_ecs::prelude::{Component, Entity};
use serde::{Deserialize, Serialize};

use crate::clock::{is_never, SimTime, NEVER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageClass {
    Immediate,
    Delayed,
}

impl TriageClass {
    pub const ALL: [TriageClass; 2] = [TriageClass::Immediate, TriageClass::Delayed];

    pub fn other(self) -> Self {
        match self {
            TriageClass::Immediate => TriageClass::Delayed,
            TriageClass::Delayed => TriageClass::Immediate,
        }
    }
}

/// One value per triage class, indexable by [TriageClass].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerClass<T> {
    pub immediate: T,
    pub delayed: T,
}

impl<T> PerClass<T> {
    pub fn new(immediate: T, delayed: T) -> Self {
        Self { immediate, delayed }
    }
}

impl<T> Index<TriageClass> for PerClass<T> {
    type Output = T;

    fn index(&self, class: TriageClass) -> &T {
        match class {
            TriageClass::Immediate => &self.immediate,
            TriageClass::Delayed => &self.delayed,
        }
    }
}

impl<T> IndexMut<TriageClass> for PerClass<T> {
    fn index_mut(&mut self, class: TriageClass) -> &mut T {
        match class {
            TriageClass::Immediate => &mut self.immediate,
            TriageClass::Delayed => &mut self.delayed,
        }
    }
}

/// Where a patient is. Only ever advances in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatientLocation {
    AtScene,
    InTransit,
    AtHospital,
    Departed,
}

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Patient {
    pub id: u32,
    pub class: TriageClass,
    /// Destination hospital; set at pickup.
    pub hospital: Option<Entity>,
    pub location: PatientLocation,
    /// Scheduled hospital arrival; finite only while in transit.
    pub arrival_time: SimTime,
    /// Scheduled end of treatment; finite only once the patient holds a server.
    pub departure_time: SimTime,
    /// Evaluated once, when the patient is admitted to a server.
    pub survival_probability: f64,
}

impl Patient {
    pub fn at_scene(id: u32, class: TriageClass) -> Self {
        Self {
            id,
            class,
            hospital: None,
            location: PatientLocation::AtScene,
            arrival_time: NEVER,
            departure_time: NEVER,
            survival_probability: 0.0,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.location == PatientLocation::AtScene
    }

    /// At a hospital and occupying a server (as opposed to queued).
    pub fn is_admitted(&self) -> bool {
        self.location == PatientLocation::AtHospital && !is_never(self.departure_time)
    }

    pub fn is_queued(&self) -> bool {
        self.location == PatientLocation::AtHospital && is_never(self.departure_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Ambulance {
    pub id: u32,
    pub patient: Option<Entity>,
    /// When the ambulance is back at the scene and can pick up; [NEVER] while carrying.
    pub pickup_ready_time: SimTime,
    /// When the carried patient reaches the hospital; [NEVER] while idle or returning.
    pub dropoff_time: SimTime,
}

impl Ambulance {
    /// An ambulance standing by at the scene at time zero.
    pub fn at_scene(id: u32) -> Self {
        Self {
            id,
            patient: None,
            pickup_ready_time: 0.0,
            dropoff_time: NEVER,
        }
    }

    pub fn is_carrying(&self) -> bool {
        self.patient.is_some()
    }

    pub fn load(&mut self, patient: Entity, dropoff_time: SimTime) {
        self.patient = Some(patient);
        self.dropoff_time = dropoff_time;
        self.pickup_ready_time = NEVER;
    }

    /// Hands over the carried patient and starts the return trip.
    pub fn unload(&mut self, pickup_ready_time: SimTime) -> Option<Entity> {
        self.dropoff_time = NEVER;
        self.pickup_ready_time = pickup_ready_time;
        self.patient.take()
    }

    /// Exactly one of the two timers is finite.
    pub fn timers_consistent(&self) -> bool {
        is_never(self.pickup_ready_time) != is_never(self.dropoff_time)
    }
}

#[derive(Debug, Clone, PartialEq, Component)]
pub struct Hospital {
    pub id: u32,
    /// Distance from the scene.
    pub distance: f64,
    pub servers: PerClass<u32>,
    /// Admitted plus queued patients.
    pub occupancy: PerClass<u32>,
    /// Patients waiting for a server, oldest first.
    pub queues: PerClass<VecDeque<Entity>>,
}

impl Hospital {
    pub fn new(id: u32, distance: f64, immediate_servers: u32, delayed_servers: u32) -> Self {
        Self {
            id,
            distance,
            servers: PerClass::new(immediate_servers, delayed_servers),
            occupancy: PerClass::default(),
            queues: PerClass::default(),
        }
    }

    /// Registers an arriving patient. Returns `true` when a server is free
    /// for it; otherwise it is queued.
    pub fn accept(&mut self, patient: Entity, class: TriageClass) -> bool {
        self.occupancy[class] += 1;
        if self.occupancy[class] <= self.servers[class] {
            true
        } else {
            self.queues[class].push_back(patient);
            false
        }
    }

    /// Frees the server held by a departing patient and hands back the next
    /// queued patient of the same class, if any.
    pub fn release(&mut self, class: TriageClass) -> Option<Entity> {
        debug_assert!(self.occupancy[class] > 0, "release on empty hospital class");
        self.occupancy[class] = self.occupancy[class].saturating_sub(1);
        self.queues[class].pop_front()
    }

    pub fn queued(&self, class: TriageClass) -> usize {
        self.queues[class].len()
    }
}
