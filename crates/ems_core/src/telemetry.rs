//! Run telemetry: aggregate counters plus an ordered trace of handled events.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::clock::{EventKind, SimTime};
use crate::ecs::TriageClass;

/// One handled event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventRecord {
    pub time: SimTime,
    pub kind: EventKind,
    pub patient: u32,
    /// Ambulance involved; `None` for departures.
    pub ambulance: Option<u32>,
    pub hospital: u32,
}

/// One patient leaving treatment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepartureRecord {
    pub patient: u32,
    pub class: TriageClass,
    pub hospital: u32,
    pub departed_at: SimTime,
    pub survival_probability: f64,
}

#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub picked_up: usize,
    pub served: usize,
    pub total_survival_probability: f64,
    /// Pickups where the policy's class had nobody waiting.
    pub policy_fallbacks: usize,
    pub events: Vec<EventRecord>,
    pub departures: Vec<DepartureRecord>,
}

impl SimTelemetry {
    pub fn record_event(&mut self, record: EventRecord) {
        tracing::debug!(
            time = record.time,
            kind = ?record.kind,
            patient = record.patient,
            ambulance = ?record.ambulance,
            hospital = record.hospital,
            "event"
        );
        self.events.push(record);
    }

    pub fn record_departure(&mut self, record: DepartureRecord) {
        self.served += 1;
        self.total_survival_probability += record.survival_probability;
        self.departures.push(record);
    }

    pub fn events_of(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }
}
