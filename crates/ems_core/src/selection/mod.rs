//! Pickup selection: which waiting patient an idle ambulance takes, and to
//! which hospital.
//!
//! Policies implement [SelectionPolicy] and are installed in the world as a
//! [SelectionPolicyResource]. A policy may nominate a concrete patient or
//! just a triage class; [resolve_selection] turns the nomination into a
//! concrete pickup and applies the class fallback when the nominated class
//! has nobody left at the scene.

pub mod fifo;
pub mod myopic;
pub mod random;
pub mod scripted;

use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::{Entity, Resource};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::clock::SimTime;
use crate::distributions::{ServiceTimeModel, TravelTimeModel};
use crate::ecs::{PerClass, TriageClass};

pub use fifo::{FifoSelection, QueueEnd};
pub use myopic::MyopicSelection;
pub use random::RandomSelection;
pub use scripted::ScriptedSelection;

/// Configurable policy names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicyKind {
    #[default]
    Random,
    Myopic,
    FifoHead,
    FifoTail,
}

impl SelectionPolicyKind {
    pub const ALL: [SelectionPolicyKind; 4] = [
        SelectionPolicyKind::Random,
        SelectionPolicyKind::Myopic,
        SelectionPolicyKind::FifoHead,
        SelectionPolicyKind::FifoTail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicyKind::Random => "random",
            SelectionPolicyKind::Myopic => "myopic",
            SelectionPolicyKind::FifoHead => "fifo_head",
            SelectionPolicyKind::FifoTail => "fifo_tail",
        }
    }

    pub fn build(&self) -> Box<dyn SelectionPolicy> {
        match self {
            SelectionPolicyKind::Random => Box::new(RandomSelection),
            SelectionPolicyKind::Myopic => Box::new(MyopicSelection::default()),
            SelectionPolicyKind::FifoHead => Box::new(FifoSelection::new(QueueEnd::Head)),
            SelectionPolicyKind::FifoTail => Box::new(FifoSelection::new(QueueEnd::Tail)),
        }
    }
}

impl fmt::Display for SelectionPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionPolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "random" => Ok(SelectionPolicyKind::Random),
            "myopic" => Ok(SelectionPolicyKind::Myopic),
            "fifo_head" | "first" => Ok(SelectionPolicyKind::FifoHead),
            "fifo_tail" | "last" => Ok(SelectionPolicyKind::FifoTail),
            other => Err(format!("unknown selection policy: {other}")),
        }
    }
}

/// A patient still at the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitingPatient {
    pub entity: Entity,
    pub id: u32,
    pub class: TriageClass,
}

/// Read-only view of a hospital at decision time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HospitalView {
    pub entity: Entity,
    pub id: u32,
    pub distance: f64,
    pub servers: PerClass<u32>,
    pub occupancy: PerClass<u32>,
}

/// Everything a policy may look at when choosing a pickup.
#[derive(Debug, Clone)]
pub struct SelectionState {
    pub now: SimTime,
    /// Patients picked up so far in this run.
    pub picked_up: usize,
    /// Waiting patients in queue order (earliest first).
    pub waiting: Vec<WaitingPatient>,
    /// Hospitals ordered by id.
    pub hospitals: Vec<HospitalView>,
    pub travel: TravelTimeModel,
    pub service: ServiceTimeModel,
}

impl SelectionState {
    pub fn earliest_of(&self, class: TriageClass) -> Option<&WaitingPatient> {
        self.waiting.iter().find(|p| p.class == class)
    }

    pub fn has_waiting(&self, class: TriageClass) -> bool {
        self.earliest_of(class).is_some()
    }
}

/// Which patient a policy wants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatientChoice {
    Patient(Entity),
    /// The earliest waiting patient of this class.
    EarliestOf(TriageClass),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nomination {
    pub patient: PatientChoice,
    pub hospital: Entity,
}

/// A resolved pickup decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub patient: Entity,
    pub hospital: Entity,
    /// The nominated class had nobody waiting and the other class was used.
    pub fallback: bool,
}

/// Strategy for choosing the next pickup.
///
/// `select` is only called when at least one patient is waiting and at least
/// one hospital exists. All randomness must come from `rng`.
pub trait SelectionPolicy: Send + Sync {
    fn name(&self) -> &str;

    fn select(&self, state: &SelectionState, rng: &mut StdRng) -> Nomination;

    /// Hospital to use when the pickup falls back to `class` after the
    /// nominated class turned out to be empty. Defaults to the nominated one.
    fn retarget(&self, class: TriageClass, nominated: Entity, state: &SelectionState) -> Entity {
        let _ = (class, state);
        nominated
    }
}

/// Asks `policy` for a pickup and resolves it against the waiting list.
///
/// A nomination of an empty class falls back to the earliest waiting patient
/// of the other class. A nomination naming a patient who is not waiting, or
/// a hospital that does not exist, falls back to the earliest waiting patient
/// and the first hospital. Returns `None` only when nobody is waiting or there
/// is no hospital.
pub fn resolve_selection(
    policy: &dyn SelectionPolicy,
    state: &SelectionState,
    rng: &mut StdRng,
) -> Option<Selection> {
    let first_waiting = state.waiting.first()?;
    let first_hospital = state.hospitals.first()?;
    let invalid = Selection {
        patient: first_waiting.entity,
        hospital: first_hospital.entity,
        fallback: true,
    };

    let nomination = policy.select(state, rng);
    if !state.hospitals.iter().any(|h| h.entity == nomination.hospital) {
        tracing::warn!(policy = policy.name(), "policy nominated an unknown hospital");
        return Some(invalid);
    }

    match nomination.patient {
        PatientChoice::Patient(entity) => {
            if !state.waiting.iter().any(|p| p.entity == entity) {
                tracing::warn!(policy = policy.name(), "policy nominated a patient not at the scene");
                return Some(invalid);
            }
            Some(Selection {
                patient: entity,
                hospital: nomination.hospital,
                fallback: false,
            })
        }
        PatientChoice::EarliestOf(class) => {
            if let Some(patient) = state.earliest_of(class) {
                return Some(Selection {
                    patient: patient.entity,
                    hospital: nomination.hospital,
                    fallback: false,
                });
            }
            let other = class.other();
            let patient = state.earliest_of(other)?;
            let retargeted = policy.retarget(other, nomination.hospital, state);
            let hospital = if state.hospitals.iter().any(|h| h.entity == retargeted) {
                retargeted
            } else {
                first_hospital.entity
            };
            tracing::debug!(
                policy = policy.name(),
                nominated = ?class,
                used = ?other,
                "nominated class has nobody waiting; falling back"
            );
            Some(Selection {
                patient: patient.entity,
                hospital,
                fallback: true,
            })
        }
    }
}

/// Resource wrapper for the selection policy trait object.
#[derive(Resource)]
pub struct SelectionPolicyResource(pub Box<dyn SelectionPolicy>);

impl SelectionPolicyResource {
    pub fn new(policy: Box<dyn SelectionPolicy>) -> Self {
        Self(policy)
    }
}

impl std::ops::Deref for SelectionPolicyResource {
    type Target = dyn SelectionPolicy;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::distributions::TimingMode;

    pub fn state(classes: &[TriageClass], hospitals: &[(f64, u32, u32)]) -> SelectionState {
        let waiting = classes
            .iter()
            .enumerate()
            .map(|(i, class)| WaitingPatient {
                entity: Entity::from_raw(100 + i as u32),
                id: i as u32,
                class: *class,
            })
            .collect();
        let hospitals = hospitals
            .iter()
            .enumerate()
            .map(|(i, (distance, imm, del))| HospitalView {
                entity: Entity::from_raw(i as u32),
                id: i as u32,
                distance: *distance,
                servers: PerClass::new(*imm, *del),
                occupancy: PerClass::default(),
            })
            .collect();
        SelectionState {
            now: 0.0,
            picked_up: 0,
            waiting,
            hospitals,
            travel: TravelTimeModel::new(TimingMode::Deterministic),
            service: ServiceTimeModel::new(TimingMode::Deterministic),
        }
    }
}
