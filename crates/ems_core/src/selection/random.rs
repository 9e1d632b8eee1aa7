use rand::rngs::StdRng;
use rand::Rng;

use super::{Nomination, PatientChoice, SelectionPolicy, SelectionState};

/// Uniform choice of waiting patient, then an independent uniform choice of
/// hospital. Baseline for comparing the other policies.
#[derive(Debug, Default)]
pub struct RandomSelection;

impl SelectionPolicy for RandomSelection {
    fn name(&self) -> &str {
        "random"
    }

    fn select(&self, state: &SelectionState, rng: &mut StdRng) -> Nomination {
        let patient = state.waiting[rng.gen_range(0..state.waiting.len())].entity;
        let hospital = state.hospitals[rng.gen_range(0..state.hospitals.len())].entity;
        Nomination {
            patient: PatientChoice::Patient(patient),
            hospital,
        }
    }
}
