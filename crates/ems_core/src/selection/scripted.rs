use rand::rngs::StdRng;

use super::{Nomination, PatientChoice, SelectionPolicy, SelectionState};
use crate::ecs::TriageClass;

/// Replays operator decisions: the n-th pickup of the run takes the earliest
/// waiting patient of `script[n].0` to the hospital with index `script[n].1`.
///
/// Once the script is exhausted, or if it names a hospital index that does
/// not exist, the earliest waiting patient goes to the first hospital.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSelection {
    pub script: Vec<(TriageClass, usize)>,
}

impl ScriptedSelection {
    pub fn new(script: Vec<(TriageClass, usize)>) -> Self {
        Self { script }
    }
}

impl SelectionPolicy for ScriptedSelection {
    fn name(&self) -> &str {
        "scripted"
    }

    fn select(&self, state: &SelectionState, _rng: &mut StdRng) -> Nomination {
        let scripted = self
            .script
            .get(state.picked_up)
            .and_then(|(class, index)| state.hospitals.get(*index).map(|h| (*class, h.entity)));

        match scripted {
            Some((class, hospital)) => Nomination {
                patient: PatientChoice::EarliestOf(class),
                hospital,
            },
            None => Nomination {
                patient: PatientChoice::Patient(state.waiting[0].entity),
                hospital: state.hospitals[0].entity,
            },
        }
    }
}
