use rand::rngs::StdRng;
use rand::Rng;

use super::{Nomination, PatientChoice, SelectionPolicy, SelectionState};

/// Which end of the scene's waiting list to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueEnd {
    /// Earliest-queued patient first.
    Head,
    /// Latest-queued patient first.
    Tail,
}

/// Deterministic patient order with a uniformly random hospital.
#[derive(Debug, Clone, Copy)]
pub struct FifoSelection {
    pub end: QueueEnd,
}

impl FifoSelection {
    pub fn new(end: QueueEnd) -> Self {
        Self { end }
    }
}

impl SelectionPolicy for FifoSelection {
    fn name(&self) -> &str {
        match self.end {
            QueueEnd::Head => "fifo_head",
            QueueEnd::Tail => "fifo_tail",
        }
    }

    fn select(&self, state: &SelectionState, rng: &mut StdRng) -> Nomination {
        let patient = match self.end {
            QueueEnd::Head => state.waiting[0].entity,
            QueueEnd::Tail => state.waiting[state.waiting.len() - 1].entity,
        };
        let hospital = state.hospitals[rng.gen_range(0..state.hospitals.len())].entity;
        Nomination {
            patient: PatientChoice::Patient(patient),
            hospital,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::TriageClass;
    use crate::selection::test_support::state;
    use rand::SeedableRng;

    #[test]
    fn head_and_tail_take_opposite_ends() {
        let state = state(
            &[TriageClass::Immediate, TriageClass::Delayed, TriageClass::Delayed],
            &[(1.0, 1, 1)],
        );
        let mut rng = StdRng::seed_from_u64(0);
        let head = FifoSelection::new(QueueEnd::Head).select(&state, &mut rng);
        let tail = FifoSelection::new(QueueEnd::Tail).select(&state, &mut rng);
        assert_eq!(head.patient, PatientChoice::Patient(state.waiting[0].entity));
        assert_eq!(tail.patient, PatientChoice::Patient(state.waiting[2].entity));
    }
}
