use bevy_ecs::prelude::Entity;
use rand::rngs::StdRng;

use super::{HospitalView, Nomination, PatientChoice, SelectionPolicy, SelectionState};
use crate::ecs::{PerClass, TriageClass};
use crate::survival::sll_surv;

pub const IMMEDIATE_ALPHA: f64 = -0.0207;
pub const DELAYED_ALPHA: f64 = -0.0038;

/// One-step greedy dispatch.
///
/// Scores every (class, hospital) pair with
///
/// ```text
/// τ · r(c, now + τ) · μ/(μ + α) · (bμ/(bμ + α))^(x + 1 − b)
/// ```
///
/// where τ is the expected travel time to the hospital, r the survival
/// curve, μ the mean service time of the class, b the hospital's server
/// count for the class, α the class discount and x the number of patients
/// picked up so far. The earliest waiting patient of the best class goes to
/// the best hospital. Ties keep the first pair in (Immediate, Delayed) ×
/// hospital-id order.
#[derive(Debug, Clone, Copy)]
pub struct MyopicSelection {
    pub alpha: PerClass<f64>,
}

impl Default for MyopicSelection {
    fn default() -> Self {
        Self {
            alpha: PerClass::new(IMMEDIATE_ALPHA, DELAYED_ALPHA),
        }
    }
}

impl MyopicSelection {
    pub fn reward(&self, class: TriageClass, hospital: &HospitalView, state: &SelectionState) -> f64 {
        let tau = state.travel.expected(hospital.distance);
        let survival = sll_surv(state.now + tau, class);
        let mu = state.service.mean(class);
        let alpha = self.alpha[class];
        let servers = hospital.servers[class] as f64;
        let picked_up = state.picked_up as f64;

        let discount = mu / (mu + alpha);
        let congestion =
            ((servers * mu) / (servers * mu + alpha)).powf(picked_up + 1.0 - servers);
        tau * survival * discount * congestion
    }

    fn best_hospital(&self, class: TriageClass, state: &SelectionState) -> Option<(Entity, f64)> {
        let mut best: Option<(Entity, f64)> = None;
        for hospital in &state.hospitals {
            let reward = self.reward(class, hospital, state);
            match best {
                Some((_, current)) if current >= reward => {}
                _ => best = Some((hospital.entity, reward)),
            }
        }
        best
    }
}

impl SelectionPolicy for MyopicSelection {
    fn name(&self) -> &str {
        "myopic"
    }

    fn select(&self, state: &SelectionState, _rng: &mut StdRng) -> Nomination {
        let mut best: Option<(TriageClass, Entity, f64)> = None;
        for class in TriageClass::ALL {
            if let Some((hospital, reward)) = self.best_hospital(class, state) {
                match best {
                    Some((_, _, current)) if current >= reward => {}
                    _ => best = Some((class, hospital, reward)),
                }
            }
        }

        // Hospitals are never empty when select is called.
        let (class, hospital) = best
            .map(|(class, hospital, _)| (class, hospital))
            .unwrap_or((TriageClass::Immediate, state.hospitals[0].entity));
        Nomination {
            patient: PatientChoice::EarliestOf(class),
            hospital,
        }
    }

    fn retarget(&self, class: TriageClass, nominated: Entity, state: &SelectionState) -> Entity {
        self.best_hospital(class, state)
            .map(|(hospital, _)| hospital)
            .unwrap_or(nominated)
    }
}
