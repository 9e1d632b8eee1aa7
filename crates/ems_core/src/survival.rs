//! Shifted log-logistic survival curves for penetrating trauma.

use crate::ecs::TriageClass;

/// Parameters of `β0 / (1 + (t/β1)^β2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurvivalCurve {
    pub beta0: f64,
    pub beta1: f64,
    pub beta2: f64,
}

pub const IMMEDIATE_CURVE: SurvivalCurve = SurvivalCurve {
    beta0: 0.3510,
    beta1: 35.838,
    beta2: 1.9886,
};

pub const DELAYED_CURVE: SurvivalCurve = SurvivalCurve {
    beta0: 0.9124,
    beta1: 213.5976,
    beta2: 2.3445,
};

impl SurvivalCurve {
    pub fn for_class(class: TriageClass) -> Self {
        match class {
            TriageClass::Immediate => IMMEDIATE_CURVE,
            TriageClass::Delayed => DELAYED_CURVE,
        }
    }

    pub fn probability(&self, time: f64) -> f64 {
        self.beta0 / (1.0 + (time / self.beta1).powf(self.beta2))
    }
}

/// Survival probability of a `class` patient whose treatment ends `time`
/// minutes after the incident.
pub fn sll_surv(time: f64, class: TriageClass) -> f64 {
    SurvivalCurve::for_class(class).probability(time)
}
