//! Travel-time and service-time generators.
//!
//! Both models support a deterministic mode (fixed values, for regression
//! tests) and a stochastic mode (Monte Carlo study). All draws come from the
//! run-scoped [SimRng], so a seed fully determines a run.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Exp1, LogNormal};
use serde::{Deserialize, Serialize};

use crate::ecs::{PerClass, TriageClass};

/// Deterministic travel minutes per unit of distance.
const DETERMINISTIC_MINUTES_PER_DISTANCE: f64 = 1.5;
/// Stochastic travel time is `TRAVEL_SCALE * LogNormal(mu, sigma)`.
const TRAVEL_SCALE: f64 = 60.0;
const TRAVEL_MU_PER_DISTANCE: f64 = 0.025;
const TRAVEL_SIGMA_PER_DISTANCE: f64 = 0.01;

pub const IMMEDIATE_SERVICE_MEAN: f64 = 90.0;
pub const DELAYED_SERVICE_MEAN: f64 = 180.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingMode {
    Deterministic,
    #[default]
    Stochastic,
}

/// The single random stream of a run.
#[derive(Debug, Resource)]
pub struct SimRng(pub StdRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Ambulance transit time between the scene and a hospital (either direction).
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct TravelTimeModel {
    pub mode: TimingMode,
}

impl TravelTimeModel {
    pub fn new(mode: TimingMode) -> Self {
        Self { mode }
    }

    pub fn sample<R: Rng + ?Sized>(&self, distance: f64, rng: &mut R) -> f64 {
        match self.mode {
            TimingMode::Deterministic => DETERMINISTIC_MINUTES_PER_DISTANCE * distance,
            TimingMode::Stochastic => {
                let mu = TRAVEL_MU_PER_DISTANCE * distance;
                let sigma = TRAVEL_SIGMA_PER_DISTANCE * distance;
                // Distances are validated positive and finite, so sigma is too.
                match LogNormal::new(mu, sigma) {
                    Ok(log_normal) => TRAVEL_SCALE * rng.sample(log_normal),
                    Err(_) => TRAVEL_SCALE * mu.exp(),
                }
            }
        }
    }

    /// Mean of [Self::sample] for the given distance.
    pub fn expected(&self, distance: f64) -> f64 {
        match self.mode {
            TimingMode::Deterministic => DETERMINISTIC_MINUTES_PER_DISTANCE * distance,
            TimingMode::Stochastic => {
                let mu = TRAVEL_MU_PER_DISTANCE * distance;
                let sigma = TRAVEL_SIGMA_PER_DISTANCE * distance;
                TRAVEL_SCALE * (mu + sigma * sigma / 2.0).exp()
            }
        }
    }
}

/// Treatment duration per triage class.
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct ServiceTimeModel {
    pub mode: TimingMode,
    pub means: PerClass<f64>,
}

impl ServiceTimeModel {
    pub fn new(mode: TimingMode) -> Self {
        Self {
            mode,
            means: PerClass::new(IMMEDIATE_SERVICE_MEAN, DELAYED_SERVICE_MEAN),
        }
    }

    pub fn mean(&self, class: TriageClass) -> f64 {
        self.means[class]
    }

    pub fn sample<R: Rng + ?Sized>(&self, class: TriageClass, rng: &mut R) -> f64 {
        match self.mode {
            TimingMode::Deterministic => self.means[class],
            TimingMode::Stochastic => {
                let unit: f64 = rng.sample(Exp1);
                unit * self.means[class]
            }
        }
    }
}
