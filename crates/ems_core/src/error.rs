use thiserror::Error;

/// A scenario that cannot be simulated. Raised before any entity is spawned.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("at least one ambulance is required")]
    NoAmbulances,

    #[error("at least one hospital is required")]
    NoHospitals,

    #[error("hospital {index} has invalid distance {distance} (must be finite and > 0)")]
    InvalidDistance { index: usize, distance: f64 },

    #[error("malformed scenario: {0}")]
    Malformed(#[from] serde_json::Error),
}
