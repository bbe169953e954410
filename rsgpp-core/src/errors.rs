use thiserror::Error;

/// Error type for invalid inputs and failed solves.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RSGPPError {
    #[error("Temperature must be positive and finite, got {0} K")]
    NonPositiveTemperature(f64),
    #[error("Molar mass of component {component} must be positive and finite, got {value} g/mol")]
    InvalidMolarMass { component: String, value: f64 },
    #[error("Saturation vapour pressure of component {component} must be positive and finite, got {value} Pa")]
    InvalidSaturationVapourPressure { component: String, value: f64 },
    #[error("Concentration at time index {time_index}, component {component} must be non-negative and finite, got {value} ug/m3")]
    InvalidConcentration {
        time_index: usize,
        component: usize,
        value: f64,
    },
    #[error("Seed mass must be non-negative and finite, got {0} ug/m3")]
    InvalidSeedMass(f64),
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid solver parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("Equilibrium did not converge at time index {time_index} after {iterations} iterations (relative change {relative_change:e})")]
    NonConvergence {
        time_index: usize,
        iterations: usize,
        relative_change: f64,
    },
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type for `Result<T, RSGPPError>`.
pub type RSGPPResult<T> = Result<T, RSGPPError>;
