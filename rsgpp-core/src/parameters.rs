//! Solver parameters
//!
//! Numerical settings for the equilibrium partitioning solver.

use crate::constants::GAS_CONSTANT;
use crate::errors::{RSGPPError, RSGPPResult};
use serde::{Deserialize, Serialize};

/// Parameters controlling the fixed-point partitioning solve.
///
/// The solve for a time point stops once the summed condensed fraction of two
/// successive estimates agrees to within `tolerance`:
///
/// $$\frac{\left|\sum_i f_i - \sum_i s_i\right|}{\sum_i s_i} \le \epsilon$$
///
/// where $f$ is the previous estimate and $s$ the new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParameters {
    /// Relative convergence tolerance on the summed condensed fraction.
    ///
    /// Default: 1e-2 (1%)
    pub tolerance: f64,

    /// Maximum number of substitution iterations per time point.
    ///
    /// Exceeding this is reported as non-convergence for that time point
    /// rather than looping indefinitely. Well-posed inputs converge in a
    /// handful of iterations.
    ///
    /// Default: 1000
    pub max_iterations: usize,

    /// Gas constant used for effective saturation concentrations (J/mol/K).
    ///
    /// Default: 8.314 J/mol/K
    pub gas_constant: f64,

    /// Solve time points in parallel.
    ///
    /// Default: false
    pub parallel: bool,
}

impl Default for SolverParameters {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-2,
            max_iterations: 1000,
            gas_constant: GAS_CONSTANT,
            parallel: false,
        }
    }
}

impl SolverParameters {
    /// Parse parameters from a TOML document.
    ///
    /// Missing keys take their default values. The result is validated.
    pub fn from_toml_str(s: &str) -> RSGPPResult<Self> {
        let parameters: Self =
            toml::from_str(s).map_err(|e| RSGPPError::Config(e.to_string()))?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Serialise the parameters as a TOML document.
    pub fn to_toml_string(&self) -> RSGPPResult<String> {
        toml::to_string(self).map_err(|e| RSGPPError::Config(e.to_string()))
    }

    /// Check that the parameters describe a solvable configuration.
    pub fn validate(&self) -> RSGPPResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(RSGPPError::InvalidParameter {
                name: "tolerance".to_string(),
                reason: format!("must be positive and finite, got {}", self.tolerance),
            });
        }
        if self.max_iterations == 0 {
            return Err(RSGPPError::InvalidParameter {
                name: "max_iterations".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.gas_constant.is_finite() && self.gas_constant > 0.0) {
            return Err(RSGPPError::InvalidParameter {
                name: "gas_constant".to_string(),
                reason: format!("must be positive and finite, got {}", self.gas_constant),
            });
        }
        Ok(())
    }
}
