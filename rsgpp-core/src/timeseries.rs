//! Gas-phase mass concentrations over time.

use crate::errors::{RSGPPError, RSGPPResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut2, Axis};
use serde::{Deserialize, Serialize};

/// Time (s)
pub type Time = f64;

/// Gas-phase mass concentrations (ug/m3) of each component at each time point.
///
/// Rows are time points, columns are components. The time axis labels the rows
/// and plays no part in the partitioning arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGasPhaseTable")]
pub struct GasPhaseTable {
    time: Array1<Time>,
    concentrations: Array2<f64>,
}

/// Unchecked form of [`GasPhaseTable`], validated on deserialisation
#[derive(Deserialize)]
struct RawGasPhaseTable {
    time: Array1<Time>,
    concentrations: Array2<f64>,
}

impl TryFrom<RawGasPhaseTable> for GasPhaseTable {
    type Error = RSGPPError;

    fn try_from(raw: RawGasPhaseTable) -> RSGPPResult<Self> {
        Self::new(raw.time, raw.concentrations)
    }
}

impl GasPhaseTable {
    /// Create a table, checking the time axis matches the number of rows and
    /// that every concentration is non-negative and finite.
    pub fn new(time: Array1<Time>, concentrations: Array2<f64>) -> RSGPPResult<Self> {
        if time.len() != concentrations.nrows() {
            return Err(RSGPPError::DimensionMismatch {
                what: "time points".to_string(),
                expected: concentrations.nrows(),
                found: time.len(),
            });
        }
        validate_concentrations(concentrations.view())?;
        Ok(Self {
            time,
            concentrations,
        })
    }

    /// Create a table whose time axis is just the row index.
    pub fn from_concentrations(concentrations: Array2<f64>) -> RSGPPResult<Self> {
        let time = Array1::range(0.0, concentrations.nrows() as f64, 1.0);
        Self::new(time, concentrations)
    }

    pub fn n_times(&self) -> usize {
        self.concentrations.nrows()
    }

    pub fn n_components(&self) -> usize {
        self.concentrations.ncols()
    }

    pub fn time(&self) -> ArrayView1<Time> {
        self.time.view()
    }

    pub fn concentrations(&self) -> ArrayView2<f64> {
        self.concentrations.view()
    }

    /// Mutable access to the concentrations.
    ///
    /// Used by the solver to remove condensed mass in place. Values written
    /// here are checked again when the table is next solved.
    pub fn concentrations_mut(&mut self) -> ArrayViewMut2<f64> {
        self.concentrations.view_mut()
    }

    /// Concentrations of every component at one time point.
    ///
    /// Panics if `time_index` is out of bounds.
    pub fn row(&self, time_index: usize) -> ArrayView1<f64> {
        self.concentrations.row(time_index)
    }

    /// Total gas-phase mass summed over components at each time point.
    pub fn total_mass(&self) -> Array1<f64> {
        self.concentrations.sum_axis(Axis(1))
    }
}

/// Check that every concentration is non-negative and finite.
pub fn validate_concentrations(concentrations: ArrayView2<f64>) -> RSGPPResult<()> {
    for ((time_index, component), &value) in concentrations.indexed_iter() {
        if !(value.is_finite() && value >= 0.0) {
            return Err(RSGPPError::InvalidConcentration {
                time_index,
                component,
                value,
            });
        }
    }
    Ok(())
}
