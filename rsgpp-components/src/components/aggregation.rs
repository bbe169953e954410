//! Phase totals
//!
//! Moves condensed mass out of the gas-phase table and sums each phase over
//! components.

use ndarray::{Array1, ArrayView2, ArrayViewMut2, Axis};
use rsgpp_core::errors::{RSGPPError, RSGPPResult};
use serde::{Deserialize, Serialize};

/// Mass concentration of each phase at every time point (ug/m3)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTotals {
    /// Organic mass condensed into the particle phase
    pub particle: Array1<f64>,
    /// Organic mass remaining in the gas phase
    pub gas: Array1<f64>,
}

/// Apply condensed fractions to a gas-phase table.
///
/// For every time point $t$ and component $i$ the condensed mass is
/// $c_{t,i} = f_{t,i} \cdot g_{t,i}$. This is subtracted from `gas` in place,
/// so on return `gas` holds only the mass left in the gas phase.
///
/// Returns the particle-phase sum $\sum_i c_{t,i}$ and the sum of the updated
/// gas-phase table for each time point.
pub fn aggregate(
    condensed_fraction: ArrayView2<f64>,
    mut gas: ArrayViewMut2<f64>,
) -> RSGPPResult<PhaseTotals> {
    if condensed_fraction.dim() != gas.dim() {
        let (rows, cols) = gas.dim();
        let (fraction_rows, fraction_cols) = condensed_fraction.dim();
        return Err(if fraction_rows != rows {
            RSGPPError::DimensionMismatch {
                what: "condensed fraction time points".to_string(),
                expected: rows,
                found: fraction_rows,
            }
        } else {
            RSGPPError::DimensionMismatch {
                what: "condensed fraction components".to_string(),
                expected: cols,
                found: fraction_cols,
            }
        });
    }

    let condensed = &condensed_fraction * &gas;
    let particle = condensed.sum_axis(Axis(1));
    gas -= &condensed;
    let gas_total = gas.sum_axis(Axis(1));

    Ok(PhaseTotals {
        particle,
        gas: gas_total,
    })
}
