//! Effective saturation concentration
//!
//! Converts pure-component saturation vapour pressures into the mass
//! concentration scale used by absorptive partitioning theory.

use ndarray::{Array1, ArrayView1, Zip};
use rsgpp_core::constants::GRAMS_TO_MICROGRAMS;
use rsgpp_core::errors::{RSGPPError, RSGPPResult};

/// Effective saturation concentration of each component (ug/m3)
///
/// $$ C^*_i = 10^6 \frac{M_i P^{sat}_i}{R T} $$
///
/// Where:
/// - $M_i$ is the molar mass (g/mol)
/// - $P^{sat}_i$ is the pure-component saturation vapour pressure (Pa)
/// - $R$ is the gas constant (J/mol/K)
/// - $T$ is the temperature (K)
///
/// Returns an error rather than a meaningless result if the temperature or any
/// molar mass or saturation vapour pressure is not positive and finite.
pub fn effective_saturation_concentration(
    molar_mass: ArrayView1<f64>,
    saturation_vapour_pressure: ArrayView1<f64>,
    temperature: f64,
    gas_constant: f64,
) -> RSGPPResult<Array1<f64>> {
    if !(temperature.is_finite() && temperature > 0.0) {
        return Err(RSGPPError::NonPositiveTemperature(temperature));
    }
    if !(gas_constant.is_finite() && gas_constant > 0.0) {
        return Err(RSGPPError::InvalidParameter {
            name: "gas_constant".to_string(),
            reason: format!("must be positive and finite, got {}", gas_constant),
        });
    }
    if molar_mass.len() != saturation_vapour_pressure.len() {
        return Err(RSGPPError::DimensionMismatch {
            what: "saturation vapour pressures".to_string(),
            expected: molar_mass.len(),
            found: saturation_vapour_pressure.len(),
        });
    }
    for (i, (&mm, &psat)) in molar_mass
        .iter()
        .zip(saturation_vapour_pressure.iter())
        .enumerate()
    {
        if !(mm.is_finite() && mm > 0.0) {
            return Err(RSGPPError::InvalidMolarMass {
                component: i.to_string(),
                value: mm,
            });
        }
        if !(psat.is_finite() && psat > 0.0) {
            return Err(RSGPPError::InvalidSaturationVapourPressure {
                component: i.to_string(),
                value: psat,
            });
        }
    }

    let rt = gas_constant * temperature;
    Ok(Zip::from(molar_mass)
        .and(saturation_vapour_pressure)
        .map_collect(|&mm, &psat| GRAMS_TO_MICROGRAMS * mm * psat / rt))
}
