//! Equilibrium gas-particle partitioning of semi-volatile organics
//!
//! Given the molar mass and saturation vapour pressure of each component, a
//! temperature, a seed particle mass and the gas-phase mass concentration of
//! every component over a series of time points, estimates how much organic
//! mass condenses into the particle phase at each time point.
//!
//! # Crate Organisation
//!
//! - [`rsgpp_core`]: errors, constants, mixtures, gas-phase tables and solver
//!   parameters
//! - [`rsgpp_components`]: effective saturation concentrations, the fixed-point
//!   solver and the phase totals
//!
//! Most callers want [`EquilibriumPartitioning`]; [`particle_mass_time_series`]
//! is a one-call shortcut over plain arrays.

pub use rsgpp_components;
pub use rsgpp_core;

pub use rsgpp_components::components::{
    effective_saturation_concentration, solve_time_point, EquilibriumPartitioning,
    PartitionStatus, PartitioningSummary, TimePointOutcome,
};
pub use rsgpp_core::errors::{RSGPPError, RSGPPResult};
pub use rsgpp_core::mixture::{Component, Mixture};
pub use rsgpp_core::parameters::SolverParameters;
pub use rsgpp_core::timeseries::GasPhaseTable;

use log::debug;
use ndarray::{Array1, Array2};

/// Secondary organic particle mass concentration (ug/m3) at every time point.
///
/// `concentrations` holds the gas-phase mass concentration of each component
/// (columns) at each of the `time` points (rows). On success it is updated in
/// place to hold only the mass remaining in the gas phase.
///
/// Unlike [`EquilibriumPartitioning::solve`] this is all or nothing: if any
/// time point fails to converge the error is returned and `concentrations` is
/// left unchanged.
pub fn particle_mass_time_series(
    molar_mass: &[f64],
    saturation_vapour_pressure: &[f64],
    temperature: f64,
    concentrations: &mut Array2<f64>,
    time: &[f64],
    seed_mass: f64,
) -> RSGPPResult<Array1<f64>> {
    let mixture = Mixture::from_arrays(molar_mass, saturation_vapour_pressure)?;
    let solver = EquilibriumPartitioning::new(mixture, temperature, seed_mass)?;
    let mut table = GasPhaseTable::new(Array1::from(time.to_vec()), concentrations.clone())?;

    let summary = solver.solve(&mut table)?.into_result()?;
    debug!("gas-phase organic mass: {}", summary.gas_mass);

    concentrations.assign(&table.concentrations());
    Ok(summary.particle_mass)
}
