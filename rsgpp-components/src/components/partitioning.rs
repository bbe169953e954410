//! Equilibrium gas-particle partitioning
//!
//! Estimates how much of each semi-volatile component sits in the particle
//! phase at every time point, assuming instantaneous absorptive equilibrium.
//!
//! # What This Component Does
//!
//! 1. Converts saturation vapour pressures into effective saturation
//!    concentrations $C^*_i$ (once per solve).
//! 2. For each time point, solves for the condensed fraction $\xi_i$ of every
//!    component by successive substitution:
//!    $$\xi_i = \left(1 + \frac{C^*_i}{M_{seed} + \sum_j \xi_j C_j}\right)^{-1}$$
//!    where $C_j$ is the total mass concentration of component $j$ at that
//!    time point. The absorbing mass in the denominator depends on the
//!    fractions being solved for, hence the iteration.
//! 3. Removes the condensed mass from the gas-phase table and sums both phases.
//!
//! # Inputs
//!
//! - Mixture molar masses (g/mol) and saturation vapour pressures (Pa)
//! - Temperature (K)
//! - Seed particle mass concentration (ug/m3)
//! - Gas-phase mass concentrations (ug/m3), one row per time point
//!
//! # Outputs
//!
//! - Condensed fraction per time point and component
//! - Particle-phase and gas-phase organic mass per time point (ug/m3)
//! - The gas-phase table, updated in place to hold only uncondensed mass
//!
//! # Edge Cases
//!
//! - **Iteration cap**: the substitution is bounded by
//!   [`SolverParameters::max_iterations`]. A time point that hits the cap is
//!   reported as [`RSGPPError::NonConvergence`]; its fractions are left at zero
//!   and its gas-phase row is not modified. Other time points are unaffected.
//! - **Absent components**: a component with zero mass at a time point has a
//!   condensed fraction of exactly zero. This does not change the fixed point
//!   of the other components since it contributes no absorbing mass.

use super::aggregation::aggregate;
use super::saturation::effective_saturation_concentration;
use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1, Zip};
use rsgpp_core::errors::{RSGPPError, RSGPPResult};
use rsgpp_core::mixture::Mixture;
use rsgpp_core::parameters::SolverParameters;
use rsgpp_core::timeseries::{validate_concentrations, GasPhaseTable, Time};
use serde::{Deserialize, Serialize};

/// How a time point reached its condensed fractions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartitionStatus {
    /// Successive estimates agreed within the tolerance
    Converged {
        iterations: usize,
        relative_change: f64,
    },
    /// The first estimate was zero for every component so nothing condenses.
    ///
    /// Happens when no component has any mass, or when there is no seed mass
    /// to start absorption.
    NothingToCondense,
}

/// Result of partitioning a single time point
pub type TimePointOutcome = RSGPPResult<PartitionStatus>;

/// Condensed fractions of one time point
#[derive(Debug, Clone, PartialEq)]
pub struct TimePointSolution {
    pub condensed_fraction: Array1<f64>,
    pub status: PartitionStatus,
}

/// One substitution step
///
/// Writes $\left(1 + C^*_i / (M_{seed} + \sum_j f_j C_j)\right)^{-1}$ into
/// `next`, or zero for components without any mass.
fn substitute(
    cstar: ArrayView1<f64>,
    total_mass: ArrayView1<f64>,
    seed_mass: f64,
    estimate: ArrayView1<f64>,
    next: ArrayViewMut1<f64>,
) {
    let absorbing_mass = seed_mass + estimate.dot(&total_mass);

    // A zero absorbing mass gives C*/0 = inf and therefore a zero fraction
    Zip::from(next)
        .and(cstar)
        .and(total_mass)
        .for_each(|next, &cstar, &mass| {
            *next = if mass > 0.0 {
                1.0 / (1.0 + cstar / absorbing_mass)
            } else {
                0.0
            };
        });
}

/// Solve the condensed fractions of a single time point.
///
/// Starts from the assumption that nothing has condensed, then substitutes
/// the implied absorbing mass back in until the summed fraction changes by no
/// more than `parameters.tolerance` relative to the newest estimate.
///
/// This only reads its arguments, so time points can be solved independently.
/// `time_index` only labels a [`RSGPPError::NonConvergence`] error.
pub fn solve_time_point(
    time_index: usize,
    cstar: ArrayView1<f64>,
    total_mass: ArrayView1<f64>,
    seed_mass: f64,
    parameters: &SolverParameters,
) -> RSGPPResult<TimePointSolution> {
    if cstar.len() != total_mass.len() {
        return Err(RSGPPError::DimensionMismatch {
            what: "time point components".to_string(),
            expected: cstar.len(),
            found: total_mass.len(),
        });
    }

    let n = cstar.len();
    let mut estimate = Array1::<f64>::zeros(n);
    let mut next = Array1::<f64>::zeros(n);
    substitute(cstar, total_mass, seed_mass, estimate.view(), next.view_mut());

    if next.sum() == 0.0 {
        return Ok(TimePointSolution {
            condensed_fraction: next,
            status: PartitionStatus::NothingToCondense,
        });
    }

    let mut iterations = 0;
    loop {
        let next_sum = next.sum();
        let relative_change = (estimate.sum() - next_sum).abs() / next_sum;

        if relative_change <= parameters.tolerance {
            return Ok(TimePointSolution {
                condensed_fraction: next,
                status: PartitionStatus::Converged {
                    iterations,
                    relative_change,
                },
            });
        }
        if iterations >= parameters.max_iterations {
            return Err(RSGPPError::NonConvergence {
                time_index,
                iterations,
                relative_change,
            });
        }

        std::mem::swap(&mut estimate, &mut next);
        substitute(cstar, total_mass, seed_mass, estimate.view(), next.view_mut());
        iterations += 1;
    }
}

/// Everything produced by partitioning a gas-phase table
#[derive(Debug, Clone, PartialEq)]
pub struct PartitioningSummary {
    /// Time axis of the table (s)
    pub time: Array1<Time>,
    /// Effective saturation concentration of each component (ug/m3)
    pub effective_saturation_concentration: Array1<f64>,
    /// Condensed fraction, time points by components
    pub condensed_fraction: Array2<f64>,
    /// Organic mass in the particle phase at each time point (ug/m3)
    pub particle_mass: Array1<f64>,
    /// Organic mass remaining in the gas phase at each time point (ug/m3)
    pub gas_mass: Array1<f64>,
    /// Status of each time point, in time order
    pub outcomes: Vec<TimePointOutcome>,
}

impl PartitioningSummary {
    pub fn all_converged(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_ok())
    }

    /// Errors of the time points that failed to converge
    pub fn failures(&self) -> impl Iterator<Item = &RSGPPError> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    /// Turn the first per-time-point failure, if any, into an error.
    pub fn into_result(self) -> RSGPPResult<Self> {
        if let Some(err) = self.failures().next() {
            return Err(err.clone());
        }
        Ok(self)
    }
}

/// Equilibrium partitioning of a mixture over a series of time points
///
/// Holds the time-invariant inputs: the mixture, the temperature, the seed
/// particle mass and the solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumPartitioning {
    mixture: Mixture,
    /// unit: K
    temperature: f64,
    /// Non-organic particle mass available for absorption
    /// unit: ug / m^3
    seed_mass: f64,
    #[serde(default)]
    parameters: SolverParameters,
}

impl EquilibriumPartitioning {
    /// Create a solver with default parameters
    pub fn new(mixture: Mixture, temperature: f64, seed_mass: f64) -> RSGPPResult<Self> {
        Self::from_parameters(mixture, temperature, seed_mass, SolverParameters::default())
    }

    /// Create a solver from parameters
    pub fn from_parameters(
        mixture: Mixture,
        temperature: f64,
        seed_mass: f64,
        parameters: SolverParameters,
    ) -> RSGPPResult<Self> {
        let solver = Self {
            mixture,
            temperature,
            seed_mass,
            parameters,
        };
        solver.validate()?;
        Ok(solver)
    }

    pub fn mixture(&self) -> &Mixture {
        &self.mixture
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn seed_mass(&self) -> f64 {
        self.seed_mass
    }

    pub fn parameters(&self) -> &SolverParameters {
        &self.parameters
    }

    pub fn validate(&self) -> RSGPPResult<()> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(RSGPPError::NonPositiveTemperature(self.temperature));
        }
        if !(self.seed_mass.is_finite() && self.seed_mass >= 0.0) {
            return Err(RSGPPError::InvalidSeedMass(self.seed_mass));
        }
        self.parameters.validate()
    }

    /// Effective saturation concentration of each component (ug/m3)
    pub fn effective_saturation_concentrations(&self) -> RSGPPResult<Array1<f64>> {
        effective_saturation_concentration(
            self.mixture.molar_masses().view(),
            self.mixture.saturation_vapour_pressures().view(),
            self.temperature,
            self.parameters.gas_constant,
        )
    }

    /// The table may have been edited through `concentrations_mut` since it
    /// was built, so its values are checked again here.
    fn check_table(&self, table: &GasPhaseTable) -> RSGPPResult<()> {
        if table.n_components() != self.mixture.len() {
            return Err(RSGPPError::DimensionMismatch {
                what: "gas-phase table components".to_string(),
                expected: self.mixture.len(),
                found: table.n_components(),
            });
        }
        validate_concentrations(table.concentrations())
    }

    fn solve_row(
        &self,
        cstar: ArrayView1<f64>,
        time_index: usize,
        mut condensed_fraction: ArrayViewMut1<f64>,
        total_mass: ArrayView1<f64>,
    ) -> TimePointOutcome {
        match solve_time_point(time_index, cstar, total_mass, self.seed_mass, &self.parameters) {
            Ok(solution) => {
                debug!(
                    "time index {}: {:?}, condensed fraction {}",
                    time_index, solution.status, solution.condensed_fraction
                );
                condensed_fraction.assign(&solution.condensed_fraction);
                Ok(solution.status)
            }
            Err(err) => {
                warn!("{}, leaving gas phase unchanged", err);
                Err(err)
            }
        }
    }

    /// Condensed fractions for every time point of `table`, without modifying it.
    ///
    /// Rows that fail to converge are left at zero and reported in the
    /// returned outcomes.
    pub fn condensed_fractions(
        &self,
        table: &GasPhaseTable,
    ) -> RSGPPResult<(Array2<f64>, Vec<TimePointOutcome>)> {
        self.validate()?;
        self.check_table(table)?;
        let cstar = self.effective_saturation_concentrations()?;
        let outcomes = self.condensed_fractions_with(cstar.view(), table);
        Ok(outcomes)
    }

    fn condensed_fractions_with(
        &self,
        cstar: ArrayView1<f64>,
        table: &GasPhaseTable,
    ) -> (Array2<f64>, Vec<TimePointOutcome>) {
        let mut condensed_fraction = Array2::zeros((table.n_times(), table.n_components()));
        let concentrations = table.concentrations();

        // Each row of the output is written by exactly one time point
        let zip = Zip::indexed(condensed_fraction.rows_mut()).and(concentrations.rows());
        let outcomes = if self.parameters.parallel {
            zip.par_map_collect(|time_index, row, total_mass| {
                self.solve_row(cstar, time_index, row, total_mass)
            })
        } else {
            zip.map_collect(|time_index, row, total_mass| {
                self.solve_row(cstar, time_index, row, total_mass)
            })
        };

        (condensed_fraction, outcomes.to_vec())
    }

    /// Partition every time point of `table`.
    ///
    /// **Mutates `table` in place**: on return it holds only the mass left in
    /// the gas phase. Clone the table first if the totals are still needed.
    ///
    /// Input errors, including negative or non-finite concentrations, are
    /// returned before any time point is solved and leave `table` untouched. Time points
    /// that fail to converge do not abort the solve; they are reported in
    /// [`PartitioningSummary::outcomes`].
    pub fn solve(&self, table: &mut GasPhaseTable) -> RSGPPResult<PartitioningSummary> {
        self.validate()?;
        self.check_table(table)?;
        let cstar = self.effective_saturation_concentrations()?;

        let (condensed_fraction, outcomes) = self.condensed_fractions_with(cstar.view(), table);
        let totals = aggregate(condensed_fraction.view(), table.concentrations_mut())?;

        let n_failed = outcomes.iter().filter(|o| o.is_err()).count();
        info!(
            "partitioned {} components over {} time points ({} not converged)",
            table.n_components(),
            table.n_times(),
            n_failed
        );

        Ok(PartitioningSummary {
            time: table.time().to_owned(),
            effective_saturation_concentration: cstar,
            condensed_fraction,
            particle_mass: totals.particle,
            gas_mass: totals.gas,
            outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use is_close::is_close;
    use ndarray::array;

    fn reference_cstar() -> Array1<f64> {
        effective_saturation_concentration(
            array![100.0, 500.0].view(),
            array![1e-2, 1e-5].view(),
            298.15,
            8.314,
        )
        .unwrap()
    }

    fn reference_solver() -> EquilibriumPartitioning {
        let mixture = Mixture::from_arrays(&[100.0, 500.0], &[1e-2, 1e-5]).unwrap();
        EquilibriumPartitioning::new(mixture, 298.15, 1.0).unwrap()
    }

    fn reference_table() -> GasPhaseTable {
        GasPhaseTable::new(array![0.0, 2.7e3], array![[1.0, 0.0], [0.3, 0.7]]).unwrap()
    }

    fn iterations_of(status: PartitionStatus) -> usize {
        match status {
            PartitionStatus::Converged { iterations, .. } => iterations,
            PartitionStatus::NothingToCondense => 0,
        }
    }

    // ===== Single Time Point Tests =====

    #[test]
    fn test_reference_time_points_converge() {
        let cstar = reference_cstar();
        let params = SolverParameters::default();

        let first = solve_time_point(0, cstar.view(), array![1.0, 0.0].view(), 1.0, &params).unwrap();
        let second =
            solve_time_point(1, cstar.view(), array![0.3, 0.7].view(), 1.0, &params).unwrap();

        assert!(matches!(first.status, PartitionStatus::Converged { .. }));
        assert!(matches!(second.status, PartitionStatus::Converged { .. }));
        assert!(iterations_of(first.status) < 10);
        assert!(iterations_of(second.status) < 10);

        // Absent component does not condense
        assert_eq!(first.condensed_fraction[1], 0.0);
        assert_relative_eq!(first.condensed_fraction[0], 2.48e-3, max_relative = 1e-2);

        // The low volatility component dominates the second time point
        assert!(second.condensed_fraction[1] > 0.35 && second.condensed_fraction[1] < 0.40);
        assert!(second.condensed_fraction[0] < 0.01);
    }

    #[test]
    fn test_converged_fractions_are_self_consistent() {
        let cstar = reference_cstar();
        let mass = array![0.3, 0.7];
        let solution =
            solve_time_point(0, cstar.view(), mass.view(), 1.0, &SolverParameters::default())
                .unwrap();

        let absorbing_mass = 1.0 + solution.condensed_fraction.dot(&mass);
        for i in 0..2 {
            let implied = 1.0 / (1.0 + cstar[i] / absorbing_mass);
            assert_relative_eq!(solution.condensed_fraction[i], implied, max_relative = 2e-2);
        }
    }

    #[test]
    fn test_tighter_tolerance_needs_more_iterations() {
        let cstar = reference_cstar();
        let mass = array![0.3, 0.7];
        let loose = SolverParameters::default();
        let tight = SolverParameters {
            tolerance: 1e-10,
            ..Default::default()
        };

        let loose = solve_time_point(0, cstar.view(), mass.view(), 1.0, &loose).unwrap();
        let tight = solve_time_point(0, cstar.view(), mass.view(), 1.0, &tight).unwrap();

        assert!(iterations_of(tight.status) > iterations_of(loose.status));
        assert_relative_eq!(
            loose.condensed_fraction[1],
            tight.condensed_fraction[1],
            max_relative = 2e-2
        );
    }

    #[test]
    fn test_fractions_within_unit_interval() {
        let cstar = array![1e-6, 1e-2, 1.0, 1e2, 1e6];
        for seed in [0.1, 1.0, 100.0] {
            let solution = solve_time_point(
                0,
                cstar.view(),
                array![5.0, 5.0, 5.0, 5.0, 5.0].view(),
                seed,
                &SolverParameters::default(),
            )
            .unwrap();
            assert!(solution
                .condensed_fraction
                .iter()
                .all(|&f| (0.0..=1.0).contains(&f)));
        }
    }

    // ===== Short-circuit Tests =====

    #[test]
    fn test_empty_row_condenses_nothing() {
        let solution = solve_time_point(
            0,
            reference_cstar().view(),
            array![0.0, 0.0].view(),
            1.0,
            &SolverParameters::default(),
        )
        .unwrap();
        assert_eq!(solution.status, PartitionStatus::NothingToCondense);
        assert_eq!(solution.condensed_fraction.to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_no_seed_condenses_nothing() {
        let solution = solve_time_point(
            0,
            reference_cstar().view(),
            array![0.3, 0.7].view(),
            0.0,
            &SolverParameters::default(),
        )
        .unwrap();
        assert_eq!(solution.status, PartitionStatus::NothingToCondense);
        assert_eq!(solution.condensed_fraction.sum(), 0.0);
    }

    #[test]
    fn test_very_volatile_converges_quickly() {
        let cstar = array![1e9, 1e10];
        let solution = solve_time_point(
            0,
            cstar.view(),
            array![10.0, 10.0].view(),
            1.0,
            &SolverParameters::default(),
        )
        .unwrap();

        assert!(matches!(solution.status, PartitionStatus::Converged { .. }));
        assert!(iterations_of(solution.status) <= 2);
        assert!(solution.condensed_fraction.iter().all(|&f| f < 1e-8));
    }

    // ===== Seed Mass Tests =====

    #[test]
    fn test_more_seed_more_condensation() {
        let cstar = reference_cstar();
        let mass = array![0.3, 0.7];
        let params = SolverParameters::default();

        let mut previous = Array1::<f64>::zeros(2);
        for seed in [0.1, 1.0, 10.0, 100.0] {
            let solution = solve_time_point(0, cstar.view(), mass.view(), seed, &params).unwrap();
            for i in 0..2 {
                assert!(
                    solution.condensed_fraction[i] >= previous[i],
                    "seed {} reduced condensation of component {}",
                    seed,
                    i
                );
            }
            previous = solution.condensed_fraction;
        }
    }

    // ===== Iteration Cap Tests =====

    #[test]
    fn test_iteration_cap_reports_failure() {
        let params = SolverParameters {
            max_iterations: 1,
            ..Default::default()
        };
        let err =
            solve_time_point(7, reference_cstar().view(), array![0.3, 0.7].view(), 1.0, &params)
                .unwrap_err();

        match err {
            RSGPPError::NonConvergence {
                time_index,
                iterations,
                relative_change,
            } => {
                assert_eq!(time_index, 7);
                assert_eq!(iterations, 1);
                assert!(relative_change > params.tolerance);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let err = solve_time_point(
            0,
            array![1.0, 2.0].view(),
            array![1.0].view(),
            1.0,
            &SolverParameters::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RSGPPError::DimensionMismatch {
                what: "time point components".to_string(),
                expected: 2,
                found: 1
            }
        );
    }

    // ===== Full Solve Tests =====

    #[test]
    fn test_solve_reference() {
        let solver = reference_solver();
        let mut table = reference_table();
        let original = table.concentrations().to_owned();

        let summary = solver.solve(&mut table).unwrap();

        assert!(summary.all_converged());
        assert_eq!(summary.time.to_vec(), vec![0.0, 2.7e3]);
        assert_relative_eq!(
            summary.effective_saturation_concentration[0],
            403.42,
            max_relative = 1e-4
        );
        assert_eq!(summary.condensed_fraction[[0, 1]], 0.0);
        assert!(summary.particle_mass[1] > 0.25 && summary.particle_mass[1] < 0.29);

        for t in 0..2 {
            let before: f64 = original.row(t).sum();
            assert!(is_close!(summary.particle_mass[t] + summary.gas_mass[t], before));
        }
    }

    #[test]
    fn test_condensed_fractions_leave_table_untouched() {
        let solver = reference_solver();
        let table = reference_table();

        let (cf, outcomes) = solver.condensed_fractions(&table).unwrap();

        assert_eq!(table, reference_table());
        assert_eq!(cf.dim(), (2, 2));
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.is_ok()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mixture =
            Mixture::from_arrays(&[100.0, 150.0, 200.0, 500.0], &[1e-2, 1e-3, 1e-4, 1e-5])
                .unwrap();
        let concentrations = Array2::from_shape_fn((64, 4), |(t, i)| {
            0.05 * (t as f64 + 1.0) * (i as f64 + 1.0)
        });

        let sequential = EquilibriumPartitioning::new(mixture.clone(), 290.0, 2.0).unwrap();
        let parallel = EquilibriumPartitioning::from_parameters(
            mixture,
            290.0,
            2.0,
            SolverParameters {
                parallel: true,
                ..Default::default()
            },
        )
        .unwrap();

        let mut table_a = GasPhaseTable::from_concentrations(concentrations.clone()).unwrap();
        let mut table_b = GasPhaseTable::from_concentrations(concentrations).unwrap();
        let a = sequential.solve(&mut table_a).unwrap();
        let b = parallel.solve(&mut table_b).unwrap();

        assert_eq!(a.condensed_fraction, b.condensed_fraction);
        assert_eq!(a.particle_mass, b.particle_mass);
        assert_eq!(a.outcomes, b.outcomes);
        assert_eq!(table_a, table_b);
    }

    #[test]
    fn test_non_convergence_is_isolated() {
        let mixture = Mixture::from_arrays(&[100.0, 500.0], &[1e-2, 1e-5]).unwrap();
        let solver = EquilibriumPartitioning::from_parameters(
            mixture,
            298.15,
            1.0,
            SolverParameters {
                max_iterations: 1,
                ..Default::default()
            },
        )
        .unwrap();
        let mut table = reference_table();

        let summary = solver.solve(&mut table).unwrap();

        assert!(summary.outcomes[0].is_ok());
        assert!(matches!(
            summary.outcomes[1],
            Err(RSGPPError::NonConvergence { time_index: 1, .. })
        ));
        assert_eq!(summary.failures().count(), 1);

        // The failed row moves no mass
        assert_eq!(summary.particle_mass[1], 0.0);
        assert_eq!(table.row(1).to_vec(), vec![0.3, 0.7]);
        assert!(table.row(0)[0] < 1.0);

        assert!(summary.into_result().is_err());
    }

    // ===== Input Validation Tests =====

    #[test]
    fn test_rejects_invalid_construction() {
        let mixture = Mixture::from_arrays(&[100.0], &[1e-2]).unwrap();
        assert_eq!(
            EquilibriumPartitioning::new(mixture.clone(), -5.0, 1.0).unwrap_err(),
            RSGPPError::NonPositiveTemperature(-5.0)
        );
        assert_eq!(
            EquilibriumPartitioning::new(mixture.clone(), 298.15, -1.0).unwrap_err(),
            RSGPPError::InvalidSeedMass(-1.0)
        );
        assert!(EquilibriumPartitioning::from_parameters(
            mixture,
            298.15,
            1.0,
            SolverParameters {
                max_iterations: 0,
                ..Default::default()
            }
        )
        .is_err());
    }

    #[test]
    fn test_rejects_component_count_mismatch() {
        let solver = reference_solver();
        let mut table = GasPhaseTable::from_concentrations(Array2::ones((2, 3))).unwrap();
        let before = table.clone();

        let err = solver.solve(&mut table).unwrap_err();

        assert_eq!(
            err,
            RSGPPError::DimensionMismatch {
                what: "gas-phase table components".to_string(),
                expected: 2,
                found: 3
            }
        );
        assert_eq!(table, before);
    }

    #[test]
    fn test_solve_rejects_edited_negative_concentration() {
        let solver = reference_solver();
        let mut table = reference_table();
        table.concentrations_mut()[[1, 1]] = -5.0;
        let before = table.clone();

        let err = solver.solve(&mut table).unwrap_err();

        assert_eq!(
            err,
            RSGPPError::InvalidConcentration {
                time_index: 1,
                component: 1,
                value: -5.0
            }
        );
        assert_eq!(table, before);
    }

    #[test]
    fn test_condensed_fractions_reject_edited_non_finite_concentration() {
        let solver = reference_solver();
        let mut table = reference_table();
        table.concentrations_mut()[[0, 1]] = f64::NAN;

        let err = solver.condensed_fractions(&table).unwrap_err();

        assert!(matches!(
            err,
            RSGPPError::InvalidConcentration {
                time_index: 0,
                component: 1,
                ..
            }
        ));
    }

    // ===== Serialisation Tests =====

    #[test]
    fn test_toml_roundtrip() {
        let solver = reference_solver();
        let serialised = toml::to_string(&solver).unwrap();
        let deserialised: EquilibriumPartitioning = toml::from_str(&serialised).unwrap();
        assert_eq!(solver, deserialised);
    }

    #[test]
    fn test_missing_parameters_use_defaults() {
        let json = r#"{
            "mixture": {"components": [{"molar_mass": 100.0, "saturation_vapour_pressure": 0.01}]},
            "temperature": 298.15,
            "seed_mass": 1.0
        }"#;
        let solver: EquilibriumPartitioning = serde_json::from_str(json).unwrap();
        assert_eq!(solver.parameters(), &SolverParameters::default());
        assert_eq!(solver.mixture().len(), 1);
    }

    #[test]
    fn test_deserialised_mixture_is_validated() {
        let json = r#"{
            "mixture": {"components": [
                {"name": "limonene", "molar_mass": 136.0, "saturation_vapour_pressure": 0.0}
            ]},
            "temperature": 298.15,
            "seed_mass": 1.0
        }"#;
        let err = serde_json::from_str::<EquilibriumPartitioning>(json).unwrap_err();
        assert!(err.to_string().contains("0 (limonene)"));
    }
}
