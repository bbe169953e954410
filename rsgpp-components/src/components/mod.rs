mod aggregation;
mod partitioning;
mod saturation;

pub use aggregation::{aggregate, PhaseTotals};
pub use partitioning::{
    solve_time_point, EquilibriumPartitioning, PartitionStatus, PartitioningSummary,
    TimePointOutcome, TimePointSolution,
};
pub use saturation::effective_saturation_concentration;
