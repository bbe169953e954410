pub mod constants;
pub mod mixture;
pub mod parameters;
pub mod timeseries;

pub mod errors;
