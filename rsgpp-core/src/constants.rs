//! Physical constants and unit conversions.

/// Universal gas constant (J mol^-1 K^-1).
///
/// Four significant figures.
pub const GAS_CONSTANT: f64 = 8.314;

/// Converts Pa g mol^-1 / (J mol^-1) = g m^-3 into ug m^-3.
pub const GRAMS_TO_MICROGRAMS: f64 = 1.0e6;
