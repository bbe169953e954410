//! Semi-volatile components and the mixtures they form.

use crate::errors::{RSGPPError, RSGPPResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A single semi-volatile species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Optional label, only used in diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// unit: g / mol
    pub molar_mass: f64,
    /// Pure-component saturation vapour pressure
    /// unit: Pa
    pub saturation_vapour_pressure: f64,
}

impl Component {
    pub fn new(molar_mass: f64, saturation_vapour_pressure: f64) -> Self {
        Self {
            name: None,
            molar_mass,
            saturation_vapour_pressure,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", index, name),
            None => index.to_string(),
        }
    }
}

/// An ordered set of components.
///
/// The position of a component in the mixture is its index in every
/// concentration table and result array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMixture")]
pub struct Mixture {
    components: Vec<Component>,
}

/// Unchecked form of [`Mixture`], validated on deserialisation
#[derive(Deserialize)]
struct RawMixture {
    components: Vec<Component>,
}

impl TryFrom<RawMixture> for Mixture {
    type Error = RSGPPError;

    fn try_from(raw: RawMixture) -> RSGPPResult<Self> {
        Self::new(raw.components)
    }
}

impl Mixture {
    /// Build a mixture, checking every component's properties are physical.
    pub fn new(components: Vec<Component>) -> RSGPPResult<Self> {
        for (i, component) in components.iter().enumerate() {
            if !(component.molar_mass.is_finite() && component.molar_mass > 0.0) {
                return Err(RSGPPError::InvalidMolarMass {
                    component: component.label(i),
                    value: component.molar_mass,
                });
            }
            if !(component.saturation_vapour_pressure.is_finite()
                && component.saturation_vapour_pressure > 0.0)
            {
                return Err(RSGPPError::InvalidSaturationVapourPressure {
                    component: component.label(i),
                    value: component.saturation_vapour_pressure,
                });
            }
        }
        Ok(Self { components })
    }

    /// Build a mixture from parallel arrays of molar mass and saturation vapour pressure.
    pub fn from_arrays(
        molar_mass: &[f64],
        saturation_vapour_pressure: &[f64],
    ) -> RSGPPResult<Self> {
        if molar_mass.len() != saturation_vapour_pressure.len() {
            return Err(RSGPPError::DimensionMismatch {
                what: "saturation vapour pressures".to_string(),
                expected: molar_mass.len(),
                found: saturation_vapour_pressure.len(),
            });
        }
        Self::new(
            molar_mass
                .iter()
                .zip(saturation_vapour_pressure)
                .map(|(&mm, &psat)| Component::new(mm, psat))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Molar masses (g/mol)
    pub fn molar_masses(&self) -> Array1<f64> {
        self.components.iter().map(|c| c.molar_mass).collect()
    }

    /// Saturation vapour pressures (Pa)
    pub fn saturation_vapour_pressures(&self) -> Array1<f64> {
        self.components
            .iter()
            .map(|c| c.saturation_vapour_pressure)
            .collect()
    }
}
