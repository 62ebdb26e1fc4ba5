//! # Solution Preparation
//!
//! Closed-form solution math: mass of solute for a target molarity, and
//! stock volume for a dilution (C₁V₁ = C₂V₂).
//!
//! ## Example
//!
//! ```rust
//! use lab_core::chemistry::solutions::{mass_for_molarity, MolarityInput};
//!
//! let input = MolarityInput::new("NaCl", 0.5, 2.0);
//! let result = mass_for_molarity(&input).unwrap();
//! assert!((result.mass_g - 58.44).abs() < 0.01);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use super::formula::evaluate_formula;
use crate::errors::{LabError, LabResult};
use crate::units::{Grams, Milligrams};

/// Input for a molarity calculation.
///
/// ## JSON Example
///
/// ```json
/// { "formula": "CaCl2", "molarity_mol_per_l": 0.1, "volume_l": 0.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolarityInput {
    /// Chemical formula of the solute
    pub formula: String,
    /// Desired concentration (mol/L)
    pub molarity_mol_per_l: f64,
    /// Final solution volume (L)
    pub volume_l: f64,
}

impl MolarityInput {
    pub fn new(formula: impl Into<String>, molarity_mol_per_l: f64, volume_l: f64) -> Self {
        MolarityInput {
            formula: formula.into(),
            molarity_mol_per_l,
            volume_l,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> LabResult<()> {
        require_positive("molarity_mol_per_l", self.molarity_mol_per_l)?;
        require_positive("volume_l", self.volume_l)
    }
}

/// Mass of solute needed for a target molarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolarityResult {
    pub formula: String,
    /// Molecular weight (g/mol)
    pub molecular_weight: f64,
    pub molarity_mol_per_l: f64,
    pub volume_l: f64,
    /// Mass needed: MW × M × V
    pub mass_g: f64,
    pub mass_mg: f64,
}

/// Calculate the mass of solute for a target molarity and volume.
///
/// # Errors
///
/// * `LabError::InvalidInput` - non-positive molarity or volume
/// * `LabError::Formula` - formula could not be evaluated
pub fn mass_for_molarity(input: &MolarityInput) -> LabResult<MolarityResult> {
    input.validate()?;
    let mw = evaluate_formula(&input.formula)?;

    let mass = Grams(mw.molecular_weight * input.molarity_mol_per_l * input.volume_l);
    let mass_mg: Milligrams = mass.into();
    debug!(
        "{} at {} M in {} L -> {:.4} g",
        input.formula, input.molarity_mol_per_l, input.volume_l, mass.0
    );

    Ok(MolarityResult {
        formula: mw.formula,
        molecular_weight: mw.molecular_weight,
        molarity_mol_per_l: input.molarity_mol_per_l,
        volume_l: input.volume_l,
        mass_g: mass.0,
        mass_mg: mass_mg.0,
    })
}

/// Stock and diluent volumes for a dilution.
///
/// Concentrations and volumes may be in any units as long as each pair is
/// consistent; the result volumes use the unit of `final_volume`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DilutionResult {
    pub stock_concentration: f64,
    pub final_concentration: f64,
    pub final_volume: f64,
    /// V₁ = C₂V₂ / C₁
    pub stock_volume: f64,
    /// Volume of solvent to add: V₂ − V₁
    pub diluent_volume: f64,
}

/// Solve C₁V₁ = C₂V₂ for the stock volume V₁.
///
/// # Errors
///
/// * `LabError::InvalidInput` - non-positive values, or a final
///   concentration above the stock concentration
pub fn dilution_volume(
    stock_concentration: f64,
    final_concentration: f64,
    final_volume: f64,
) -> LabResult<DilutionResult> {
    require_positive("stock_concentration", stock_concentration)?;
    require_positive("final_concentration", final_concentration)?;
    require_positive("final_volume", final_volume)?;
    if final_concentration > stock_concentration {
        return Err(LabError::invalid_input(
            "final_concentration",
            final_concentration.to_string(),
            format!("Cannot dilute to above the stock concentration ({stock_concentration})"),
        ));
    }

    let stock_volume = final_concentration * final_volume / stock_concentration;
    Ok(DilutionResult {
        stock_concentration,
        final_concentration,
        final_volume,
        stock_volume,
        diluent_volume: final_volume - stock_volume,
    })
}

fn require_positive(field: &str, value: f64) -> LabResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LabError::invalid_input(
            field,
            value.to_string(),
            "Value must be a positive number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FormulaError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mass_for_molarity() {
        let result = mass_for_molarity(&MolarityInput::new("NaCl", 1.0, 1.0)).unwrap();
        assert_abs_diff_eq!(result.mass_g, 58.4427, epsilon = 1e-9);
        assert_abs_diff_eq!(result.mass_mg, 58442.7, epsilon = 1e-6);

        let result = mass_for_molarity(&MolarityInput::new("CaCl2", 0.1, 0.5)).unwrap();
        assert_abs_diff_eq!(result.mass_g, 5.5492, epsilon = 1e-4);
    }

    #[test]
    fn test_molarity_rejects_bad_input() {
        let err = mass_for_molarity(&MolarityInput::new("NaCl", 0.0, 1.0)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(mass_for_molarity(&MolarityInput::new("NaCl", 1.0, -1.0)).is_err());
        assert!(mass_for_molarity(&MolarityInput::new("NaCl", f64::NAN, 1.0)).is_err());
    }

    #[test]
    fn test_molarity_propagates_formula_error() {
        let err = mass_for_molarity(&MolarityInput::new("Xx", 1.0, 1.0)).unwrap_err();
        assert_eq!(err, LabError::Formula(FormulaError::unknown_element("Xx")));
    }

    #[test]
    fn test_dilution() {
        // 10x stock to 1x in 500 mL
        let result = dilution_volume(10.0, 1.0, 500.0).unwrap();
        assert_abs_diff_eq!(result.stock_volume, 50.0);
        assert_abs_diff_eq!(result.diluent_volume, 450.0);

        let same = dilution_volume(2.0, 2.0, 100.0).unwrap();
        assert_abs_diff_eq!(same.diluent_volume, 0.0);
    }

    #[test]
    fn test_dilution_rejects_concentrating() {
        let err = dilution_volume(1.0, 2.0, 100.0).unwrap_err();
        assert!(matches!(err, LabError::InvalidInput { ref field, .. } if field == "final_concentration"));
        assert!(dilution_volume(0.0, 1.0, 1.0).is_err());
    }
}
