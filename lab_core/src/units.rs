//! # Unit Types
//!
//! Lightweight wrappers for the laboratory units used in recipes and
//! solution math. JSON serialization stays clean (just numbers).
//!
//! ## Example
//!
//! ```rust
//! use lab_core::units::{Liters, Milliliters};
//!
//! let volume = Liters(0.5);
//! let ml: Milliliters = volume.into();
//! assert_eq!(ml.0, 500.0);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Mass and Volume
// ============================================================================

/// Mass in grams
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grams(pub f64);

/// Mass in milligrams
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milligrams(pub f64);

/// Volume in liters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Liters(pub f64);

/// Volume in milliliters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milliliters(pub f64);

impl From<Grams> for Milligrams {
    fn from(g: Grams) -> Self {
        Milligrams(g.0 * 1000.0)
    }
}

impl From<Milligrams> for Grams {
    fn from(mg: Milligrams) -> Self {
        Grams(mg.0 / 1000.0)
    }
}

impl From<Liters> for Milliliters {
    fn from(l: Liters) -> Self {
        Milliliters(l.0 * 1000.0)
    }
}

impl From<Milliliters> for Liters {
    fn from(ml: Milliliters) -> Self {
        Liters(ml.0 / 1000.0)
    }
}

// ============================================================================
// Recipe Amount Units
// ============================================================================

/// Unit attached to a recipe component amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmountUnit {
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "mL")]
    Milliliters,
    #[serde(rename = "L")]
    Liters,
}

impl AmountUnit {
    /// Unit symbol as printed after an amount
    pub fn symbol(&self) -> &'static str {
        match self {
            AmountUnit::Grams => "g",
            AmountUnit::Milliliters => "mL",
            AmountUnit::Liters => "L",
        }
    }

    /// Whether this unit measures mass (as opposed to volume)
    pub fn is_mass(&self) -> bool {
        matches!(self, AmountUnit::Grams)
    }
}

impl fmt::Display for AmountUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_conversions() {
        let ml: Milliliters = Liters(2.5).into();
        assert_eq!(ml.0, 2500.0);
        let l: Liters = Milliliters(250.0).into();
        assert_eq!(l.0, 0.25);
    }

    #[test]
    fn test_mass_conversions() {
        let mg: Milligrams = Grams(58.44).into();
        assert!((mg.0 - 58440.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_serialization() {
        assert_eq!(serde_json::to_string(&AmountUnit::Milliliters).unwrap(), "\"mL\"");
        assert_eq!(serde_json::to_string(&Liters(1.5)).unwrap(), "1.5");
        assert!(AmountUnit::Grams.is_mass());
        assert!(!AmountUnit::Liters.is_mass());
    }
}
