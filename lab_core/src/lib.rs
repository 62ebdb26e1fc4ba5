//! # lab_core - Laboratory Calculation Engine
//!
//! `lab_core` is the computational heart of LabCalc. It provides the bench
//! calculations a molecular biology lab does every day: molecular weights,
//! molarity and dilution math, and scaled recipes for common growth media.
//! All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All result types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Static Data**: Atomic weights and recipe templates are validated once
//!   and never mutated
//!
//! ## Quick Start
//!
//! ```rust
//! use lab_core::{evaluate_formula, scale_recipe};
//!
//! let water = evaluate_formula("H2O").unwrap();
//! assert!((water.molecular_weight - 18.0152).abs() < 1e-9);
//!
//! let lb = scale_recipe("LB", 0.5, 2, true).unwrap();
//! assert_eq!(lb.title, "LB-Agar Medium (1.0 L)");
//! ```
//!
//! ## Modules
//!
//! - [`chemistry`] - Formula evaluation, molarity and dilution
//! - [`media`] - Growth media templates, scaling and protocols
//! - [`stats`] - Replicate statistics
//! - [`history`] - Session calculation log
//! - [`export`] - Text, CSV and JSON rendering
//! - [`settings`] - User-adjustable defaults
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Settings files and atomic export writes

pub mod chemistry;
pub mod errors;
pub mod export;
pub mod file_io;
pub mod history;
pub mod media;
pub mod settings;
pub mod stats;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use chemistry::{
    dilution_volume, evaluate_formula, evaluate_formula_with, mass_for_molarity,
    MolecularWeightResult, ParseMode,
};
pub use errors::{FormulaError, LabError, LabResult, ScaleError};
pub use file_io::{load_settings, save_settings, write_export};
pub use history::{CalculationHistory, CalculationRecord};
pub use media::{scale_recipe, MediaType, ScaledRecipe};
pub use settings::{ExportFormat, LabSettings};
