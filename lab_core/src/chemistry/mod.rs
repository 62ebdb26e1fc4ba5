//! # Chemistry
//!
//! Formula evaluation and the solution math built on top of it.
//!
//! - [`atomic_weights`] - Static atomic weight table
//! - [`formula`] - Tokenizer and molecular weight evaluator
//! - [`reference`] - Common formula quick reference
//! - [`solutions`] - Molarity and dilution calculations

pub mod atomic_weights;
pub mod formula;
pub mod reference;
pub mod solutions;

pub use atomic_weights::{atomic_weights, AtomicWeightTable};
pub use formula::{
    evaluate_formula, evaluate_formula_with, tokenize, ElementContribution, FormulaToken,
    MolecularWeightResult, ParseMode,
};
pub use reference::{common_formulas, suggest_formulas, CommonFormula};
pub use solutions::{dilution_volume, mass_for_molarity, DilutionResult, MolarityInput, MolarityResult};
