//! Common Formula Reference
//!
//! Quick-reference list of everyday laboratory compounds, used for display
//! and as autocomplete suggestions.

use serde::Serialize;

/// A commonly used compound with its listed molecular weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommonFormula {
    /// Formula as typed into the evaluator (ASCII digits)
    pub formula: &'static str,
    /// Formula with subscript digits for display
    pub display: &'static str,
    /// Listed molecular weight (g/mol), rounded to 2 decimals
    pub listed_mw: f64,
    /// Typical use
    pub common_use: &'static str,
}

const COMMON_FORMULAS: &[CommonFormula] = &[
    CommonFormula { formula: "NaCl", display: "NaCl", listed_mw: 58.44, common_use: "Salt" },
    CommonFormula { formula: "CaCl2", display: "CaCl₂", listed_mw: 110.98, common_use: "Calcium" },
    CommonFormula { formula: "H2SO4", display: "H₂SO₄", listed_mw: 98.08, common_use: "Acid" },
    CommonFormula { formula: "C6H12O6", display: "C₆H₁₂O₆", listed_mw: 180.16, common_use: "Glucose" },
    CommonFormula { formula: "KMnO4", display: "KMnO₄", listed_mw: 158.03, common_use: "Oxidizer" },
];

/// The full quick-reference table, in display order
pub fn common_formulas() -> &'static [CommonFormula] {
    COMMON_FORMULAS
}

/// Entries whose formula starts with `prefix` (case-sensitive, like the evaluator).
///
/// An empty prefix returns every entry.
pub fn suggest_formulas(prefix: &str) -> Vec<&'static CommonFormula> {
    COMMON_FORMULAS
        .iter()
        .filter(|entry| entry.formula.starts_with(prefix))
        .collect()
}
