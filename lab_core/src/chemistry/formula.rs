//! # Formula Evaluation
//!
//! Converts a chemical formula string such as `"CaCl2"` into a molecular
//! weight.
//!
//! ## Tokenization
//!
//! Tokens are matched left to right with the pattern `([A-Z][a-z]?)([0-9]*)`:
//! an element symbol followed by an optional subscript of ASCII digits. Other
//! digit characters (full-width, Arabic-Indic) are not subscripts. In
//! [`ParseMode::Lenient`] (the default) characters between matches are
//! skipped, so `"Na-Cl"` evaluates like `"NaCl"` and the `2` in `"(NH4)2SO4"`
//! is silently dropped. [`ParseMode::Strict`] rejects such strings instead.
//!
//! Repeated elements are not merged: `"CH3COOH"` produces six breakdown rows.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::chemistry::evaluate_formula;
//!
//! let result = evaluate_formula("H2SO4").unwrap();
//! assert!((result.molecular_weight - 98.08).abs() < 0.01);
//! assert_eq!(result.breakdown.len(), 3);
//! ```

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{CaptureMatches, Regex};
use serde::{Deserialize, Serialize};

use super::atomic_weights::atomic_weights;
use crate::errors::FormulaError;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][a-z]?)([0-9]*)").expect("token pattern is a valid regex"));

/// How characters outside element tokens are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParseMode {
    /// Skip anything that is not part of a token
    #[default]
    Lenient,
    /// Fail on the first character not covered by a token
    Strict,
}

/// One element symbol with its subscript (always at least 1).
///
/// Subscripts are ASCII digits of any length; the count is exact up to 2^53.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaToken {
    pub symbol: String,
    pub count: f64,
}

/// Contribution of a single token to the molecular weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementContribution {
    /// Element symbol as written
    pub symbol: String,
    /// Subscript count
    pub count: f64,
    /// Atomic weight from the table (g/mol)
    pub atomic_weight: f64,
    /// atomic_weight × count (g/mol)
    pub contribution: f64,
}

/// Molecular weight of a formula with its per-token breakdown.
///
/// ## JSON Example
///
/// ```json
/// {
///   "formula": "NaCl",
///   "molecular_weight": 58.4427,
///   "breakdown": [
///     { "symbol": "Na", "count": 1.0, "atomic_weight": 22.9897, "contribution": 22.9897 },
///     { "symbol": "Cl", "count": 1.0, "atomic_weight": 35.453, "contribution": 35.453 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolecularWeightResult {
    /// Formula exactly as given
    pub formula: String,
    /// Molecular weight (g/mol)
    pub molecular_weight: f64,
    /// One row per token occurrence, in formula order
    pub breakdown: Vec<ElementContribution>,
}

impl MolecularWeightResult {
    /// Total number of atoms across all tokens
    pub fn atom_count(&self) -> f64 {
        self.breakdown.iter().map(|row| row.count).sum()
    }
}

/// Iterator over the tokens of a formula.
///
/// Each item is validated for a positive count; in strict mode a gap between
/// tokens (or trailing garbage) yields an error. Stops after the first error.
pub struct Tokens<'a> {
    formula: &'a str,
    matches: CaptureMatches<'static, 'a>,
    mode: ParseMode,
    last_end: usize,
    finished: bool,
}

/// Tokenize a formula without looking up element weights.
pub fn tokenize(formula: &str, mode: ParseMode) -> Tokens<'_> {
    Tokens {
        formula,
        matches: TOKEN_PATTERN.captures_iter(formula),
        mode,
        last_end: 0,
        finished: false,
    }
}

impl<'a> Tokens<'a> {
    fn unexpected_at(&self, byte_offset: usize) -> FormulaError {
        let character = self.formula[byte_offset..].chars().next().unwrap_or('\0');
        FormulaError::UnexpectedCharacter {
            position: self.formula[..byte_offset].chars().count(),
            character,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<FormulaToken, FormulaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(caps) = self.matches.next() else {
            self.finished = true;
            if self.mode == ParseMode::Strict && self.last_end < self.formula.len() {
                return Some(Err(self.unexpected_at(self.last_end)));
            }
            return None;
        };

        // Group 0 always participates in a match
        let whole = caps.get(0)?;
        if self.mode == ParseMode::Strict && whole.start() != self.last_end {
            self.finished = true;
            return Some(Err(self.unexpected_at(self.last_end)));
        }
        self.last_end = whole.end();

        let symbol = caps.get(1).map_or("", |m| m.as_str());
        let digits = caps.get(2).map_or("", |m| m.as_str());

        let count = match parse_count(digits) {
            Some(count) => count,
            None => {
                self.finished = true;
                return Some(Err(FormulaError::invalid_element_count(symbol)));
            }
        };

        Some(Ok(FormulaToken {
            symbol: symbol.to_string(),
            count,
        }))
    }
}

/// Subscript value; `None` for all-zero digits or a count beyond `f64` range.
fn parse_count(digits: &str) -> Option<f64> {
    if digits.is_empty() {
        return Some(1.0);
    }
    if digits.bytes().all(|b| b == b'0') {
        return None;
    }
    digits.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Evaluate a formula with lenient tokenization.
///
/// # Errors
///
/// * `FormulaError::EmptyFormula` - no element tokens found
/// * `FormulaError::InvalidElementCount` - a subscript of zero, or one too large
///   for an `f64`
/// * `FormulaError::UnknownElement` - symbol not in the atomic weight table
///
/// # Example
///
/// ```rust
/// use lab_core::chemistry::evaluate_formula;
/// use lab_core::errors::FormulaError;
///
/// assert_eq!(evaluate_formula("xyz123"), Err(FormulaError::EmptyFormula));
/// assert_eq!(
///     evaluate_formula("Xx"),
///     Err(FormulaError::unknown_element("Xx"))
/// );
/// ```
pub fn evaluate_formula(formula: &str) -> Result<MolecularWeightResult, FormulaError> {
    evaluate_formula_with(formula, ParseMode::Lenient)
}

/// Evaluate a formula with an explicit parse mode.
///
/// Tokens are checked in formula order; the first failing token determines
/// the error.
pub fn evaluate_formula_with(formula: &str, mode: ParseMode) -> Result<MolecularWeightResult, FormulaError> {
    let result = reduce(formula, mode);
    match &result {
        Ok(r) => debug!("{} -> {:.4} g/mol ({} tokens)", formula, r.molecular_weight, r.breakdown.len()),
        Err(e) => warn!("rejected formula {:?}: {}", formula, e),
    }
    result
}

fn reduce(formula: &str, mode: ParseMode) -> Result<MolecularWeightResult, FormulaError> {
    let table = atomic_weights();
    let mut molecular_weight = 0.0;
    let mut breakdown = Vec::new();

    for token in tokenize(formula, mode) {
        let FormulaToken { symbol, count } = token?;
        let atomic_weight = table
            .get(&symbol)
            .ok_or_else(|| FormulaError::unknown_element(symbol.as_str()))?;
        let contribution = atomic_weight * count;
        molecular_weight += contribution;
        breakdown.push(ElementContribution {
            symbol,
            count,
            atomic_weight,
            contribution,
        });
    }

    if breakdown.is_empty() {
        return Err(FormulaError::EmptyFormula);
    }

    Ok(MolecularWeightResult {
        formula: formula.to_string(),
        molecular_weight,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reference_compounds() {
        assert_abs_diff_eq!(evaluate_formula("NaCl").unwrap().molecular_weight, 58.44, epsilon = 0.01);
        assert_abs_diff_eq!(evaluate_formula("H2SO4").unwrap().molecular_weight, 98.08, epsilon = 0.01);
        assert_abs_diff_eq!(evaluate_formula("C6H12O6").unwrap().molecular_weight, 180.16, epsilon = 0.01);
        assert_abs_diff_eq!(evaluate_formula("CaCl2").unwrap().molecular_weight, 110.98, epsilon = 0.01);
        assert_abs_diff_eq!(evaluate_formula("KMnO4").unwrap().molecular_weight, 158.03, epsilon = 0.01);
    }

    #[test]
    fn test_sum_matches_table() {
        let result = evaluate_formula("C6H12O6").unwrap();
        let expected = 12.0107 * 6.0 + 1.0079 * 12.0 + 15.9994 * 6.0;
        assert_eq!(result.molecular_weight, expected);
        assert_eq!(result.atom_count(), 24.0);
    }

    #[test]
    fn test_empty_formula() {
        assert_eq!(evaluate_formula(""), Err(FormulaError::EmptyFormula));
        assert_eq!(evaluate_formula("xyz123"), Err(FormulaError::EmptyFormula));
        assert_eq!(evaluate_formula("na"), Err(FormulaError::EmptyFormula));
        assert_eq!(evaluate_formula("123"), Err(FormulaError::EmptyFormula));
    }

    #[test]
    fn test_unknown_element() {
        assert_eq!(evaluate_formula("Xx"), Err(FormulaError::unknown_element("Xx")));
        // "Q" is not an element even though it is a well-formed token
        assert_eq!(evaluate_formula("NaQ2"), Err(FormulaError::unknown_element("Q")));
    }

    #[test]
    fn test_zero_count() {
        assert_eq!(evaluate_formula("H0"), Err(FormulaError::invalid_element_count("H")));
        assert_eq!(evaluate_formula("NaCl00"), Err(FormulaError::invalid_element_count("Cl")));
    }

    #[test]
    fn test_first_failing_token_wins() {
        assert_eq!(evaluate_formula("XxH0"), Err(FormulaError::unknown_element("Xx")));
        assert_eq!(evaluate_formula("H0Xx"), Err(FormulaError::invalid_element_count("H")));
        assert_eq!(evaluate_formula("Xx0"), Err(FormulaError::invalid_element_count("Xx")));
    }

    #[test]
    fn test_leading_zeros_and_large_counts() {
        let result = evaluate_formula("H007").unwrap();
        assert_eq!(result.breakdown[0].count, 7.0);
        let result = evaluate_formula("C1000").unwrap();
        assert_eq!(result.breakdown[0].count, 1000.0);

        // Wider than u64 is still a valid subscript
        let result = evaluate_formula("C99999999999999999999999").unwrap();
        assert_abs_diff_eq!(result.breakdown[0].count, 1e23, epsilon = 1e8);
        assert_abs_diff_eq!(result.molecular_weight, 12.0107e23, epsilon = 1e10);
    }

    #[test]
    fn test_count_beyond_float_range() {
        let formula = format!("C{}", "9".repeat(400));
        assert_eq!(evaluate_formula(&formula), Err(FormulaError::invalid_element_count("C")));
    }

    #[test]
    fn test_non_ascii_digits_are_not_subscripts() {
        // Arabic-Indic three and full-width two are skipped like any other noise
        let water = evaluate_formula("H2O").unwrap();
        let hydroxyl = evaluate_formula("HO").unwrap();
        for formula in ["H\u{0663}O", "H\u{FF12}O"] {
            let result = evaluate_formula(formula).unwrap();
            let counts: Vec<_> = result.breakdown.iter().map(|r| r.count).collect();
            assert_eq!(counts, [1.0, 1.0]);
            assert_eq!(result.molecular_weight, hydroxyl.molecular_weight);
            assert_ne!(result.molecular_weight, water.molecular_weight);
        }
        assert_eq!(
            evaluate_formula_with("H\u{FF12}O", ParseMode::Strict),
            Err(FormulaError::UnexpectedCharacter { position: 1, character: '\u{FF12}' })
        );
    }

    #[test]
    fn test_repeated_elements_not_merged() {
        let result = evaluate_formula("CH3COOH").unwrap();
        let symbols: Vec<_> = result.breakdown.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["C", "H", "C", "O", "O", "H"]);
        let counts: Vec<_> = result.breakdown.iter().map(|r| r.count).collect();
        assert_eq!(counts, [1.0, 3.0, 1.0, 1.0, 1.0, 1.0]);
        assert_abs_diff_eq!(result.molecular_weight, 60.05, epsilon = 0.01);
    }

    #[test]
    fn test_lenient_skips_noise() {
        let clean = evaluate_formula("NaCl").unwrap();
        let noisy = evaluate_formula("Na-Cl!").unwrap();
        assert_eq!(clean.molecular_weight, noisy.molecular_weight);
        assert_eq!(noisy.formula, "Na-Cl!");

        // Parenthesized multipliers are not understood; the "2" is dropped
        let ammonium_sulfate = evaluate_formula("(NH4)2SO4").unwrap();
        let symbols: Vec<_> = ammonium_sulfate.breakdown.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["N", "H", "S", "O"]);
    }

    #[test]
    fn test_lowercase_second_letter_binding() {
        // "Co" is cobalt, "CO" is carbon + oxygen
        let cobalt = evaluate_formula("Co").unwrap();
        assert_eq!(cobalt.breakdown.len(), 1);
        let carbon_monoxide = evaluate_formula("CO").unwrap();
        assert_eq!(carbon_monoxide.breakdown.len(), 2);
    }

    #[test]
    fn test_strict_mode() {
        assert!(evaluate_formula_with("NaCl", ParseMode::Strict).is_ok());
        assert_eq!(
            evaluate_formula_with("Na-Cl", ParseMode::Strict),
            Err(FormulaError::UnexpectedCharacter { position: 2, character: '-' })
        );
        assert_eq!(
            evaluate_formula_with("NaCl ", ParseMode::Strict),
            Err(FormulaError::UnexpectedCharacter { position: 4, character: ' ' })
        );
        assert_eq!(
            evaluate_formula_with("xyz", ParseMode::Strict),
            Err(FormulaError::UnexpectedCharacter { position: 0, character: 'x' })
        );
        assert_eq!(evaluate_formula_with("", ParseMode::Strict), Err(FormulaError::EmptyFormula));
    }

    #[test]
    fn test_strict_position_counts_characters() {
        assert_eq!(
            evaluate_formula_with("CaCl₂", ParseMode::Strict),
            Err(FormulaError::UnexpectedCharacter { position: 4, character: '₂' })
        );
    }

    #[test]
    fn test_tokenize() {
        let tokens: Vec<_> = tokenize("Fe2O3", ParseMode::Lenient).collect::<Result<_, _>>().unwrap();
        assert_eq!(
            tokens,
            vec![
                FormulaToken { symbol: "Fe".to_string(), count: 2.0 },
                FormulaToken { symbol: "O".to_string(), count: 3.0 },
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let a = evaluate_formula("C8H10N4O2").unwrap();
        let b = evaluate_formula("C8H10N4O2").unwrap();
        assert_eq!(a.molecular_weight.to_bits(), b.molecular_weight.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn test_concurrent_evaluation() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| evaluate_formula("MgSO4").unwrap().molecular_weight))
            .collect();
        let weights: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(weights.iter().all(|w| w.to_bits() == weights[0].to_bits()));
    }
}
