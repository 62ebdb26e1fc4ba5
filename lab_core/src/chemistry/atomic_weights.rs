//! Atomic Weights
//!
//! Standard atomic weights (g/mol) for the elements the formula evaluator
//! recognizes. The literal table is validated once, on first use, and shared
//! read-only afterwards.
//!
//! Symbols are one uppercase ASCII letter, optionally followed by one
//! lowercase letter. Lookups are case-sensitive: `"na"` is not sodium.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::errors::TableError;

/// Literal source table: (symbol, atomic weight in g/mol)
pub const ATOMIC_WEIGHTS: &[(&str, f64)] = &[
    // Main group elements
    ("H", 1.0079), ("He", 4.0026), ("Li", 6.941), ("Be", 9.0122),
    ("B", 10.811), ("C", 12.0107), ("N", 14.0067), ("O", 15.9994),
    ("F", 18.9984), ("Ne", 20.1797), ("Na", 22.9897), ("Mg", 24.305),
    ("Al", 26.9815), ("Si", 28.0855), ("P", 30.9738), ("S", 32.065),
    ("Cl", 35.453), ("Ar", 39.948), ("K", 39.0983), ("Ca", 40.078),
    // Transition metals and period 4-5
    ("Sc", 44.9559), ("Ti", 47.867), ("V", 50.9415), ("Cr", 51.9961),
    ("Mn", 54.938), ("Fe", 55.845), ("Co", 58.9332), ("Ni", 58.6934),
    ("Cu", 63.546), ("Zn", 65.38), ("Ga", 69.723), ("Ge", 72.64),
    ("As", 74.9216), ("Se", 78.96), ("Br", 79.904), ("Kr", 83.798),
    ("Rb", 85.4678), ("Sr", 87.62), ("Y", 88.9059), ("Zr", 91.224),
    ("Nb", 92.9064), ("Mo", 95.96), ("Tc", 98.0), ("Ru", 101.07),
    ("Rh", 102.9055), ("Pd", 106.42), ("Ag", 107.8682), ("Cd", 112.411),
    ("In", 114.818), ("Sn", 118.71), ("Sb", 121.76), ("Te", 127.6),
    ("I", 126.9045), ("Xe", 131.293), ("Cs", 132.9055), ("Ba", 137.327),
    // Lanthanides and actinides
    ("La", 138.9055), ("Ce", 140.116), ("Pr", 140.9077), ("Nd", 144.242),
    ("Pm", 145.0), ("Sm", 150.36), ("Eu", 151.964), ("Gd", 157.25),
    ("Th", 232.0381), ("Pa", 231.0359), ("U", 238.0289), ("Np", 237.0),
    ("Pu", 244.0), ("Am", 243.0), ("Cm", 247.0),
    // Period 6
    ("Hf", 178.49), ("Ta", 180.9479), ("W", 183.84), ("Re", 186.207),
    ("Os", 190.23), ("Ir", 192.217), ("Pt", 195.084), ("Au", 196.9666),
    ("Hg", 200.59), ("Tl", 204.3833), ("Pb", 207.2), ("Bi", 208.9804),
    ("Po", 209.0), ("At", 210.0), ("Rn", 222.0),
];

static TABLE: Lazy<AtomicWeightTable> = Lazy::new(|| {
    AtomicWeightTable::from_entries(ATOMIC_WEIGHTS)
        .unwrap_or_else(|e| panic!("built-in atomic weight table is invalid: {e}"))
});

/// Process-wide atomic weight table.
pub fn atomic_weights() -> &'static AtomicWeightTable {
    &TABLE
}

/// Immutable symbol → atomic weight lookup.
#[derive(Debug, Clone)]
pub struct AtomicWeightTable {
    weights: HashMap<&'static str, f64>,
}

impl AtomicWeightTable {
    /// Build and validate a table from literal entries.
    ///
    /// Rejects malformed symbols, non-positive or non-finite weights, and
    /// duplicate symbols.
    pub fn from_entries(entries: &[(&'static str, f64)]) -> Result<Self, TableError> {
        let mut weights = HashMap::with_capacity(entries.len());
        for &(symbol, weight) in entries {
            if !is_element_symbol(symbol) {
                return Err(TableError::malformed(
                    "atomic weight table",
                    symbol,
                    "symbol must be an uppercase letter optionally followed by a lowercase letter",
                ));
            }
            if !weight.is_finite() || weight <= 0.0 {
                return Err(TableError::malformed(
                    "atomic weight table",
                    symbol,
                    format!("weight must be positive, got {weight}"),
                ));
            }
            if weights.insert(symbol, weight).is_some() {
                return Err(TableError::DuplicateEntry {
                    table: "atomic weight table",
                    key: symbol.to_string(),
                });
            }
        }
        Ok(AtomicWeightTable { weights })
    }

    /// Atomic weight for an exact symbol
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.weights.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.weights.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// All symbols, sorted alphabetically
    pub fn symbols(&self) -> Vec<&'static str> {
        let mut symbols: Vec<_> = self.weights.keys().copied().collect();
        symbols.sort_unstable();
        symbols
    }
}

fn is_element_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(first), None, None) => first.is_ascii_uppercase(),
        (Some(first), Some(second), None) => first.is_ascii_uppercase() && second.is_ascii_lowercase(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_valid() {
        let table = atomic_weights();
        assert_eq!(table.len(), ATOMIC_WEIGHTS.len());
        assert_eq!(table.len(), 86);
        assert_eq!(table.get("Na"), Some(22.9897));
        assert_eq!(table.get("Cl"), Some(35.453));
        assert_eq!(table.get("Tc"), Some(98.0));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = atomic_weights();
        assert!(table.contains("Na"));
        assert!(!table.contains("na"));
        assert!(!table.contains("NA"));
    }

    #[test]
    fn test_rejects_malformed_symbol() {
        let err = AtomicWeightTable::from_entries(&[("na", 22.99)]).unwrap_err();
        assert!(matches!(err, TableError::MalformedEntry { .. }));
        assert!(AtomicWeightTable::from_entries(&[("Uuo", 294.0)]).is_err());
        assert!(AtomicWeightTable::from_entries(&[("", 1.0)]).is_err());
    }

    #[test]
    fn test_rejects_non_positive_weight() {
        assert!(AtomicWeightTable::from_entries(&[("H", 0.0)]).is_err());
        assert!(AtomicWeightTable::from_entries(&[("H", -1.0)]).is_err());
        assert!(AtomicWeightTable::from_entries(&[("H", f64::NAN)]).is_err());
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = AtomicWeightTable::from_entries(&[("H", 1.0), ("H", 1.0079)]).unwrap_err();
        assert_eq!(
            err,
            TableError::DuplicateEntry {
                table: "atomic weight table",
                key: "H".to_string()
            }
        );
    }

    #[test]
    fn test_symbols_sorted() {
        let symbols = atomic_weights().symbols();
        assert_eq!(symbols.first(), Some(&"Ag"));
        assert!(symbols.windows(2).all(|w| w[0] < w[1]));
    }
}
