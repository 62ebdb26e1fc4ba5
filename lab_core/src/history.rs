//! # Calculation History
//!
//! An append-only, in-memory log of completed calculations. The history is
//! owned by the front-end session; the calculators never read or write it.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::chemistry::evaluate_formula;
//! use lab_core::history::{CalculationHistory, CalculationRecord};
//!
//! let mut history = CalculationHistory::new();
//! let result = evaluate_formula("NaCl").unwrap();
//! history.record(CalculationRecord::MolecularWeight(result));
//! assert_eq!(history.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chemistry::{DilutionResult, MolarityResult, MolecularWeightResult};
use crate::media::ScaledRecipe;
use crate::stats::ReplicateSummary;

/// Any completed calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationRecord {
    MolecularWeight(MolecularWeightResult),
    Molarity(MolarityResult),
    Dilution(DilutionResult),
    Media(ScaledRecipe),
    Statistics(ReplicateSummary),
}

impl CalculationRecord {
    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationRecord::MolecularWeight(_) => "Molecular Weight",
            CalculationRecord::Molarity(_) => "Molarity",
            CalculationRecord::Dilution(_) => "Dilution",
            CalculationRecord::Media(_) => "Media",
            CalculationRecord::Statistics(_) => "Statistics",
        }
    }

    /// One-line summary for history listings
    pub fn summary(&self) -> String {
        match self {
            CalculationRecord::MolecularWeight(r) => {
                format!("{}: {:.3} g/mol", r.formula, r.molecular_weight)
            }
            CalculationRecord::Molarity(r) => format!(
                "{} {} M in {} L: {:.4} g",
                r.formula, r.molarity_mol_per_l, r.volume_l, r.mass_g
            ),
            CalculationRecord::Dilution(r) => format!(
                "{} -> {} in {}: {:.3} stock + {:.3} diluent",
                r.stock_concentration, r.final_concentration, r.final_volume, r.stock_volume, r.diluent_volume
            ),
            CalculationRecord::Media(r) => r.title.clone(),
            CalculationRecord::Statistics(r) => {
                format!("n={}: mean {:.4}, SD {:.4}", r.count(), r.mean, r.stdev)
            }
        }
    }
}

/// A recorded calculation with its identity and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub record: CalculationRecord,
}

/// Append-only calculation log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationHistory {
    entries: Vec<HistoryEntry>,
}

impl CalculationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a calculation; returns the UUID assigned to it.
    pub fn record(&mut self, record: CalculationRecord) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.push(HistoryEntry {
            id,
            recorded_at: Utc::now(),
            record,
        });
        id
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &Uuid) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == *id)
    }

    /// Up to `n` most recent entries, newest first
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev().take(n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::evaluate_formula;
    use crate::media::scale_recipe;

    #[test]
    fn test_append_and_lookup() {
        let mut history = CalculationHistory::new();
        assert!(history.is_empty());

        let first = history.record(CalculationRecord::MolecularWeight(evaluate_formula("NaCl").unwrap()));
        let second = history.record(CalculationRecord::Media(scale_recipe("LB", 1.0, 1, true).unwrap()));

        assert_eq!(history.len(), 2);
        assert_ne!(first, second);
        assert_eq!(history.get(&first).unwrap().record.calc_type(), "Molecular Weight");
        assert_eq!(history.entries()[1].id, second);
    }

    #[test]
    fn test_latest_is_newest_first() {
        let mut history = CalculationHistory::new();
        for formula in ["H2O", "NaCl", "KCl"] {
            history.record(CalculationRecord::MolecularWeight(evaluate_formula(formula).unwrap()));
        }
        let latest: Vec<_> = history.latest(2).map(|e| e.record.summary()).collect();
        assert_eq!(latest.len(), 2);
        assert!(latest[0].starts_with("KCl"));
        assert!(latest[1].starts_with("NaCl"));
    }

    #[test]
    fn test_summary() {
        let record = CalculationRecord::MolecularWeight(evaluate_formula("NaCl").unwrap());
        assert_eq!(record.summary(), "NaCl: 58.443 g/mol");
        let media = CalculationRecord::Media(scale_recipe("LB", 1.0, 1, false).unwrap());
        assert_eq!(media.summary(), "LB Medium (1.0 L)");
        let stats = CalculationRecord::Statistics(crate::stats::summarize(&[1.0, 3.0]).unwrap());
        assert_eq!(stats.summary(), "n=2: mean 2.0000, SD 1.4142");
        assert_eq!(stats.calc_type(), "Statistics");
    }

    #[test]
    fn test_history_serialization() {
        let mut history = CalculationHistory::new();
        history.record(CalculationRecord::MolecularWeight(evaluate_formula("CaCl2").unwrap()));
        let json = serde_json::to_string(&history).unwrap();
        assert!(json.contains("\"type\":\"MolecularWeight\""));
        let roundtrip: CalculationHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.len(), 1);
        assert_eq!(roundtrip.entries()[0].id, history.entries()[0].id);
        assert_eq!(roundtrip.entries()[0].recorded_at, history.entries()[0].recorded_at);
        assert_eq!(roundtrip.entries()[0].record.summary(), "CaCl2: 110.984 g/mol");
    }
}
