//! # Export
//!
//! Renders already-computed results as plain text, CSV or JSON. Nothing here
//! touches the filesystem; see [`crate::file_io::write_export`].
//!
//! ## Example
//!
//! ```rust
//! use lab_core::export::render;
//! use lab_core::media::scale_recipe;
//! use lab_core::settings::ExportFormat;
//!
//! let recipe = scale_recipe("LB", 1.0, 1, true).unwrap();
//! let csv = render(&recipe, ExportFormat::Csv).unwrap();
//! assert!(csv.starts_with("component,amount,unit,display"));
//! ```

use std::fmt::Write;

use serde::Serialize;

use crate::chemistry::{DilutionResult, MolarityResult, MolecularWeightResult};
use crate::errors::LabResult;
use crate::history::CalculationHistory;
use crate::media::ScaledRecipe;
use crate::settings::ExportFormat;
use crate::stats::ReplicateSummary;

/// A result that can be written out as a report.
pub trait Report: Serialize {
    /// Human-readable report
    fn text(&self) -> String;

    /// CSV header columns
    fn csv_header(&self) -> &'static [&'static str];

    /// CSV data rows, one `Vec` per line
    fn csv_rows(&self) -> Vec<Vec<String>>;
}

/// Render a report in the requested format.
pub fn render<R: Report>(report: &R, format: ExportFormat) -> LabResult<String> {
    match format {
        ExportFormat::Text => Ok(report.text()),
        ExportFormat::Csv => Ok(to_csv(report.csv_header(), &report.csv_rows())),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

fn to_csv(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    let header: Vec<String> = header.iter().map(|h| csv_field(h)).collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in rows {
        let fields: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl Report for MolecularWeightResult {
    fn text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Formula: {}", self.formula);
        let _ = writeln!(out, "Molecular Weight: {:.3} g/mol", self.molecular_weight);
        for row in &self.breakdown {
            let _ = writeln!(
                out,
                "  {:<3} x{:<4} {:>10.4} g/mol  = {:>10.4}",
                row.symbol, row.count, row.atomic_weight, row.contribution
            );
        }
        out
    }

    fn csv_header(&self) -> &'static [&'static str] {
        &["formula", "element", "count", "atomic_weight", "contribution"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.breakdown
            .iter()
            .map(|row| {
                vec![
                    self.formula.clone(),
                    row.symbol.clone(),
                    row.count.to_string(),
                    row.atomic_weight.to_string(),
                    row.contribution.to_string(),
                ]
            })
            .collect()
    }
}

impl Report for MolarityResult {
    fn text(&self) -> String {
        format!(
            "Formula: {}\nMolecular Weight: {:.3} g/mol\nMolarity: {} mol/L\nVolume: {} L\nMass needed: {:.4} g ({:.2} mg)\n",
            self.formula, self.molecular_weight, self.molarity_mol_per_l, self.volume_l, self.mass_g, self.mass_mg
        )
    }

    fn csv_header(&self) -> &'static [&'static str] {
        &["formula", "molecular_weight", "molarity_mol_per_l", "volume_l", "mass_g", "mass_mg"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.formula.clone(),
            format!("{:.3}", self.molecular_weight),
            self.molarity_mol_per_l.to_string(),
            self.volume_l.to_string(),
            format!("{:.4}", self.mass_g),
            format!("{:.2}", self.mass_mg),
        ]]
    }
}

impl Report for DilutionResult {
    fn text(&self) -> String {
        format!(
            "Stock: {} -> Final: {} in {}\nStock volume: {:.4}\nDiluent volume: {:.4}\n",
            self.stock_concentration, self.final_concentration, self.final_volume, self.stock_volume, self.diluent_volume
        )
    }

    fn csv_header(&self) -> &'static [&'static str] {
        &["stock_concentration", "final_concentration", "final_volume", "stock_volume", "diluent_volume"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.stock_concentration.to_string(),
            self.final_concentration.to_string(),
            self.final_volume.to_string(),
            format!("{:.4}", self.stock_volume),
            format!("{:.4}", self.diluent_volume),
        ]]
    }
}

impl Report for ReplicateSummary {
    fn text(&self) -> String {
        let cv = self.cv_percent().map_or_else(|| "n/a".to_string(), |cv| format!("{cv:.2}%"));
        format!(
            "Replicates: {}\nMean: {:.4}\nSD: {:.4}\nCV: {}\n",
            self.count(),
            self.mean,
            self.stdev,
            cv
        )
    }

    fn csv_header(&self) -> &'static [&'static str] {
        &["n", "mean", "stdev"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        vec![vec![self.count().to_string(), format!("{:.4}", self.mean), format!("{:.4}", self.stdev)]]
    }
}

impl Report for ScaledRecipe {
    fn text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        if self.batch_count > 1 {
            let _ = writeln!(out, "{} batches x {} L", self.batch_count, self.target_volume_l);
        }
        out.push('\n');
        let width = self.components.iter().map(|c| c.name.chars().count()).max().unwrap_or(0);
        for component in &self.components {
            let pad = width - component.name.chars().count();
            let _ = writeln!(out, "  {}{}  {}", component.name, " ".repeat(pad), component.display_amount());
        }
        out.push('\n');
        out.push_str(&self.protocol.to_text());
        out
    }

    fn csv_header(&self) -> &'static [&'static str] {
        &["component", "amount", "unit", "display"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.components
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    format!("{:.*}", c.decimals, c.amount),
                    c.unit.symbol().to_string(),
                    c.display_amount(),
                ]
            })
            .collect()
    }
}

impl Report for CalculationHistory {
    fn text(&self) -> String {
        let mut out = String::new();
        for entry in self.entries() {
            let _ = writeln!(
                out,
                "{}  [{}] {}",
                entry.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                entry.record.calc_type(),
                entry.record.summary()
            );
        }
        out
    }

    fn csv_header(&self) -> &'static [&'static str] {
        &["id", "recorded_at", "type", "summary"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.entries()
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.recorded_at.to_rfc3339(),
                    e.record.calc_type().to_string(),
                    e.record.summary(),
                ]
            })
            .collect()
    }
}
