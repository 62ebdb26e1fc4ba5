//! Preparation protocol text for a scaled recipe.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::scaler::ScaledComponent;
use super::templates::RecipeTemplate;
use crate::units::{Liters, Milliliters};

/// Ordered bench steps followed by special-handling notes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Protocol {
    pub steps: Vec<String>,
    pub notes: Vec<String>,
}

impl Protocol {
    /// Build the protocol for `components` prepared at `total_volume_l`.
    pub fn build(template: &RecipeTemplate, components: &[ScaledComponent], total_volume_l: f64, solid: bool) -> Self {
        let dissolve_ml: Milliliters = Liters(total_volume_l * 0.8).into();
        let filtered: Vec<&str> = components
            .iter()
            .filter(|c| c.filter_fresh)
            .map(|c| c.name.as_str())
            .collect();
        let separate: Vec<&str> = components
            .iter()
            .filter(|c| c.add_separately)
            .map(|c| c.name.as_str())
            .collect();

        let mut steps = vec![
            format!("Weigh the dry components and measure the stock solutions for {total_volume_l:.1} L."),
            format!("Dissolve in about {:.0} mL DDW (~80% of the final volume).", dissolve_ml.0),
        ];
        if let Some(ph) = template.ph {
            steps.push(format!("Adjust pH to {ph}."));
        }
        steps.push(format!("Bring to a final volume of {total_volume_l:.1} L with DDW."));
        steps.push(format!("Autoclave at {}.", template.autoclave));
        if solid {
            steps.push("Cool to ~50°C, add heat-sensitive components, then pour plates.".to_string());
        } else {
            steps.push("Cool to ~50°C before adding heat-sensitive components.".to_string());
        }
        steps.push("Label with medium name, volume and date; store at 4°C for up to 1 month.".to_string());

        let mut notes = Vec::new();
        if !filtered.is_empty() {
            notes.push(format!(
                "Filter sterilize components marked \"filter fresh\" and add after autoclaving: {}.",
                filtered.join(", ")
            ));
        }
        if !separate.is_empty() {
            notes.push(format!("Add {} separately when using the medium.", separate.join(", ")));
        }
        notes.extend(template.notes.iter().map(|n| n.to_string()));

        Protocol { steps, notes }
    }

    /// Numbered steps and bulleted notes as plain text
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, step);
        }
        if !self.notes.is_empty() {
            out.push_str("\nImportant notes:\n");
            for note in &self.notes {
                let _ = writeln!(out, "- {note}");
            }
        }
        out
    }
}
