//! # Recipe Scaling
//!
//! Every component is scaled independently by
//! `scale_factor = target_volume × batch_count ÷ reference_volume`; nothing is
//! rounded until display.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::media::{scale, MediaType};
//!
//! let recipe = scale(MediaType::Msgg2x.template(), 0.5, 1, false).unwrap();
//! assert_eq!(recipe.scale_factor, 1.0);
//! assert_eq!(recipe.components[0].display_amount(), "3.075 mL");
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::protocol::Protocol;
use super::templates::RecipeTemplate;
use super::MediaType;
use crate::errors::ScaleError;
use crate::units::AmountUnit;

/// Recipes with more components than this are shown in two columns
const SINGLE_COLUMN_LIMIT: usize = 8;

/// One scaled ingredient line.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "1M MOPS",
///   "amount": 100.0,
///   "unit": "mL",
///   "decimals": 1,
///   "notes": ["filter fresh", "pH 7.0"],
///   "filter_fresh": true,
///   "add_separately": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledComponent {
    pub name: String,
    /// reference_amount × scale_factor, unrounded
    pub amount: f64,
    pub unit: AmountUnit,
    /// Display precision for `amount`
    pub decimals: usize,
    /// Handling remarks printed after the amount
    pub notes: Vec<String>,
    pub filter_fresh: bool,
    pub add_separately: bool,
}

impl ScaledComponent {
    /// Amount with unit at the component's precision, e.g. "100.0 mL (filter fresh, pH 7.0)"
    pub fn display_amount(&self) -> String {
        let base = format!("{:.*} {}", self.decimals, self.amount, self.unit);
        if self.notes.is_empty() {
            base
        } else {
            format!("{} ({})", base, self.notes.join(", "))
        }
    }
}

/// A recipe scaled to a requested volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledRecipe {
    pub media_type: MediaType,
    pub template_version: u32,
    /// e.g. "MSGG(2x)-Agar Medium (1.0 L)"
    pub title: String,
    /// Volume of one batch (L)
    pub target_volume_l: f64,
    pub batch_count: u32,
    /// target_volume_l × batch_count
    pub total_volume_l: f64,
    pub scale_factor: f64,
    /// Agar (solid) variant selected
    pub include_optional: bool,
    /// Components in template order
    pub components: Vec<ScaledComponent>,
    pub protocol: Protocol,
}

impl ScaledRecipe {
    /// Template ID of the scaled recipe
    pub fn template_id(&self) -> &'static str {
        self.media_type.id()
    }

    /// Look up a component by name
    pub fn component(&self, name: &str) -> Option<&ScaledComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Primary and secondary display columns.
    ///
    /// Recipes with more than 8 components split at the midpoint; shorter
    /// ones return everything in the first column.
    pub fn columns(&self) -> (&[ScaledComponent], &[ScaledComponent]) {
        if self.components.len() > SINGLE_COLUMN_LIMIT {
            self.components.split_at(self.components.len() / 2)
        } else {
            (self.components.as_slice(), &[])
        }
    }
}

/// Scale a recipe template.
///
/// # Arguments
///
/// * `template` - Recipe to scale
/// * `target_volume_l` - Volume of one batch in liters
/// * `batch_count` - Number of batches (at least 1)
/// * `include_optional` - Prepare the agar (solid) variant
///
/// # Errors
///
/// * `ScaleError::InvalidScaleParameters` - volume not positive, or zero batches
pub fn scale(
    template: &RecipeTemplate,
    target_volume_l: f64,
    batch_count: u32,
    include_optional: bool,
) -> Result<ScaledRecipe, ScaleError> {
    if !target_volume_l.is_finite() || target_volume_l <= 0.0 {
        warn!("rejected {} volume {}", template.id(), target_volume_l);
        return Err(ScaleError::invalid_parameters(
            "target_volume_l",
            target_volume_l.to_string(),
            "Volume must be a positive number of liters",
        ));
    }
    if batch_count < 1 {
        warn!("rejected {} batch count {}", template.id(), batch_count);
        return Err(ScaleError::invalid_parameters(
            "batch_count",
            batch_count.to_string(),
            "At least one batch is required",
        ));
    }

    let total_volume_l = target_volume_l * f64::from(batch_count);
    if !total_volume_l.is_finite() {
        warn!("rejected {} total volume {} x {}", template.id(), target_volume_l, batch_count);
        return Err(ScaleError::invalid_parameters(
            "target_volume_l",
            target_volume_l.to_string(),
            format!("Total volume for {batch_count} batches is out of range"),
        ));
    }
    let scale_factor = total_volume_l / template.reference_volume_l;

    let components: Vec<ScaledComponent> = template
        .components_for(include_optional)
        .map(|c| {
            let mut notes = Vec::new();
            if c.filter_fresh {
                notes.push("filter fresh".to_string());
            }
            if let Some(note) = c.note {
                notes.push(note.to_string());
            }
            if c.add_separately {
                notes.push("add when using".to_string());
            }
            ScaledComponent {
                name: c.name.to_string(),
                amount: c.reference_amount * scale_factor,
                unit: c.unit,
                decimals: c.decimals,
                notes,
                filter_fresh: c.filter_fresh,
                add_separately: c.add_separately,
            }
        })
        .collect();
    if let Some(c) = components.iter().find(|c| !c.amount.is_finite()) {
        warn!("rejected {} volume {}: {} overflows", template.id(), total_volume_l, c.name);
        return Err(ScaleError::invalid_parameters(
            "target_volume_l",
            target_volume_l.to_string(),
            format!("Scaled amount of {} is out of range", c.name),
        ));
    }

    let media_type = template.media_type;
    let title = format!(
        "{}{} Medium ({:.1} L)",
        media_type.display_name(),
        if include_optional { "-Agar" } else { "" },
        total_volume_l
    );
    let protocol = Protocol::build(template, &components, total_volume_l, include_optional);
    debug!(
        "scaled {} x{:.4} ({} components, {} L)",
        media_type.id(),
        scale_factor,
        components.len(),
        total_volume_l
    );

    Ok(ScaledRecipe {
        media_type,
        template_version: template.version,
        title,
        target_volume_l,
        batch_count,
        total_volume_l,
        scale_factor,
        include_optional,
        components,
        protocol,
    })
}

/// Scale a recipe by template ID (`"LB"`, `"LBGM"` or `"MSGG_2x"`).
///
/// # Errors
///
/// * `ScaleError::UnknownTemplate` - ID does not name a recipe
/// * `ScaleError::InvalidScaleParameters` - see [`scale`]
pub fn scale_recipe(
    template_id: &str,
    volume_liters: f64,
    batch_count: u32,
    include_optional: bool,
) -> Result<ScaledRecipe, ScaleError> {
    let media_type: MediaType = template_id.parse()?;
    scale(media_type.template(), volume_liters, batch_count, include_optional)
}
