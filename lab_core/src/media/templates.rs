//! Media Recipe Templates
//!
//! Static growth-media recipes. Every amount is given per the template's own
//! reference volume (1 L for LB and LBGM, 0.5 L for the 2x concentrated
//! MSGG), and the values reproduce the bench recipes exactly.
//!
//! Components carry a [`Presence`] selector: liquid-only and solid-only
//! entries let a template add agar and also swap a reagent between two
//! variants (MSGG's FeCl₃ is 10 mL liquid, 12.5 mL solid per 0.5 L).

use once_cell::sync::Lazy;
use serde::Serialize;

use super::MediaType;
use crate::errors::TableError;
use crate::units::AmountUnit;

/// Which variant of the medium a component belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Presence {
    /// Included in both liquid and solid media
    Always,
    /// Included only in agar (solid) media
    Solid,
    /// Included only in liquid media
    Liquid,
}

impl Presence {
    /// Whether a component with this presence is used for the given variant
    pub fn included(&self, solid: bool) -> bool {
        match self {
            Presence::Always => true,
            Presence::Solid => solid,
            Presence::Liquid => !solid,
        }
    }
}

/// One ingredient line of a recipe template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecipeComponent {
    pub name: &'static str,
    /// Amount per template reference volume
    pub reference_amount: f64,
    pub unit: AmountUnit,
    /// Decimal places used when displaying the scaled amount
    pub decimals: usize,
    pub presence: Presence,
    /// Filter sterilize and add after autoclaving
    pub filter_fresh: bool,
    /// Kept apart and added only when the medium is used
    pub add_separately: bool,
    /// Extra handling remark shown with the amount
    pub note: Option<&'static str>,
}

impl RecipeComponent {
    const fn new(name: &'static str, reference_amount: f64, unit: AmountUnit, decimals: usize) -> Self {
        RecipeComponent {
            name,
            reference_amount,
            unit,
            decimals,
            presence: Presence::Always,
            filter_fresh: false,
            add_separately: false,
            note: None,
        }
    }

    const fn grams(name: &'static str, reference_amount: f64) -> Self {
        Self::new(name, reference_amount, AmountUnit::Grams, 2)
    }

    const fn ml(name: &'static str, reference_amount: f64, decimals: usize) -> Self {
        Self::new(name, reference_amount, AmountUnit::Milliliters, decimals)
    }

    const fn solid_only(self) -> Self {
        RecipeComponent { presence: Presence::Solid, ..self }
    }

    const fn liquid_only(self) -> Self {
        RecipeComponent { presence: Presence::Liquid, ..self }
    }

    const fn filter_fresh(self) -> Self {
        RecipeComponent { filter_fresh: true, ..self }
    }

    const fn add_separately(self) -> Self {
        RecipeComponent { add_separately: true, ..self }
    }

    const fn with_note(self, note: &'static str) -> Self {
        RecipeComponent { note: Some(note), ..self }
    }
}

/// A named growth-medium recipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecipeTemplate {
    pub media_type: MediaType,
    /// Recipe revision, bumped whenever an amount changes
    pub version: u32,
    /// Volume all reference amounts are given for (L)
    pub reference_volume_l: f64,
    /// Components in display order
    pub components: &'static [RecipeComponent],
    /// Target pH, if the medium is adjusted
    pub ph: Option<&'static str>,
    /// Autoclave conditions
    pub autoclave: &'static str,
    /// Short description of the medium
    pub description: &'static str,
    /// Template-specific preparation notes
    pub notes: &'static [&'static str],
}

const AUTOCLAVE_STANDARD: &str = "121°C, 15 psi, 15-20 min";

const AGAR_PER_LITER: RecipeComponent = RecipeComponent::grams("Agar", 15.0).solid_only();

pub const LB: RecipeTemplate = RecipeTemplate {
    media_type: MediaType::Lb,
    version: 1,
    reference_volume_l: 1.0,
    components: &[RecipeComponent::grams("LB powder", 20.0), AGAR_PER_LITER],
    ph: Some("7.0"),
    autoclave: AUTOCLAVE_STANDARD,
    description: "Lysogeny Broth: general purpose rich medium for most E. coli strains",
    notes: &[],
};

pub const LBGM: RecipeTemplate = RecipeTemplate {
    media_type: MediaType::Lbgm,
    version: 1,
    reference_volume_l: 1.0,
    components: &[
        RecipeComponent::grams("LB powder", 20.0),
        RecipeComponent::ml("Glycerol (50%)", 20.0, 2),
        RecipeComponent::ml("MnCl₂ (10 mM)", 10.0, 2),
        AGAR_PER_LITER,
        RecipeComponent::new("DDW (to final volume)", 1.0, AmountUnit::Liters, 1),
    ],
    ph: Some("7.0"),
    autoclave: AUTOCLAVE_STANDARD,
    description: "LB with glycerol as carbon source and Mn²⁺ cofactor support",
    notes: &[],
};

pub const MSGG_2X: RecipeTemplate = RecipeTemplate {
    media_type: MediaType::Msgg2x,
    version: 1,
    reference_volume_l: 0.5,
    components: &[
        RecipeComponent::ml("1M K₂HPO₄", 3.075, 3),
        RecipeComponent::ml("1M KH₂PO₄", 1.925, 3),
        RecipeComponent::ml("1M MOPS", 100.0, 1).filter_fresh().with_note("pH 7.0"),
        RecipeComponent::ml("1M MgCl₂", 2.0, 1),
        RecipeComponent::ml("10mM MnCl₂", 5.0, 1),
        RecipeComponent::ml("10mM ZnCl₂", 0.1, 2),
        RecipeComponent::ml("1M CaCl₂", 0.7, 1),
        RecipeComponent::ml("10mM Thiamine", 5.0, 1),
        RecipeComponent::ml("10mg/ml Phenylalanine", 5.0, 1).filter_fresh(),
        RecipeComponent::ml("10mg/ml Tryptophan", 5.0, 1).filter_fresh(),
        RecipeComponent::ml("50% Glycerol", 10.0, 1),
        RecipeComponent::ml("10% Glutamic acid", 50.0, 1).filter_fresh(),
        RecipeComponent::ml("10mg/ml Threonine", 5.0, 1).filter_fresh(),
        RecipeComponent::ml("5mM FeCl₃", 10.0, 1).add_separately().liquid_only(),
        RecipeComponent::ml("5mM FeCl₃", 12.5, 1).add_separately().solid_only(),
        RecipeComponent::grams("Agar", 7.5).solid_only(),
        RecipeComponent::ml("DDW", 302.0, 1),
    ],
    ph: Some("7.0"),
    autoclave: AUTOCLAVE_STANDARD,
    description: "Minimal synthetic defined medium, 2x concentrated",
    notes: &[
        "Adjust MOPS to pH 7.0 with 1N NaOH before use.",
        "Store components separately if not using immediately.",
    ],
};

/// Validated templates, indexed in [`MediaType::ALL`] order
static TEMPLATES: Lazy<[&'static RecipeTemplate; 3]> = Lazy::new(|| {
    let templates = [&LB, &LBGM, &MSGG_2X];
    for (template, media_type) in templates.iter().zip(MediaType::ALL) {
        if template.media_type != media_type {
            panic!("recipe template table out of order at {}", media_type.id());
        }
        if let Err(e) = template.validate() {
            panic!("built-in recipe template is invalid: {e}");
        }
    }
    templates
});

/// The validated template for a media type
pub fn template_for(media_type: MediaType) -> &'static RecipeTemplate {
    let index = match media_type {
        MediaType::Lb => 0,
        MediaType::Lbgm => 1,
        MediaType::Msgg2x => 2,
    };
    TEMPLATES[index]
}

impl RecipeTemplate {
    /// Template ID (e.g. "MSGG_2x")
    pub fn id(&self) -> &'static str {
        self.media_type.id()
    }

    /// Check the template for values a scaled recipe could not honor.
    ///
    /// A component name may appear twice only as a liquid/solid pair.
    pub fn validate(&self) -> Result<(), TableError> {
        let table = "recipe templates";
        if !self.reference_volume_l.is_finite() || self.reference_volume_l <= 0.0 {
            return Err(TableError::malformed(table, self.id(), "reference volume must be positive"));
        }
        if self.components.is_empty() {
            return Err(TableError::malformed(table, self.id(), "template has no components"));
        }

        for (i, component) in self.components.iter().enumerate() {
            if component.name.trim().is_empty() {
                return Err(TableError::malformed(table, self.id(), format!("component {i} has no name")));
            }
            if !component.reference_amount.is_finite() || component.reference_amount <= 0.0 {
                return Err(TableError::malformed(
                    table,
                    format!("{}/{}", self.id(), component.name),
                    "reference amount must be positive",
                ));
            }
            let clash = self.components[..i].iter().any(|earlier| {
                earlier.name == component.name
                    && !matches!(
                        (earlier.presence, component.presence),
                        (Presence::Solid, Presence::Liquid) | (Presence::Liquid, Presence::Solid)
                    )
            });
            if clash {
                return Err(TableError::DuplicateEntry {
                    table,
                    key: format!("{}/{}", self.id(), component.name),
                });
            }
        }
        Ok(())
    }

    /// Components used for the liquid or solid variant, in template order
    pub fn components_for(&self, solid: bool) -> impl Iterator<Item = &'static RecipeComponent> {
        self.components.iter().filter(move |c| c.presence.included(solid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_validate() {
        for media_type in MediaType::ALL {
            let template = template_for(media_type);
            assert_eq!(template.media_type, media_type);
            assert!(template.validate().is_ok());
        }
    }

    #[test]
    fn test_reference_volumes() {
        assert_eq!(template_for(MediaType::Lb).reference_volume_l, 1.0);
        assert_eq!(template_for(MediaType::Lbgm).reference_volume_l, 1.0);
        assert_eq!(template_for(MediaType::Msgg2x).reference_volume_l, 0.5);
    }

    #[test]
    fn test_msgg_component_counts() {
        assert_eq!(MSGG_2X.components_for(false).count(), 15);
        assert_eq!(MSGG_2X.components_for(true).count(), 16);
        let fecl3: Vec<_> = MSGG_2X
            .components_for(true)
            .filter(|c| c.name == "5mM FeCl₃")
            .map(|c| c.reference_amount)
            .collect();
        assert_eq!(fecl3, [12.5]);
    }

    #[test]
    fn test_validate_rejects_bad_templates() {
        const BAD_VOLUME: RecipeTemplate = RecipeTemplate { reference_volume_l: 0.0, ..LB };
        assert!(BAD_VOLUME.validate().is_err());

        const EMPTY: RecipeTemplate = RecipeTemplate { components: &[], ..LB };
        assert!(EMPTY.validate().is_err());

        const ZERO_AMOUNT: RecipeTemplate = RecipeTemplate {
            components: &[RecipeComponent::grams("LB powder", 0.0)],
            ..LB
        };
        assert!(ZERO_AMOUNT.validate().is_err());

        const DUPLICATE: RecipeTemplate = RecipeTemplate {
            components: &[RecipeComponent::grams("Agar", 15.0), AGAR_PER_LITER],
            ..LB
        };
        assert!(matches!(DUPLICATE.validate(), Err(TableError::DuplicateEntry { .. })));
    }
}
