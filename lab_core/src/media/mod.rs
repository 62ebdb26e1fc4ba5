//! # Media Preparation
//!
//! Scales bacterial growth-media recipes to a target volume and batch count,
//! and writes the matching preparation protocol.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::media::scale_recipe;
//!
//! let recipe = scale_recipe("LB", 2.0, 1, true).unwrap();
//! assert_eq!(recipe.title, "LB-Agar Medium (2.0 L)");
//! assert_eq!(recipe.components[0].display_amount(), "40.00 g");
//! assert_eq!(recipe.components[1].display_amount(), "30.00 g");
//! ```

pub mod protocol;
pub mod scaler;
pub mod templates;

pub use protocol::Protocol;
pub use scaler::{scale, scale_recipe, ScaledComponent, ScaledRecipe};
pub use templates::{template_for, Presence, RecipeComponent, RecipeTemplate};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ScaleError;

/// The closed set of media recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    /// Lysogeny Broth
    #[serde(rename = "LB")]
    Lb,
    /// LB + glycerol + MnCl₂
    #[serde(rename = "LBGM")]
    Lbgm,
    /// MSGG minimal medium, 2x concentrate
    #[serde(rename = "MSGG_2x")]
    Msgg2x,
}

impl MediaType {
    /// All media types, in menu order
    pub const ALL: [MediaType; 3] = [MediaType::Lb, MediaType::Lbgm, MediaType::Msgg2x];

    /// Template ID used by `scale_recipe`
    pub fn id(&self) -> &'static str {
        match self {
            MediaType::Lb => "LB",
            MediaType::Lbgm => "LBGM",
            MediaType::Msgg2x => "MSGG_2x",
        }
    }

    /// Name used in titles (e.g. "MSGG(2x)")
    pub fn display_name(&self) -> &'static str {
        match self {
            MediaType::Lb => "LB",
            MediaType::Lbgm => "LBGM",
            MediaType::Msgg2x => "MSGG(2x)",
        }
    }

    pub fn template(&self) -> &'static RecipeTemplate {
        template_for(*self)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MediaType {
    type Err = ScaleError;

    /// Accepts the template ID in any case, or the display name with an
    /// optional " Medium" suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_suffix(" Medium").unwrap_or(trimmed);
        MediaType::ALL
            .into_iter()
            .find(|m| m.id().eq_ignore_ascii_case(name) || m.display_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ScaleError::unknown_template(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_media_type() {
        assert_eq!("LB".parse::<MediaType>().unwrap(), MediaType::Lb);
        assert_eq!("lbgm".parse::<MediaType>().unwrap(), MediaType::Lbgm);
        assert_eq!("MSGG_2x".parse::<MediaType>().unwrap(), MediaType::Msgg2x);
        assert_eq!("MSGG(2x) Medium".parse::<MediaType>().unwrap(), MediaType::Msgg2x);
        assert_eq!(
            "TSB".parse::<MediaType>(),
            Err(ScaleError::unknown_template("TSB"))
        );
    }

    #[test]
    fn test_media_type_serialization() {
        assert_eq!(serde_json::to_string(&MediaType::Msgg2x).unwrap(), "\"MSGG_2x\"");
        let parsed: MediaType = serde_json::from_str("\"LBGM\"").unwrap();
        assert_eq!(parsed, MediaType::Lbgm);
    }
}
