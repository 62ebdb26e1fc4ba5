//! # Error Types
//!
//! Structured error types for lab_core. Each component reports its own typed
//! failure ([`FormulaError`], [`ScaleError`]); [`LabError`] wraps both for
//! callers that combine several operations (solution math, settings, export).
//!
//! ## Example
//!
//! ```rust
//! use lab_core::errors::{FormulaError, LabResult};
//! use lab_core::chemistry::evaluate_formula;
//!
//! fn weight_or_zero(formula: &str) -> LabResult<f64> {
//!     match evaluate_formula(formula) {
//!         Ok(result) => Ok(result.molecular_weight),
//!         Err(FormulaError::EmptyFormula) => Ok(0.0),
//!         Err(e) => Err(e.into()),
//!     }
//! }
//!
//! assert_eq!(weight_or_zero("").unwrap(), 0.0);
//! assert!(weight_or_zero("Xx").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for lab_core operations
pub type LabResult<T> = Result<T, LabError>;

/// Failure while evaluating a chemical formula.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum FormulaError {
    /// No element tokens were found in the input string
    #[error("Invalid chemical formula format: no element symbols found")]
    EmptyFormula,

    /// A parsed subscript was zero or did not fit in a count
    #[error("Invalid element count for {symbol}")]
    InvalidElementCount { symbol: String },

    /// Element symbol is not in the atomic weight table
    #[error("Unknown element '{symbol}'")]
    UnknownElement { symbol: String },

    /// Character not covered by any token (strict parse mode only)
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { position: usize, character: char },
}

impl FormulaError {
    /// Create an InvalidElementCount error
    pub fn invalid_element_count(symbol: impl Into<String>) -> Self {
        FormulaError::InvalidElementCount {
            symbol: symbol.into(),
        }
    }

    /// Create an UnknownElement error
    pub fn unknown_element(symbol: impl Into<String>) -> Self {
        FormulaError::UnknownElement {
            symbol: symbol.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            FormulaError::EmptyFormula => "EMPTY_FORMULA",
            FormulaError::InvalidElementCount { .. } => "INVALID_ELEMENT_COUNT",
            FormulaError::UnknownElement { .. } => "UNKNOWN_ELEMENT",
            FormulaError::UnexpectedCharacter { .. } => "UNEXPECTED_CHARACTER",
        }
    }
}

/// Failure while scaling a media recipe.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ScaleError {
    /// Volume or batch count out of range
    #[error("Invalid scale parameter '{field}': {value} - {reason}")]
    InvalidScaleParameters {
        field: String,
        value: String,
        reason: String,
    },

    /// Template ID does not name a known recipe
    #[error("Unknown recipe template: {template_id}")]
    UnknownTemplate { template_id: String },
}

impl ScaleError {
    /// Create an InvalidScaleParameters error
    pub fn invalid_parameters(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ScaleError::InvalidScaleParameters {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownTemplate error
    pub fn unknown_template(template_id: impl Into<String>) -> Self {
        ScaleError::UnknownTemplate {
            template_id: template_id.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ScaleError::InvalidScaleParameters { .. } => "INVALID_SCALE_PARAMETERS",
            ScaleError::UnknownTemplate { .. } => "UNKNOWN_TEMPLATE",
        }
    }
}

/// Malformed static lookup table, detected when the table is built.
///
/// Tables are constructed once at process start; one of these errors there
/// aborts startup rather than surfacing at call time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// An entry violates the table's shape or value constraints
    #[error("Malformed entry '{key}' in {table}: {reason}")]
    MalformedEntry {
        table: &'static str,
        key: String,
        reason: String,
    },

    /// The same key appears twice
    #[error("Duplicate entry '{key}' in {table}")]
    DuplicateEntry { table: &'static str, key: String },
}

impl TableError {
    /// Create a MalformedEntry error
    pub fn malformed(table: &'static str, key: impl Into<String>, reason: impl Into<String>) -> Self {
        TableError::MalformedEntry {
            table,
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Crate-wide error type.
///
/// Every variant provides enough context for the caller to render a
/// precise message without re-parsing strings.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LabError {
    /// Formula could not be evaluated
    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// Recipe could not be scaled
    #[error(transparent)]
    Scale(#[from] ScaleError),

    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Settings schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl LabError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if the caller can fix the error by changing its input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LabError::Formula(_) | LabError::Scale(_) | LabError::InvalidInput { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LabError::Formula(e) => e.error_code(),
            LabError::Scale(e) => e.error_code(),
            LabError::InvalidInput { .. } => "INVALID_INPUT",
            LabError::FileError { .. } => "FILE_ERROR",
            LabError::SerializationError { .. } => "SERIALIZATION_ERROR",
            LabError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for LabError {
    fn from(e: serde_json::Error) -> Self {
        LabError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = LabError::from(FormulaError::unknown_element("Xx"));
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UnknownElement"));
        assert!(json.contains("Xx"));
        let roundtrip: LabError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FormulaError::EmptyFormula.error_code(), "EMPTY_FORMULA");
        assert_eq!(
            LabError::from(ScaleError::unknown_template("TSB")).error_code(),
            "UNKNOWN_TEMPLATE"
        );
        assert_eq!(LabError::invalid_input("volume_l", "0", "x").error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_messages_carry_offending_symbol() {
        assert_eq!(
            FormulaError::invalid_element_count("H").to_string(),
            "Invalid element count for H"
        );
        assert_eq!(
            LabError::from(FormulaError::unknown_element("Qq")).to_string(),
            "Unknown element 'Qq'"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(LabError::from(FormulaError::EmptyFormula).is_recoverable());
        assert!(!LabError::file_error("write", "/tmp/x", "denied").is_recoverable());
    }
}
