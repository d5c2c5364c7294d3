//! Shared error type for the flex settlement workspace
//!
//! The calculator itself never fails: unavailable figures are carried as
//! [`Figure::NotApplicable`](crate::Figure) instead. [`FlexError`] covers the
//! surrounding plumbing: parsing identifiers and units, validating parameter
//! inputs, and reading or writing tables and parameter files.
//!
//! # Example
//!
//! ```
//! use flex_core::{FlexError, FlexResult, VariantId};
//!
//! fn first_variant(text: &str) -> FlexResult<VariantId> {
//!     let id = text.parse::<VariantId>()?;
//!     Ok(id)
//! }
//!
//! assert!(first_variant("3b").is_ok());
//! assert!(matches!(first_variant("9z"), Err(FlexError::Parse(_))));
//! ```

use thiserror::Error;

/// Unified error type for all flex operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlexError {
    /// Unknown identifiers, units or trade directions
    #[error("Parse error: {0}")]
    Parse(String),

    /// Parameter validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Parameter files that cannot be read as any supported format
    #[error("Configuration error: {0}")]
    Config(String),

    /// Table export/import errors
    #[error("Export error: {0}")]
    Export(String),
}

/// Convenience type alias for Results using FlexError.
pub type FlexResult<T> = Result<T, FlexError>;
