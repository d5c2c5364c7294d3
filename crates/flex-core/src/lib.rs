//! # flex-core: Balance Settlement Primitives
//!
//! Shared types for the flex settlement workspace: unit-safe quantities, the
//! `NA`-aware [`Figure`] cell, scenario variant identifiers, the Parameter Set
//! and the common error type.
//!
//! ## Sign conventions
//!
//! - Volumes bought are negative, volumes sold are positive.
//! - Money is seen from the ledger owner: revenue positive, cost negative.
//! - Inputs are non-negative magnitudes; every signed volume is derived.
//!
//! ## Quick Start
//!
//! ```
//! use flex_core::{ParameterInputs, ParameterSet, TradeDirection};
//!
//! let inputs = ParameterInputs {
//!     v_da: 100.0,
//!     trade_direction: TradeDirection::Buy,
//!     e_cons: Some(92.0),
//!     ..ParameterInputs::default()
//! };
//! let params = ParameterSet::resolve(&inputs);
//! assert_eq!(params.traded_volume().value(), -100.0);
//! ```
//!
//! ## Modules
//!
//! - [`units`] - `Mwh`, `Eur`, `EurPerMwh` and the table [`Unit`] tag
//! - [`figure`] - value-or-NA table cells
//! - [`variant`] - the ten scenario variants `1a` … `5b`
//! - [`params`] - parameter inputs, toggles and the resolved set
//! - [`diagnostics`] - input checking results

pub mod diagnostics;
pub mod error;
pub mod figure;
pub mod params;
pub mod units;
pub mod variant;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{FlexError, FlexResult};
pub use figure::{Figure, NOT_APPLICABLE};
pub use params::{ParameterInputs, ParameterSet, SettlementToggles, TradeDirection};
pub use units::{Eur, EurPerMwh, Mwh, Unit};
pub use variant::{Regulation, Scenario, VariantId};
