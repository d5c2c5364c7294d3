//! # flex-settlement: Balancing-Market Settlement Calculator
//!
//! Settles one flexibility activation across ten scenario variants and three
//! actors: the balance responsible party (BRP), the balancing service provider
//! (BSP) and the retailer (RE).
//!
//! ## Pipeline
//!
//! 1. [`variant`] binds each variant to a settlement basis, party structure,
//!    compensation rule and consumption baseline.
//! 2. [`brp`], [`bsp`] and [`retailer`] compute one ledger per actor.
//! 3. [`matrix`] runs the ledgers for all variants.
//! 4. [`summary`] and [`neutralization`] derive combined results, the goal
//!    comparison and customer compensation.
//! 5. [`tables`] renders everything into named-field tables.
//!
//! Every step is a pure function of the [`ParameterSet`](flex_core::ParameterSet).
//!
//! ```
//! use flex_core::{Figure, ParameterSet};
//! use flex_settlement::SettlementTables;
//!
//! let tables = SettlementTables::from_parameters(&ParameterSet::default());
//! let one_a = "1a".parse().unwrap();
//! assert_eq!(tables.bsp.get(one_a, "BSP net result"), Some(Figure::Value(56.0)));
//! ```

pub mod brp;
pub mod bsp;
pub mod matrix;
pub mod neutralization;
pub mod retailer;
pub mod summary;
pub mod tables;
pub mod variant;

pub use brp::BrpLedger;
pub use bsp::BspLedger;
pub use matrix::{ScenarioMatrix, VariantSettlement};
pub use neutralization::{CustomerPriceComparison, Neutralization};
pub use retailer::RetailerLedger;
pub use summary::ActorSummary;
pub use tables::{FieldSpec, SettlementTables, Table, TableKind};
pub use variant::{
    binding_for, CompensationFlow, CompensationRule, ConsumptionBaseline, ResolvedVariant,
    SettlementBasis, VariantBinding, REFERENCE_VARIANT, VARIANT_TABLE,
};
