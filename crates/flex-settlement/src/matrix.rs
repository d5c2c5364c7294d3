//! The scenario matrix: every variant settled against one Parameter Set.

use flex_core::{ParameterSet, VariantId};

use crate::brp::{self, BrpLedger};
use crate::bsp::{self, BspLedger};
use crate::retailer::{self, RetailerLedger};
use crate::variant::{table_index, ResolvedVariant, VariantBinding, REFERENCE_VARIANT, VARIANT_TABLE};

/// The three actor ledgers of one variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantSettlement {
    pub variant: ResolvedVariant,
    pub brp: BrpLedger,
    pub bsp: BspLedger,
    pub retailer: RetailerLedger,
}

impl VariantSettlement {
    pub fn id(&self) -> VariantId {
        self.variant.id
    }
}

/// Settle one variant.
pub fn settle_variant(params: &ParameterSet, binding: &VariantBinding) -> VariantSettlement {
    let variant = binding.resolve(params);

    let brp = brp::settle(
        params,
        variant.basis,
        variant.consumption,
        variant.signed_adjustment,
    );
    let bsp = bsp::settle(params, variant.basis, variant.id.direction, variant.compensation);
    let retailer = retailer::settle(
        params,
        &brp,
        variant.consumption,
        variant.raw_adjustment,
        variant.compensation,
    );

    VariantSettlement {
        variant,
        brp,
        bsp,
        retailer,
    }
}

/// All ten variants in canonical order (`1a` … `5b`).
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioMatrix {
    params: ParameterSet,
    settlements: Vec<VariantSettlement>,
}

impl ScenarioMatrix {
    pub fn build(params: &ParameterSet) -> Self {
        let settlements = VARIANT_TABLE
            .iter()
            .map(|binding| settle_variant(params, binding))
            .collect();
        Self {
            params: *params,
            settlements,
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn get(&self, id: VariantId) -> &VariantSettlement {
        &self.settlements[table_index(id)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariantSettlement> {
        self.settlements.iter()
    }

    /// The `5a` settlement that the goal and reference price come from.
    pub fn reference(&self) -> &VariantSettlement {
        self.get(REFERENCE_VARIANT)
    }

    pub fn len(&self) -> usize {
        self.settlements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }
}

/// Build the matrix for a Parameter Set.
pub fn build(params: &ParameterSet) -> ScenarioMatrix {
    ScenarioMatrix::build(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flex_core::{Eur, Mwh};

    #[test]
    fn builds_every_variant_in_order() {
        let matrix = build(&ParameterSet::default());
        assert_eq!(matrix.len(), 10);
        for (settlement, id) in matrix.iter().zip(VariantId::all()) {
            assert_eq!(settlement.id(), id);
            assert_eq!(matrix.get(id).id(), id);
        }
        assert_eq!(matrix.reference().id().to_string(), "5a");
    }

    #[test]
    fn variant_1a_ledgers() {
        let matrix = build(&ParameterSet::default());
        let one_a = matrix.get("1a".parse().unwrap());
        assert_eq!(one_a.brp.imbalance_volume, Mwh(-18.0));
        assert_eq!(one_a.brp.net_result, Eur(0.0));
        assert_eq!(one_a.bsp.net_result, Eur(56.0));
        assert_eq!(one_a.retailer.net_result, Eur(86.0));
    }

    #[test]
    fn reference_bsp_pays_retailer() {
        let matrix = build(&ParameterSet::default());
        let five_a = matrix.reference();
        assert_eq!(five_a.bsp.cross_comp_result, Eur(-40.0));
        assert_eq!(five_a.retailer.cross_comp, Eur(40.0));
        assert_eq!(five_a.bsp.net_result, Eur(16.0));
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let params = ParameterSet::default();
        assert_eq!(build(&params), build(&params));
    }
}
