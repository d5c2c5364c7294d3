//! Fixed parameter bindings of the ten scenario variants.
//!
//! The table below is configuration data. In particular the consumption
//! baseline coefficients of scenario 2 (`−E_cons − 2·S`) are business
//! constants for the mirrored over-delivery case, not a derived rule.

use flex_core::{Mwh, ParameterSet, Regulation, Scenario, SettlementToggles, VariantId};

/// Which volume governs imbalance settlement and BSP payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementBasis {
    /// The bid size `E_bud`
    Bid,
    /// The measured activation `E_akt`
    Activation,
}

impl SettlementBasis {
    pub fn label(self) -> &'static str {
        match self {
            SettlementBasis::Bid => "bid",
            SettlementBasis::Activation => "measured activation",
        }
    }

    /// Unsigned volume this basis settles on.
    pub fn raw_volume(self, params: &ParameterSet) -> Mwh {
        match self {
            SettlementBasis::Bid => params.e_bud,
            SettlementBasis::Activation => params.e_akt,
        }
    }
}

/// Signs of a cross-party compensation payment, seen from each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompensationFlow {
    /// +1 when the BSP receives, −1 when it pays
    pub bsp_sign: f64,
    /// +1 when the retailer receives, −1 when it pays
    pub retailer_sign: f64,
}

impl CompensationFlow {
    pub const BSP_TO_RETAILER: Self = Self {
        bsp_sign: -1.0,
        retailer_sign: 1.0,
    };

    pub const RETAILER_TO_BSP: Self = Self {
        bsp_sign: 1.0,
        retailer_sign: -1.0,
    };
}

/// When cross-party compensation applies for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompensationRule {
    None,
    /// Always on: the BSP pays the retailer for the activated volume
    BspPaysRetailer,
    /// On only with `reverse_compensation_variant_b`: the retailer pays the BSP
    RetailerPaysBspWhenReversed,
}

impl CompensationRule {
    pub fn label(self) -> &'static str {
        match self {
            CompensationRule::None => "none",
            CompensationRule::BspPaysRetailer => "BSP pays retailer",
            CompensationRule::RetailerPaysBspWhenReversed => "retailer pays BSP if reversed",
        }
    }

    pub fn resolve(self, toggles: &SettlementToggles) -> Option<CompensationFlow> {
        match self {
            CompensationRule::None => None,
            CompensationRule::BspPaysRetailer => Some(CompensationFlow::BSP_TO_RETAILER),
            CompensationRule::RetailerPaysBspWhenReversed => toggles
                .reverse_compensation_variant_b
                .then_some(CompensationFlow::RETAILER_TO_BSP),
        }
    }
}

/// Measured consumption as `consumption_factor·E_cons + settlement_factor·S`,
/// where `S` is the volume settled in balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumptionBaseline {
    pub consumption_factor: f64,
    pub settlement_factor: f64,
}

impl ConsumptionBaseline {
    pub const MEASURED: Self = Self {
        consumption_factor: 1.0,
        settlement_factor: 0.0,
    };

    pub const MIRRORED: Self = Self {
        consumption_factor: -1.0,
        settlement_factor: -2.0,
    };

    pub fn is_mirrored(self) -> bool {
        self.settlement_factor != 0.0
    }

    pub fn apply(self, e_cons: Mwh, settled_in_balance: Mwh) -> Mwh {
        e_cons * self.consumption_factor + settled_in_balance * self.settlement_factor
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantBinding {
    pub id: VariantId,
    pub basis: SettlementBasis,
    /// BRP and BSP are the same party
    pub same_party: bool,
    pub compensation: CompensationRule,
    pub baseline: ConsumptionBaseline,
    pub description: &'static str,
}

const fn binding(
    scenario: Scenario,
    direction: Regulation,
    basis: SettlementBasis,
    same_party: bool,
    compensation: CompensationRule,
    baseline: ConsumptionBaseline,
    description: &'static str,
) -> VariantBinding {
    VariantBinding {
        id: VariantId::new(scenario, direction),
        basis,
        same_party,
        compensation,
        baseline,
        description,
    }
}

use CompensationRule as Comp;
use ConsumptionBaseline as Base;
use Regulation::{Down, Up};
use SettlementBasis::{Activation, Bid};

pub const VARIANT_TABLE: [VariantBinding; 10] = [
    binding(Scenario::One, Up, Bid, true, Comp::None, Base::MEASURED, "BRP=BSP, bid, under-delivery"),
    binding(Scenario::One, Down, Bid, true, Comp::None, Base::MEASURED, "BRP=BSP, bid, under-delivery"),
    binding(Scenario::Two, Up, Bid, true, Comp::None, Base::MIRRORED, "BRP=BSP, bid, over-delivery"),
    binding(Scenario::Two, Down, Bid, true, Comp::None, Base::MIRRORED, "BRP=BSP, bid, over-delivery"),
    binding(Scenario::Three, Up, Activation, true, Comp::None, Base::MEASURED, "BRP=BSP, measured activation"),
    binding(Scenario::Three, Down, Activation, true, Comp::None, Base::MEASURED, "BRP=BSP, measured activation"),
    binding(Scenario::Four, Up, Activation, false, Comp::None, Base::MEASURED, "BRP≠BSP, measured activation, no compensation"),
    binding(Scenario::Four, Down, Activation, false, Comp::None, Base::MEASURED, "BRP≠BSP, measured activation, no compensation"),
    binding(Scenario::Five, Up, Activation, false, Comp::BspPaysRetailer, Base::MEASURED, "BRP≠BSP, measured activation, BSP compensates retailer"),
    binding(Scenario::Five, Down, Activation, false, Comp::RetailerPaysBspWhenReversed, Base::MEASURED, "BRP≠BSP, measured activation, retailer compensates BSP if reversed"),
];

/// Variant whose BSP result is the goal and whose customer price is the
/// neutralization reference.
pub const REFERENCE_VARIANT: VariantId = VariantId::new(Scenario::Five, Regulation::Up);

pub(crate) fn table_index(id: VariantId) -> usize {
    let direction = match id.direction {
        Regulation::Up => 0,
        Regulation::Down => 1,
    };
    usize::from(id.scenario.number() - 1) * 2 + direction
}

pub fn binding_for(id: VariantId) -> &'static VariantBinding {
    &VARIANT_TABLE[table_index(id)]
}

/// A variant's bindings evaluated against one Parameter Set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVariant {
    pub id: VariantId,
    pub basis: SettlementBasis,
    pub same_party: bool,
    pub compensation: Option<CompensationFlow>,
    /// Unsigned volume of the basis
    pub raw_adjustment: Mwh,
    /// Basis volume, negated for up-regulation
    pub signed_adjustment: Mwh,
    pub consumption: Mwh,
}

impl ResolvedVariant {
    pub fn compensation_enabled(&self) -> bool {
        self.compensation.is_some()
    }
}

impl VariantBinding {
    pub fn resolve(&self, params: &ParameterSet) -> ResolvedVariant {
        let raw_adjustment = self.basis.raw_volume(params);
        let signed_adjustment = match self.id.direction {
            Regulation::Up => -raw_adjustment,
            Regulation::Down => raw_adjustment,
        };
        let settled = params.traded_volume() + signed_adjustment;
        ResolvedVariant {
            id: self.id,
            basis: self.basis,
            same_party: self.same_party,
            compensation: self.compensation.resolve(&params.toggles),
            raw_adjustment,
            signed_adjustment,
            consumption: self.baseline.apply(params.e_cons, settled),
        }
    }
}
