use flex_core::{Eur, EurPerMwh, Mwh, ParameterSet};

use crate::variant::SettlementBasis;

/// Balance responsible party ledger for one variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrpLedger {
    pub basis: SettlementBasis,
    /// Day-ahead position: negative when bought
    pub traded_volume: Mwh,
    pub da_price: EurPerMwh,
    pub trade_cost: Eur,
    pub adjustment_volume: Mwh,
    pub settled_in_balance: Mwh,
    pub measured_consumption: Mwh,
    pub imbalance_volume: Mwh,
    /// Negative = net buyer in the balancing market, positive = net seller
    pub balancing_trade: Mwh,
    pub imbalance_price: EurPerMwh,
    pub balancing_cost: Eur,
    pub invoiced_procurement_to_retailer: Eur,
    pub invoiced_imbalance_to_retailer: Eur,
    pub invoiced_total_to_retailer: Eur,
    pub net_result: Eur,
}

/// Settle the BRP position.
///
/// `adjustment_volume` is the imbalance adjustment already signed for the
/// regulation direction (bid or activation, negated when regulating up).
///
/// **Algorithm:**
/// 1. traded = sign(direction) × V_DA, costing traded × P_DA
/// 2. settled in balance = traded + adjustment
/// 3. imbalance = measured consumption + settled in balance
/// 4. balancing trade = −imbalance, costing balancing trade × P_IMB
/// 5. procurement |traded| × P_DA is always invoiced to the retailer; the
///    balancing cost is passed on (sign flipped) only when the BRP forwards it
pub fn settle(
    params: &ParameterSet,
    basis: SettlementBasis,
    measured_consumption: Mwh,
    adjustment_volume: Mwh,
) -> BrpLedger {
    let traded_volume = params.traded_volume();
    let trade_cost = traded_volume * params.p_da;

    let settled_in_balance = traded_volume + adjustment_volume;
    let imbalance_volume = measured_consumption + settled_in_balance;

    let balancing_trade = -imbalance_volume;
    let balancing_cost = balancing_trade * params.p_imb;

    let invoiced_imbalance_to_retailer = if params.toggles.brp_forwards_imbalance_cost {
        -balancing_cost
    } else {
        Eur::ZERO
    };
    let invoiced_procurement_to_retailer = traded_volume.abs() * params.p_da;

    let net_result = trade_cost
        + balancing_cost
        + invoiced_procurement_to_retailer
        + invoiced_imbalance_to_retailer;

    BrpLedger {
        basis,
        traded_volume,
        da_price: params.p_da,
        trade_cost,
        adjustment_volume,
        settled_in_balance,
        measured_consumption,
        imbalance_volume,
        balancing_trade,
        imbalance_price: params.p_imb,
        balancing_cost,
        invoiced_procurement_to_retailer,
        invoiced_imbalance_to_retailer,
        invoiced_total_to_retailer: invoiced_procurement_to_retailer
            + invoiced_imbalance_to_retailer,
        net_result,
    }
}
