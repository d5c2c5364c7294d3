use flex_core::{Eur, EurPerMwh, Mwh, ParameterSet};

use crate::brp::BrpLedger;
use crate::variant::CompensationFlow;

/// Retailer ledger for one variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetailerLedger {
    pub procurement_cost: Eur,
    pub imbalance_invoice: Eur,
    pub cross_comp_volume: Mwh,
    pub cross_comp: Eur,
    pub amount_passed_to_customer: Eur,
    pub billable_cost: Eur,
    pub billed_volume: Mwh,
    pub customer_price: EurPerMwh,
    pub customer_charge: Eur,
    pub net_result: Eur,
}

/// Settle the retailer position against the BRP's invoices.
///
/// `adjustment_volume` is the unsigned basis volume, so a BSP payment and the
/// matching retailer receipt carry opposite signs.
pub fn settle(
    params: &ParameterSet,
    brp: &BrpLedger,
    measured_consumption: Mwh,
    adjustment_volume: Mwh,
    compensation: Option<CompensationFlow>,
) -> RetailerLedger {
    let toggles = &params.toggles;

    let procurement_cost = -(brp.traded_volume.abs() * params.p_da);
    let imbalance_invoice = if toggles.brp_forwards_imbalance_cost {
        -brp.invoiced_imbalance_to_retailer
    } else {
        Eur::ZERO
    };

    let (cross_comp_volume, cross_comp) = match compensation {
        Some(flow) => (
            adjustment_volume,
            adjustment_volume * params.p_recomp * flow.retailer_sign,
        ),
        None => (Mwh::ZERO, Eur::ZERO),
    };

    let amount_passed_to_customer = if toggles.re_forwards_imbalance_cost {
        imbalance_invoice
    } else {
        Eur::ZERO
    };
    let billable_cost = -(procurement_cost + amount_passed_to_customer + cross_comp);

    let customer_price = if toggles.use_da_price_as_customer_price {
        params.p_da
    } else if measured_consumption.is_zero() {
        EurPerMwh::ZERO
    } else {
        billable_cost / measured_consumption
    };
    let customer_charge = measured_consumption * customer_price;

    RetailerLedger {
        procurement_cost,
        imbalance_invoice,
        cross_comp_volume,
        cross_comp,
        amount_passed_to_customer,
        billable_cost,
        billed_volume: measured_consumption,
        customer_price,
        customer_charge,
        net_result: procurement_cost + imbalance_invoice + cross_comp + customer_charge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brp;
    use crate::variant::SettlementBasis;

    fn brp_for(params: &ParameterSet, adjustment: Mwh) -> BrpLedger {
        brp::settle(params, SettlementBasis::Bid, params.e_cons, adjustment)
    }

    #[test]
    fn forwarded_imbalance_surplus_reaches_retailer() {
        let params = ParameterSet::default();
        let brp = brp_for(&params, Mwh(-10.0));
        let ledger = settle(&params, &brp, params.e_cons, Mwh(10.0), None);

        assert_eq!(ledger.procurement_cost, Eur(-500.0));
        assert_eq!(ledger.imbalance_invoice, Eur(126.0));
        assert_eq!(ledger.amount_passed_to_customer, Eur::ZERO);
        assert_eq!(ledger.billable_cost, Eur(500.0));
        assert_eq!(ledger.customer_price, EurPerMwh(5.0));
        assert_eq!(ledger.customer_charge, Eur(460.0));
        assert_eq!(ledger.net_result, Eur(86.0));
    }

    #[test]
    fn no_invoice_without_brp_forwarding() {
        let mut params = ParameterSet::default();
        params.toggles.brp_forwards_imbalance_cost = false;
        let brp = brp_for(&params, Mwh(-10.0));
        let ledger = settle(&params, &brp, params.e_cons, Mwh(10.0), None);
        assert_eq!(ledger.imbalance_invoice, Eur::ZERO);
        assert_eq!(ledger.net_result, Eur(-40.0));
    }

    #[test]
    fn cost_recovery_price_with_compensation() {
        let mut params = ParameterSet::default();
        params.toggles.use_da_price_as_customer_price = false;
        let brp = brp::settle(&params, SettlementBasis::Activation, params.e_cons, Mwh(-8.0));
        let ledger = settle(
            &params,
            &brp,
            params.e_cons,
            Mwh(8.0),
            Some(CompensationFlow::BSP_TO_RETAILER),
        );
        assert_eq!(ledger.cross_comp_volume, Mwh(8.0));
        assert_eq!(ledger.cross_comp, Eur(40.0));
        assert_eq!(ledger.billable_cost, Eur(460.0));
        assert_eq!(ledger.customer_price, EurPerMwh(5.0));
    }

    #[test]
    fn zero_consumption_gives_zero_price() {
        let mut params = ParameterSet::default();
        params.toggles.use_da_price_as_customer_price = false;
        let brp = brp_for(&params, Mwh(-10.0));
        let ledger = settle(&params, &brp, Mwh::ZERO, Mwh(10.0), None);
        assert_eq!(ledger.customer_price, EurPerMwh::ZERO);
        assert_eq!(ledger.customer_charge.value(), 0.0);
    }

    #[test]
    fn forwarding_to_customer_reduces_billable_cost() {
        let mut params = ParameterSet::default();
        params.toggles.re_forwards_imbalance_cost = true;
        params.toggles.use_da_price_as_customer_price = false;
        let brp = brp_for(&params, Mwh(-10.0));
        let ledger = settle(&params, &brp, params.e_cons, Mwh(10.0), None);
        assert_eq!(ledger.amount_passed_to_customer, Eur(126.0));
        assert_eq!(ledger.billable_cost, Eur(374.0));
    }
}
