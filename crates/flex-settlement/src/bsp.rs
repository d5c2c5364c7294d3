use flex_core::{Eur, EurPerMwh, Mwh, ParameterSet, Regulation};

use crate::variant::{CompensationFlow, SettlementBasis};

/// Balancing service provider ledger for one variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BspLedger {
    pub basis: SettlementBasis,
    /// Paid volume as displayed: negated for up-regulation
    pub pay_volume: Mwh,
    pub compensation_price: EurPerMwh,
    pub compensation_for_activation: Eur,
    pub deviation_volume: Mwh,
    pub deviation_price: EurPerMwh,
    pub deviation_result: Eur,
    pub cross_comp_volume: Mwh,
    pub cross_comp_price: EurPerMwh,
    pub cross_comp_result: Eur,
    pub da_buy_volume: Mwh,
    pub da_buy_cost: Eur,
    pub net_result: Eur,
}

/// Settle the BSP position.
///
/// The BSP is paid `P_COMP` for the basis volume. On bid basis it is charged
/// the penalty price for the gap between bid and activation. With a
/// compensation flow it pays or receives `E_akt × P_RECOMP`, and when
/// regulating down it may have to buy the activated volume day-ahead.
pub fn settle(
    params: &ParameterSet,
    basis: SettlementBasis,
    direction: Regulation,
    compensation: Option<CompensationFlow>,
) -> BspLedger {
    let raw_pay_volume = basis.raw_volume(params);
    let pay_volume = match direction {
        Regulation::Up => -raw_pay_volume,
        Regulation::Down => raw_pay_volume,
    };
    let compensation_for_activation = raw_pay_volume.abs() * params.p_comp;

    // only the bid can be missed; activation-based payment has nothing to deviate from
    let (deviation_volume, deviation_price) = match basis {
        SettlementBasis::Bid => {
            let price = if params.toggles.apply_deviation_penalty {
                params.p_pen
            } else {
                EurPerMwh::ZERO
            };
            ((params.e_akt - params.e_bud).abs(), price)
        }
        SettlementBasis::Activation => (Mwh::ZERO, EurPerMwh::ZERO),
    };
    let deviation_result = -(deviation_volume * deviation_price);

    let (cross_comp_volume, cross_comp_price, cross_comp_result) = match compensation {
        Some(flow) => (
            params.e_akt,
            params.p_recomp,
            params.e_akt * params.p_recomp * flow.bsp_sign,
        ),
        None => (Mwh::ZERO, EurPerMwh::ZERO, Eur::ZERO),
    };

    let (da_buy_volume, da_buy_cost) =
        if direction == Regulation::Down && params.toggles.bsp_buys_on_downregulation {
            (params.e_akt, -(params.e_akt * params.p_da))
        } else {
            (Mwh::ZERO, Eur::ZERO)
        };

    let net_result = compensation_for_activation + deviation_result + cross_comp_result + da_buy_cost;

    BspLedger {
        basis,
        pay_volume,
        compensation_price: params.p_comp,
        compensation_for_activation,
        deviation_volume,
        deviation_price,
        deviation_result,
        cross_comp_volume,
        cross_comp_price,
        cross_comp_result,
        da_buy_volume,
        da_buy_cost,
        net_result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flex_core::ParameterInputs;

    #[test]
    fn bid_basis_with_penalty() {
        let params = ParameterSet::default();
        let ledger = settle(&params, SettlementBasis::Bid, Regulation::Up, None);
        assert_eq!(ledger.pay_volume, Mwh(-10.0));
        assert_eq!(ledger.compensation_for_activation, Eur(70.0));
        assert_eq!(ledger.deviation_volume, Mwh(2.0));
        assert_eq!(ledger.deviation_price, EurPerMwh(7.0));
        assert_eq!(ledger.deviation_result, Eur(-14.0));
        assert_eq!(ledger.net_result, Eur(56.0));
    }

    #[test]
    fn penalty_toggle_zeroes_deviation() {
        for (e_bud, e_akt) in [(10.0, 8.0), (10.0, 30.0), (0.0, 5.0)] {
            let mut inputs = ParameterInputs {
                e_bud,
                e_akt,
                ..ParameterInputs::default()
            };
            inputs.toggles.apply_deviation_penalty = false;
            let params = ParameterSet::resolve(&inputs);
            for direction in [Regulation::Up, Regulation::Down] {
                let ledger = settle(&params, SettlementBasis::Bid, direction, None);
                assert_eq!(ledger.deviation_result.value(), 0.0);
                assert_eq!(ledger.deviation_volume, Mwh((e_akt - e_bud).abs()));
            }
        }
    }

    #[test]
    fn activation_basis_never_deviates() {
        let inputs = ParameterInputs {
            e_bud: 50.0,
            ..ParameterInputs::default()
        };
        let params = ParameterSet::resolve(&inputs);
        let ledger = settle(&params, SettlementBasis::Activation, Regulation::Up, None);
        assert_eq!(ledger.deviation_volume, Mwh::ZERO);
        assert_eq!(ledger.deviation_result, Eur::ZERO);
        assert_eq!(ledger.compensation_for_activation, Eur(56.0));
    }

    #[test]
    fn cross_party_compensation_signs() {
        let params = ParameterSet::default();
        let pays = settle(
            &params,
            SettlementBasis::Activation,
            Regulation::Up,
            Some(CompensationFlow::BSP_TO_RETAILER),
        );
        assert_eq!(pays.cross_comp_volume, Mwh(8.0));
        assert_eq!(pays.cross_comp_price, EurPerMwh(5.0));
        assert_eq!(pays.cross_comp_result, Eur(-40.0));
        assert_eq!(pays.net_result, Eur(16.0));

        let receives = settle(
            &params,
            SettlementBasis::Activation,
            Regulation::Down,
            Some(CompensationFlow::RETAILER_TO_BSP),
        );
        assert_eq!(receives.cross_comp_result, Eur(40.0));
        assert_eq!(receives.net_result, Eur(96.0));
    }

    #[test]
    fn day_ahead_buy_in_only_when_regulating_down() {
        let mut params = ParameterSet::default();
        params.toggles.bsp_buys_on_downregulation = true;

        let up = settle(&params, SettlementBasis::Activation, Regulation::Up, None);
        assert_eq!(up.da_buy_cost, Eur::ZERO);

        let down = settle(&params, SettlementBasis::Activation, Regulation::Down, None);
        assert_eq!(down.da_buy_volume, Mwh(8.0));
        assert_eq!(down.da_buy_cost, Eur(-40.0));
        assert_eq!(down.net_result, Eur(16.0));
    }
}
