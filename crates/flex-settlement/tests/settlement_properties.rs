use flex_core::{Eur, Figure, Mwh, ParameterInputs, ParameterSet, TradeDirection, VariantId};
use flex_settlement::{
    matrix, neutralization, summary, SettlementBasis, SettlementTables, VARIANT_TABLE,
};

const EPS: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS * (1.0 + a.abs().max(b.abs()))
}

fn variant(id: &str) -> VariantId {
    id.parse().unwrap()
}

/// A spread of inputs that exercises both signs of every imbalance.
fn parameter_grid() -> Vec<ParameterInputs> {
    let mut grid = Vec::new();
    for (e_bud, e_akt) in [(10.0, 8.0), (10.0, 12.0), (0.0, 4.0), (25.0, 25.0)] {
        for trade_direction in [TradeDirection::Buy, TradeDirection::Sell] {
            for p_imb in [7.0, 2.5, -3.0] {
                grid.push(ParameterInputs {
                    v_da: 80.0,
                    trade_direction,
                    e_cons: Some(71.0),
                    e_bud,
                    e_akt,
                    p_da: 5.0,
                    p_imb,
                    ..ParameterInputs::default()
                });
            }
        }
    }
    grid
}

#[test]
fn fixed_inputs_trade_leg() {
    let inputs = ParameterInputs {
        v_da: 100.0,
        trade_direction: TradeDirection::Buy,
        e_cons: Some(92.0),
        e_bud: 10.0,
        e_akt: 8.0,
        p_da: 5.0,
        p_imb: 7.0,
        ..ParameterInputs::default()
    };
    let params = ParameterSet::resolve(&inputs);
    let matrix = matrix::build(&params);
    for settlement in matrix.iter() {
        assert_eq!(settlement.brp.traded_volume, Mwh(-100.0));
        assert_eq!(settlement.brp.trade_cost, Eur(-500.0));
    }
}

#[test]
fn no_deviation_result_without_penalty() {
    for mut inputs in parameter_grid() {
        inputs.toggles.apply_deviation_penalty = false;
        let matrix = matrix::build(&ParameterSet::resolve(&inputs));
        for settlement in matrix.iter() {
            if settlement.variant.basis == SettlementBasis::Bid {
                assert_eq!(settlement.bsp.deviation_result.value(), 0.0);
            }
        }
    }
}

#[test]
fn brp_bsp_only_for_same_party() {
    for inputs in parameter_grid() {
        let matrix = matrix::build(&ParameterSet::resolve(&inputs));
        for summary in summary::summarize(&matrix) {
            let settlement = matrix.get(summary.variant);
            let separate = ["4a", "4b", "5a", "5b"].contains(&summary.variant.to_string().as_str());
            if separate {
                assert_eq!(summary.brp_bsp, Figure::NotApplicable);
            } else {
                let expected = settlement.brp.net_result + settlement.bsp.net_result;
                assert_eq!(summary.brp_bsp, Figure::from(expected));
            }
        }
    }
}

#[test]
fn no_imbalance_invoice_without_forwarding() {
    for mut inputs in parameter_grid() {
        inputs.toggles.brp_forwards_imbalance_cost = false;
        inputs.toggles.re_forwards_imbalance_cost = true;
        let matrix = matrix::build(&ParameterSet::resolve(&inputs));
        for settlement in matrix.iter() {
            assert_eq!(settlement.brp.invoiced_imbalance_to_retailer, Eur::ZERO);
            assert_eq!(settlement.retailer.imbalance_invoice, Eur::ZERO);
        }
    }
}

#[test]
fn reverse_neutralization_allows_negative_need() {
    let mut inputs = ParameterInputs::default();
    inputs.toggles.use_da_price_as_customer_price = false;

    let clamped = {
        let matrix = matrix::build(&ParameterSet::resolve(&inputs));
        neutralization::neutralize(&matrix, &summary::summarize(&matrix))
    };
    inputs.toggles.allow_reverse_neutralization = true;
    let reversed = {
        let matrix = matrix::build(&ParameterSet::resolve(&inputs));
        neutralization::neutralize(&matrix, &summary::summarize(&matrix))
    };

    let mut saw_negative = false;
    for (clamped, reversed) in clamped.iter().zip(&reversed) {
        assert_eq!(clamped.extra_cost, reversed.extra_cost);
        assert!(clamped.compensation_need.value() >= 0.0);
        assert_eq!(reversed.compensation_need, reversed.extra_cost);
        if reversed.extra_cost.value() < 0.0 {
            saw_negative = true;
            assert!(reversed.compensation_need.value() < 0.0);
        }
    }
    assert!(saw_negative, "grid should contain a variant with a price gain");
}

#[test]
fn scenario_five_compensation_switch() {
    for reverse in [false, true] {
        let mut params = ParameterSet::default();
        params.toggles.reverse_compensation_variant_b = reverse;
        let matrix = matrix::build(&params);
        assert!(matrix.get(variant("5a")).variant.compensation_enabled());
        assert_eq!(
            matrix.get(variant("5b")).variant.compensation_enabled(),
            reverse
        );
        for binding in VARIANT_TABLE.iter().filter(|b| b.id.scenario.number() < 5) {
            assert!(!matrix.get(binding.id).variant.compensation_enabled());
        }
    }
}

#[test]
fn full_build_is_idempotent() {
    for inputs in parameter_grid() {
        let params = ParameterSet::resolve(&inputs);
        assert_eq!(
            SettlementTables::from_parameters(&params),
            SettlementTables::from_parameters(&params)
        );
    }
}

#[test]
fn deviation_from_goal_closes() {
    for inputs in parameter_grid() {
        let matrix = matrix::build(&ParameterSet::resolve(&inputs));
        let goal = summary::goal_value(&matrix).value().unwrap();
        for summary in summary::summarize(&matrix) {
            if let (Some(total), Some(deviation)) =
                (summary.brp_bsp_retailer.value(), summary.deviation.value())
            {
                assert!(approx_eq(total + deviation, goal));
            }
        }
    }
}

#[test]
fn cost_recovery_reference_price_is_day_ahead_for_defaults() {
    let mut params = ParameterSet::default();
    params.toggles.use_da_price_as_customer_price = false;
    let tables = SettlementTables::from_parameters(&params);
    let reference = tables
        .customer_price
        .get(variant("1a"), "Reference price (5a)")
        .and_then(Figure::value)
        .unwrap();
    assert!(approx_eq(reference, 5.0));
}
