//! Customer price comparison against the reference variant and the
//! compensation needed to neutralize any extra customer cost.

use flex_core::{Eur, EurPerMwh, Figure, Mwh, VariantId};
use serde::Serialize;

use crate::matrix::ScenarioMatrix;
use crate::summary::ActorSummary;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CustomerPriceComparison {
    pub variant: VariantId,
    pub customer_price: EurPerMwh,
    pub reference_price: EurPerMwh,
    pub price_deviation: EurPerMwh,
    pub billed_volume: Mwh,
    pub extra_cost: Eur,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neutralization {
    pub variant: VariantId,
    pub extra_cost: Eur,
    pub compensation_need: Eur,
    pub result_before: Figure,
    pub result_after: Figure,
}

pub fn compare_prices(matrix: &ScenarioMatrix) -> Vec<CustomerPriceComparison> {
    let reference_price = matrix.reference().retailer.customer_price;
    matrix
        .iter()
        .map(|settlement| {
            let retailer = &settlement.retailer;
            let price_deviation = retailer.customer_price - reference_price;
            CustomerPriceComparison {
                variant: settlement.id(),
                customer_price: retailer.customer_price,
                reference_price,
                price_deviation,
                billed_volume: retailer.billed_volume,
                extra_cost: price_deviation * retailer.billed_volume,
            }
        })
        .collect()
}

/// Compensation owed to customers and the variant result after paying it.
///
/// Without `allow_reverse_neutralization` the need is clamped at zero, so
/// customers who gained keep the gain.
pub fn neutralize(matrix: &ScenarioMatrix, summaries: &[ActorSummary]) -> Vec<Neutralization> {
    let allow_reverse = matrix.params().toggles.allow_reverse_neutralization;
    compare_prices(matrix)
        .into_iter()
        .map(|comparison| {
            let compensation_need = if allow_reverse {
                comparison.extra_cost
            } else {
                comparison.extra_cost.max(Eur::ZERO)
            };
            let bsp_result = Figure::from(matrix.get(comparison.variant).bsp.net_result);
            let result_before = summaries
                .iter()
                .find(|summary| summary.variant == comparison.variant)
                .map_or(bsp_result, |summary| summary.brp_bsp_retailer.or(bsp_result));
            Neutralization {
                variant: comparison.variant,
                extra_cost: comparison.extra_cost,
                compensation_need,
                result_before,
                result_after: result_before - Figure::from(compensation_need),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{matrix, summary};
    use flex_core::ParameterSet;

    fn cost_recovery(allow_reverse: bool) -> ScenarioMatrix {
        let mut params = ParameterSet::default();
        params.toggles.use_da_price_as_customer_price = false;
        params.toggles.allow_reverse_neutralization = allow_reverse;
        matrix::build(&params)
    }

    #[test]
    fn day_ahead_pricing_has_no_extra_cost() {
        let matrix = matrix::build(&ParameterSet::default());
        for comparison in compare_prices(&matrix) {
            assert_eq!(comparison.reference_price, EurPerMwh(5.0));
            assert_eq!(comparison.price_deviation, EurPerMwh::ZERO);
            assert_eq!(comparison.extra_cost.value(), 0.0);
        }
    }

    #[test]
    fn cost_recovery_reference_price() {
        let matrix = cost_recovery(false);
        let comparisons = compare_prices(&matrix);
        // 460 EUR billable over 92 MWh
        assert_eq!(comparisons[8].reference_price, EurPerMwh(5.0));
        let three_a = &comparisons[4];
        assert_eq!(three_a.variant.to_string(), "3a");
        assert!((three_a.extra_cost.value() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn negative_extra_cost_is_clamped() {
        let matrix = cost_recovery(false);
        let summaries = summary::summarize(&matrix);
        let two_a = neutralize(&matrix, &summaries)[2];
        assert_eq!(two_a.extra_cost, Eur(-140.0));
        assert_eq!(two_a.compensation_need, Eur::ZERO);
        assert_eq!(two_a.result_after, two_a.result_before);
    }

    #[test]
    fn reverse_neutralization_keeps_sign() {
        let matrix = cost_recovery(true);
        let summaries = summary::summarize(&matrix);
        let two_a = neutralize(&matrix, &summaries)[2];
        assert_eq!(two_a.compensation_need, Eur(-140.0));
        let before = two_a.result_before.value().unwrap();
        assert_eq!(two_a.result_after, Figure::Value(before + 140.0));
    }

    #[test]
    fn result_before_falls_back_to_bsp() {
        let matrix = matrix::build(&ParameterSet::default());
        let summaries = summary::summarize(&matrix);
        let rows = neutralize(&matrix, &summaries);
        assert_eq!(rows[0].result_before, Figure::Value(142.0));
        // 5a: different parties, BSP result only
        assert_eq!(rows[8].result_before, Figure::Value(16.0));
        assert_eq!(rows[8].result_after, Figure::Value(16.0));
    }
}
