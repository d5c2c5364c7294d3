//! Per-variant actor results and comparison with the goal.
//!
//! The goal is the BSP result of the reference variant `5a`. Combined results
//! only make sense where the BRP and the BSP are the same party; elsewhere
//! they are `NA`, and so is everything derived from them.

use flex_core::{Figure, VariantId};
use serde::Serialize;

use crate::matrix::ScenarioMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActorSummary {
    pub variant: VariantId,
    pub brp_result: Figure,
    pub bsp_result: Figure,
    pub retailer_result: Figure,
    pub brp_bsp: Figure,
    pub brp_bsp_retailer: Figure,
    pub goal: Figure,
    pub deviation: Figure,
}

/// BSP net result of the reference variant.
pub fn goal_value(matrix: &ScenarioMatrix) -> Figure {
    matrix.reference().bsp.net_result.into()
}

pub fn summarize(matrix: &ScenarioMatrix) -> Vec<ActorSummary> {
    let goal = goal_value(matrix);
    matrix
        .iter()
        .map(|settlement| {
            let same_party = settlement.variant.same_party;
            let brp_result = Figure::from(settlement.brp.net_result);
            let bsp_result = Figure::from(settlement.bsp.net_result);
            let retailer_result = Figure::from(settlement.retailer.net_result);

            let brp_bsp = Figure::when(same_party, brp_result + bsp_result);
            let brp_bsp_retailer = Figure::when(same_party, brp_result + bsp_result + retailer_result);
            let goal = Figure::when(same_party, goal);

            ActorSummary {
                variant: settlement.id(),
                brp_result,
                bsp_result,
                retailer_result,
                brp_bsp,
                brp_bsp_retailer,
                goal,
                deviation: goal - brp_bsp_retailer,
            }
        })
        .collect()
}
