//! Parameter inputs and the resolved, immutable Parameter Set.
//!
//! [`ParameterInputs`] is the flat record supplied by an input layer (a
//! parameter file, command-line flags). Every field has a default matching
//! the standard example market: 100 MWh bought day-ahead, a 10 MWh bid of
//! which 8 MWh were activated, 5 EUR/MWh day-ahead and 7 EUR/MWh imbalance.
//!
//! [`ParameterSet::resolve`] turns inputs into typed quantities and resolves
//! the optional price overrides. It never fails; range checking is a separate
//! step ([`ParameterInputs::validate`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::diagnostics::Diagnostics;
use crate::error::{FlexError, FlexResult};
use crate::units::{EurPerMwh, Mwh};

/// Share of the traded volume used as measured consumption when none is given.
pub const DEFAULT_CONSUMPTION_SHARE: f64 = 0.92;

/// Whether the day-ahead volume was bought or sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    #[default]
    Buy,
    Sell,
}

impl TradeDirection {
    /// Buying shows as a negative traded volume, selling as positive.
    pub fn sign(self) -> f64 {
        match self {
            TradeDirection::Buy => -1.0,
            TradeDirection::Sell => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TradeDirection::Buy => "buy",
            TradeDirection::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeDirection {
    type Err = FlexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(TradeDirection::Buy),
            "sell" => Ok(TradeDirection::Sell),
            other => Err(FlexError::Parse(format!(
                "unknown trade direction '{other}'; expected buy or sell"
            ))),
        }
    }
}

/// Boolean switches that change which settlement rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementToggles {
    /// BRP invoices its imbalance cost on to the retailer
    pub brp_forwards_imbalance_cost: bool,
    /// Retailer passes the imbalance invoice on to end customers
    pub re_forwards_imbalance_cost: bool,
    /// BSP pays the penalty price for |activation − bid|
    pub apply_deviation_penalty: bool,
    /// BSP buys the activated volume day-ahead when regulating down
    pub bsp_buys_on_downregulation: bool,
    /// Variant 5b compensates in the reverse direction (RE pays BSP)
    pub reverse_compensation_variant_b: bool,
    /// Neutralization may claw back money from customers who gained
    pub allow_reverse_neutralization: bool,
    /// Bill customers at the day-ahead price instead of cost recovery
    pub use_da_price_as_customer_price: bool,
}

impl Default for SettlementToggles {
    fn default() -> Self {
        Self {
            brp_forwards_imbalance_cost: true,
            re_forwards_imbalance_cost: false,
            apply_deviation_penalty: true,
            bsp_buys_on_downregulation: false,
            reverse_compensation_variant_b: false,
            allow_reverse_neutralization: false,
            use_da_price_as_customer_price: true,
        }
    }
}

/// Flat parameter record as supplied by the input layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInputs {
    /// Day-ahead traded volume (MWh)
    #[serde(default = "default_v_da")]
    pub v_da: f64,
    #[serde(default)]
    pub trade_direction: TradeDirection,
    /// Measured consumption (MWh); defaults to 92% of `v_da`, rounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_cons: Option<f64>,
    /// Bid size (MWh)
    #[serde(default = "default_e_bud")]
    pub e_bud: f64,
    /// Measured activation (MWh)
    #[serde(default = "default_e_akt")]
    pub e_akt: f64,
    /// Day-ahead price (EUR/MWh)
    #[serde(default = "default_p_da")]
    pub p_da: f64,
    /// Imbalance price (EUR/MWh)
    #[serde(default = "default_p_imb")]
    pub p_imb: f64,
    /// BSP compensation price; the imbalance price when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_comp: Option<f64>,
    /// BSP deviation-penalty price; the imbalance price when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_pen: Option<f64>,
    /// Retailer compensation price; the day-ahead price when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_recomp: Option<f64>,
    #[serde(default)]
    pub toggles: SettlementToggles,
}

fn default_v_da() -> f64 {
    100.0
}

fn default_e_bud() -> f64 {
    10.0
}

fn default_e_akt() -> f64 {
    8.0
}

fn default_p_da() -> f64 {
    5.0
}

fn default_p_imb() -> f64 {
    7.0
}

impl Default for ParameterInputs {
    fn default() -> Self {
        Self {
            v_da: default_v_da(),
            trade_direction: TradeDirection::default(),
            e_cons: None,
            e_bud: default_e_bud(),
            e_akt: default_e_akt(),
            p_da: default_p_da(),
            p_imb: default_p_imb(),
            p_comp: None,
            p_pen: None,
            p_recomp: None,
            toggles: SettlementToggles::default(),
        }
    }
}

impl ParameterInputs {
    /// Measured consumption, falling back to the default share of `v_da`.
    pub fn consumption(&self) -> f64 {
        self.e_cons
            .unwrap_or_else(|| (DEFAULT_CONSUMPTION_SHARE * self.v_da).round())
    }

    fn numeric_fields(&self) -> [(&'static str, Option<f64>); 9] {
        [
            ("v_da", Some(self.v_da)),
            ("e_cons", self.e_cons),
            ("e_bud", Some(self.e_bud)),
            ("e_akt", Some(self.e_akt)),
            ("p_da", Some(self.p_da)),
            ("p_imb", Some(self.p_imb)),
            ("p_comp", self.p_comp),
            ("p_pen", self.p_pen),
            ("p_recomp", self.p_recomp),
        ]
    }

    /// Check the inputs without rejecting them.
    ///
    /// Non-finite numbers are errors. Negative volumes are warnings: signs
    /// are derived from the trade direction and the variant, never input.
    pub fn validate(&self) -> Diagnostics {
        let mut diag = Diagnostics::new();
        for (field, value) in self.numeric_fields() {
            if let Some(v) = value {
                if !v.is_finite() {
                    diag.add_error_with_field("range", "value is not finite", field);
                }
            }
        }
        for (field, value) in [
            ("v_da", Some(self.v_da)),
            ("e_cons", self.e_cons),
            ("e_bud", Some(self.e_bud)),
            ("e_akt", Some(self.e_akt)),
        ] {
            if let Some(v) = value {
                if v < 0.0 {
                    diag.add_warning_with_field(
                        "range",
                        "volume is negative; signs are derived from trade direction and variant",
                        field,
                    );
                }
            }
        }
        if self.consumption() == 0.0 && !self.toggles.use_da_price_as_customer_price {
            diag.add_warning_with_field(
                "consistency",
                "zero consumption gives a customer price of 0 under cost recovery",
                "e_cons",
            );
        }
        diag
    }

    /// Like [`validate`](Self::validate) but fails when any error was found.
    pub fn validate_strict(&self) -> FlexResult<Diagnostics> {
        let diag = self.validate();
        if diag.has_errors() {
            let details: Vec<String> = diag.errors().map(|issue| issue.to_string()).collect();
            return Err(FlexError::Validation(format!(
                "{}: {}",
                diag.summary(),
                details.join("; ")
            )));
        }
        Ok(diag)
    }
}

/// Immutable configuration consumed by every settlement formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    pub v_da: Mwh,
    pub trade_direction: TradeDirection,
    pub e_cons: Mwh,
    pub e_bud: Mwh,
    pub e_akt: Mwh,
    pub p_da: EurPerMwh,
    pub p_imb: EurPerMwh,
    pub p_comp: EurPerMwh,
    pub p_pen: EurPerMwh,
    pub p_recomp: EurPerMwh,
    pub toggles: SettlementToggles,
}

impl ParameterSet {
    pub fn resolve(inputs: &ParameterInputs) -> Self {
        Self {
            v_da: Mwh(inputs.v_da),
            trade_direction: inputs.trade_direction,
            e_cons: Mwh(inputs.consumption()),
            e_bud: Mwh(inputs.e_bud),
            e_akt: Mwh(inputs.e_akt),
            p_da: EurPerMwh(inputs.p_da),
            p_imb: EurPerMwh(inputs.p_imb),
            p_comp: EurPerMwh(inputs.p_comp.unwrap_or(inputs.p_imb)),
            p_pen: EurPerMwh(inputs.p_pen.unwrap_or(inputs.p_imb)),
            p_recomp: EurPerMwh(inputs.p_recomp.unwrap_or(inputs.p_da)),
            toggles: inputs.toggles,
        }
    }

    /// Signed day-ahead position: negative when buying.
    pub fn traded_volume(&self) -> Mwh {
        self.v_da * self.trade_direction.sign()
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::resolve(&ParameterInputs::default())
    }
}

impl From<&ParameterInputs> for ParameterSet {
    fn from(inputs: &ParameterInputs) -> Self {
        Self::resolve(inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_example_market() {
        let params = ParameterSet::default();
        assert_eq!(params.v_da, Mwh(100.0));
        assert_eq!(params.e_cons, Mwh(92.0));
        assert_eq!(params.traded_volume(), Mwh(-100.0));
        assert_eq!(params.p_comp, EurPerMwh(7.0));
        assert_eq!(params.p_pen, EurPerMwh(7.0));
        assert_eq!(params.p_recomp, EurPerMwh(5.0));
    }

    #[test]
    fn toggle_defaults() {
        let toggles = SettlementToggles::default();
        assert!(toggles.brp_forwards_imbalance_cost);
        assert!(!toggles.re_forwards_imbalance_cost);
        assert!(toggles.apply_deviation_penalty);
        assert!(!toggles.bsp_buys_on_downregulation);
        assert!(!toggles.reverse_compensation_variant_b);
        assert!(!toggles.allow_reverse_neutralization);
        assert!(toggles.use_da_price_as_customer_price);
    }

    #[test]
    fn consumption_default_rounds() {
        let inputs = ParameterInputs {
            v_da: 37.0,
            ..ParameterInputs::default()
        };
        // 0.92 * 37 = 34.04
        assert_eq!(inputs.consumption(), 34.0);
        let explicit = ParameterInputs {
            e_cons: Some(12.5),
            ..inputs
        };
        assert_eq!(explicit.consumption(), 12.5);
    }

    #[test]
    fn overrides_replace_price_defaults() {
        let inputs = ParameterInputs {
            p_comp: Some(9.0),
            p_pen: Some(8.0),
            p_recomp: Some(4.0),
            ..ParameterInputs::default()
        };
        let params = ParameterSet::resolve(&inputs);
        assert_eq!(params.p_comp, EurPerMwh(9.0));
        assert_eq!(params.p_pen, EurPerMwh(8.0));
        assert_eq!(params.p_recomp, EurPerMwh(4.0));
        assert_eq!(params.p_imb, EurPerMwh(7.0));
    }

    #[test]
    fn sell_is_positive() {
        let inputs = ParameterInputs {
            trade_direction: TradeDirection::Sell,
            ..ParameterInputs::default()
        };
        assert_eq!(ParameterSet::resolve(&inputs).traded_volume(), Mwh(100.0));
        assert_eq!("SELL".parse::<TradeDirection>().unwrap(), TradeDirection::Sell);
        assert!("hold".parse::<TradeDirection>().is_err());
    }

    #[test]
    fn validation_flags_negative_and_non_finite() {
        let inputs = ParameterInputs {
            e_akt: -1.0,
            p_da: f64::NAN,
            ..ParameterInputs::default()
        };
        let diag = inputs.validate();
        assert_eq!(diag.warning_count(), 1);
        assert_eq!(diag.error_count(), 1);
        let err = inputs.validate_strict().unwrap_err();
        assert!(matches!(err, FlexError::Validation(_)));
        assert!(err.to_string().contains("p_da"));

        assert!(ParameterInputs::default().validate().issues.is_empty());

        // warnings alone pass and are handed back to the caller
        let warned = ParameterInputs {
            e_akt: -1.0,
            ..ParameterInputs::default()
        };
        assert_eq!(warned.validate_strict().unwrap().warning_count(), 1);
    }

    #[test]
    fn toggles_deserialize_partially() {
        let json = r#"{"v_da": 50, "toggles": {"apply_deviation_penalty": false}}"#;
        let inputs: ParameterInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.v_da, 50.0);
        assert_eq!(inputs.consumption(), 46.0);
        assert!(!inputs.toggles.apply_deviation_penalty);
        assert!(inputs.toggles.brp_forwards_imbalance_cost);
        assert!(inputs.toggles.use_da_price_as_customer_price);
    }
}
