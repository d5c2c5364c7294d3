//! Named-field tables: one row per field, one column per variant.
//!
//! Field names and units are the public contract of every export format;
//! renaming a row breaks downstream readers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use flex_core::{FlexError, FlexResult, Figure, ParameterSet, Unit, VariantId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::brp::BrpLedger;
use crate::bsp::BspLedger;
use crate::matrix::ScenarioMatrix;
use crate::neutralization::{self, CustomerPriceComparison, Neutralization};
use crate::retailer::RetailerLedger;
use crate::summary::{self, ActorSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Brp,
    Bsp,
    Retailer,
    Summary,
    CustomerPrice,
    Neutralization,
}

impl TableKind {
    pub const ALL: [TableKind; 6] = [
        TableKind::Brp,
        TableKind::Bsp,
        TableKind::Retailer,
        TableKind::Summary,
        TableKind::CustomerPrice,
        TableKind::Neutralization,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Brp => "brp",
            TableKind::Bsp => "bsp",
            TableKind::Retailer => "retailer",
            TableKind::Summary => "summary",
            TableKind::CustomerPrice => "customer_price",
            TableKind::Neutralization => "neutralization",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TableKind::Brp => "BRP settlement",
            TableKind::Bsp => "BSP settlement",
            TableKind::Retailer => "Retailer settlement",
            TableKind::Summary => "Actor results and goal comparison",
            TableKind::CustomerPrice => "Customer price comparison",
            TableKind::Neutralization => "Customer neutralization",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableKind {
    type Err = FlexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        TableKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| {
                FlexError::Parse(format!(
                    "unknown table '{s}'; expected one of brp, bsp, retailer, summary, customer_price, neutralization"
                ))
            })
    }
}

/// A row label and the unit of every value in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub unit: Unit,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, unit: Unit) -> Self {
        Self {
            name: name.into(),
            unit,
        }
    }
}

/// Every column holds exactly one figure per field; columns only enter
/// through [`Table::insert_column`] or the row renderers below.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub kind: TableKind,
    fields: Vec<FieldSpec>,
    /// Keyed by variant in canonical order
    columns: BTreeMap<VariantId, Vec<Figure>>,
}

impl Table {
    pub fn new(kind: TableKind, fields: Vec<FieldSpec>) -> Self {
        Self {
            kind,
            fields,
            columns: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Add or replace a variant column; it must have one figure per field.
    pub fn insert_column(&mut self, variant: VariantId, figures: Vec<Figure>) -> FlexResult<()> {
        if figures.len() != self.fields.len() {
            return Err(FlexError::Validation(format!(
                "table '{}' column {variant}: expected {} figures, got {}",
                self.key(),
                self.fields.len(),
                figures.len()
            )));
        }
        self.columns.insert(variant, figures);
        Ok(())
    }

    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|spec| spec.name == field)
    }

    pub fn get(&self, variant: VariantId, field: &str) -> Option<Figure> {
        let idx = self.field_index(field)?;
        self.columns.get(&variant).and_then(|column| column.get(idx).copied())
    }

    pub fn column(&self, variant: VariantId) -> Option<&[Figure]> {
        self.columns.get(&variant).map(Vec::as_slice)
    }

    /// The figures of one field across all variants.
    pub fn row(&self, field: &str) -> Option<Vec<(VariantId, Figure)>> {
        self.field_index(field).map(|idx| self.row_at(idx))
    }

    /// The figures of the field at `idx`, `NA` where a column has none.
    pub fn row_at(&self, idx: usize) -> Vec<(VariantId, Figure)> {
        self.columns
            .iter()
            .map(|(variant, column)| {
                let figure = column.get(idx).copied().unwrap_or(Figure::NotApplicable);
                (*variant, figure)
            })
            .collect()
    }

    pub fn variants(&self) -> impl Iterator<Item = VariantId> + '_ {
        self.columns.keys().copied()
    }

    /// `{key, title, fields, columns: {variant: {field: value}}}`.
    pub fn to_json(&self) -> Value {
        let mut columns = Map::new();
        for (variant, figures) in &self.columns {
            let cells: Map<String, Value> = self
                .fields
                .iter()
                .zip(figures)
                .map(|(spec, figure)| (spec.name.clone(), figure_json(*figure)))
                .collect();
            columns.insert(variant.to_string(), Value::Object(cells));
        }
        json!({
            "key": self.key(),
            "title": self.title(),
            "fields": self.fields,
            "columns": columns,
        })
    }
}

fn figure_json(figure: Figure) -> Value {
    match figure.value() {
        Some(v) => json!(v),
        None => json!(flex_core::NOT_APPLICABLE),
    }
}

type Row<T> = (&'static str, Unit, fn(&T) -> Figure);

const BRP_ROWS: [Row<BrpLedger>; 14] = [
    ("Traded volume", Unit::Mwh, |l| Figure::from(l.traded_volume)),
    ("Day-ahead price", Unit::EurPerMwh, |l| Figure::from(l.da_price)),
    ("Trade cost", Unit::Eur, |l| Figure::from(l.trade_cost)),
    ("Imbalance adjustment", Unit::Mwh, |l| Figure::from(l.adjustment_volume)),
    ("Settled in balance", Unit::Mwh, |l| Figure::from(l.settled_in_balance)),
    ("Measured consumption", Unit::Mwh, |l| Figure::from(l.measured_consumption)),
    ("Imbalance volume", Unit::Mwh, |l| Figure::from(l.imbalance_volume)),
    ("Balancing trade (buy - / sell +)", Unit::Mwh, |l| Figure::from(l.balancing_trade)),
    ("Imbalance price", Unit::EurPerMwh, |l| Figure::from(l.imbalance_price)),
    ("BRP balancing cost", Unit::Eur, |l| Figure::from(l.balancing_cost)),
    ("Procurement invoiced to retailer", Unit::Eur, |l| {
        Figure::from(l.invoiced_procurement_to_retailer)
    }),
    ("Imbalance cost invoiced to retailer", Unit::Eur, |l| {
        Figure::from(l.invoiced_imbalance_to_retailer)
    }),
    ("BRP invoices retailer", Unit::Eur, |l| Figure::from(l.invoiced_total_to_retailer)),
    ("BRP net result", Unit::Eur, |l| Figure::from(l.net_result)),
];

const BSP_ROWS: [Row<BspLedger>; 12] = [
    ("Bid/activated volume", Unit::Mwh, |l| Figure::from(l.pay_volume)),
    ("Compensation price", Unit::EurPerMwh, |l| Figure::from(l.compensation_price)),
    ("Compensation for activation", Unit::Eur, |l| Figure::from(l.compensation_for_activation)),
    ("Deviation volume", Unit::Mwh, |l| Figure::from(l.deviation_volume)),
    ("Deviation price", Unit::EurPerMwh, |l| Figure::from(l.deviation_price)),
    ("Deviation result", Unit::Eur, |l| Figure::from(l.deviation_result)),
    ("Cross-party compensation volume", Unit::Mwh, |l| Figure::from(l.cross_comp_volume)),
    ("Cross-party compensation price", Unit::EurPerMwh, |l| Figure::from(l.cross_comp_price)),
    ("Cross-party compensation result", Unit::Eur, |l| Figure::from(l.cross_comp_result)),
    ("Day-ahead buy-in volume", Unit::Mwh, |l| Figure::from(l.da_buy_volume)),
    ("Day-ahead buy-in cost", Unit::Eur, |l| Figure::from(l.da_buy_cost)),
    ("BSP net result", Unit::Eur, |l| Figure::from(l.net_result)),
];

const RETAILER_ROWS: [Row<RetailerLedger>; 10] = [
    ("Procurement invoiced by BRP", Unit::Eur, |l| Figure::from(l.procurement_cost)),
    ("Imbalance cost invoiced by BRP", Unit::Eur, |l| Figure::from(l.imbalance_invoice)),
    ("Flexibility compensation volume", Unit::Mwh, |l| Figure::from(l.cross_comp_volume)),
    ("Flexibility compensation amount", Unit::Eur, |l| Figure::from(l.cross_comp)),
    ("Imbalance cost passed to customer", Unit::Eur, |l| Figure::from(l.amount_passed_to_customer)),
    ("Billable cost", Unit::Eur, |l| Figure::from(l.billable_cost)),
    ("Volume billed to customer", Unit::Mwh, |l| Figure::from(l.billed_volume)),
    ("Customer price", Unit::EurPerMwh, |l| Figure::from(l.customer_price)),
    ("Cost billed to customer", Unit::Eur, |l| Figure::from(l.customer_charge)),
    ("Retailer net result", Unit::Eur, |l| Figure::from(l.net_result)),
];

const SUMMARY_ROWS: [Row<ActorSummary>; 7] = [
    ("BRP result", Unit::Eur, |s| s.brp_result),
    ("BSP result", Unit::Eur, |s| s.bsp_result),
    ("Retailer result", Unit::Eur, |s| s.retailer_result),
    ("BRP+BSP result", Unit::Eur, |s| s.brp_bsp),
    ("BRP+BSP+Retailer result", Unit::Eur, |s| s.brp_bsp_retailer),
    ("Goal result (scenario 5a BSP result)", Unit::Eur, |s| s.goal),
    ("Deviation from goal", Unit::Eur, |s| s.deviation),
];

const CUSTOMER_PRICE_ROWS: [Row<CustomerPriceComparison>; 5] = [
    ("Customer price", Unit::EurPerMwh, |c| Figure::from(c.customer_price)),
    ("Reference price (5a)", Unit::EurPerMwh, |c| Figure::from(c.reference_price)),
    ("Price deviation", Unit::EurPerMwh, |c| Figure::from(c.price_deviation)),
    ("Volume billed to customer", Unit::Mwh, |c| Figure::from(c.billed_volume)),
    ("Extra customer cost", Unit::Eur, |c| Figure::from(c.extra_cost)),
];

const NEUTRALIZATION_ROWS: [Row<Neutralization>; 4] = [
    ("Extra customer cost", Unit::Eur, |n| Figure::from(n.extra_cost)),
    ("Compensation need", Unit::Eur, |n| Figure::from(n.compensation_need)),
    ("Result before compensation", Unit::Eur, |n| n.result_before),
    ("Result after compensation", Unit::Eur, |n| n.result_after),
];

fn render<'a, T: 'a>(
    kind: TableKind,
    rows: &[Row<T>],
    items: impl IntoIterator<Item = (VariantId, &'a T)>,
) -> Table {
    let fields = rows
        .iter()
        .map(|(name, unit, _)| FieldSpec::new(*name, *unit))
        .collect();
    let mut table = Table::new(kind, fields);
    // figures come from the same rows as the fields, so lengths always match
    for (variant, item) in items {
        let figures = rows.iter().map(|(_, _, extract)| extract(item)).collect();
        table.columns.insert(variant, figures);
    }
    table
}

/// The six output tables of one settlement run.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementTables {
    pub brp: Table,
    pub bsp: Table,
    pub retailer: Table,
    pub summary: Table,
    pub customer_price: Table,
    pub neutralization: Table,
}

impl SettlementTables {
    pub fn from_parameters(params: &ParameterSet) -> Self {
        Self::from_matrix(&ScenarioMatrix::build(params))
    }

    pub fn from_matrix(matrix: &ScenarioMatrix) -> Self {
        let summaries = summary::summarize(matrix);
        let comparisons = neutralization::compare_prices(matrix);
        let neutralizations = neutralization::neutralize(matrix, &summaries);

        Self {
            brp: render(
                TableKind::Brp,
                &BRP_ROWS,
                matrix.iter().map(|s| (s.id(), &s.brp)),
            ),
            bsp: render(
                TableKind::Bsp,
                &BSP_ROWS,
                matrix.iter().map(|s| (s.id(), &s.bsp)),
            ),
            retailer: render(
                TableKind::Retailer,
                &RETAILER_ROWS,
                matrix.iter().map(|s| (s.id(), &s.retailer)),
            ),
            summary: render(
                TableKind::Summary,
                &SUMMARY_ROWS,
                summaries.iter().map(|s| (s.variant, s)),
            ),
            customer_price: render(
                TableKind::CustomerPrice,
                &CUSTOMER_PRICE_ROWS,
                comparisons.iter().map(|c| (c.variant, c)),
            ),
            neutralization: render(
                TableKind::Neutralization,
                &NEUTRALIZATION_ROWS,
                neutralizations.iter().map(|n| (n.variant, n)),
            ),
        }
    }

    pub fn get(&self, kind: TableKind) -> &Table {
        match kind {
            TableKind::Brp => &self.brp,
            TableKind::Bsp => &self.bsp,
            TableKind::Retailer => &self.retailer,
            TableKind::Summary => &self.summary,
            TableKind::CustomerPrice => &self.customer_price,
            TableKind::Neutralization => &self.neutralization,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        TableKind::ALL.into_iter().map(move |kind| self.get(kind))
    }
}
