use crate::columns::NumericColumn;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One order line of the canonical sales dataset.
///
/// Every field is optional: a value that was blank or failed coercion is
/// `None` and never contributes to a sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub quantity_ordered: Option<i64>,
    pub msrp: Option<f64>,
    pub cost_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub sales: Option<f64>,
    pub profit_per_unit: Option<f64>,
    pub total_profit: Option<f64>,
    pub status: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub month: Option<String>,
    pub year: Option<i64>,
    pub product: Option<String>,
    pub product_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub deal_size: Option<String>,
    /// Source columns outside the canonical schema, passed through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl SalesRecord {
    /// Reads a numeric column as `f64`.
    pub fn value(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::QuantityOrdered => self.quantity_ordered.map(|q| q as f64),
            NumericColumn::Msrp => self.msrp,
            NumericColumn::CostPrice => self.cost_price,
            NumericColumn::SellingPrice => self.selling_price,
            NumericColumn::Sales => self.sales,
            NumericColumn::ProfitPerUnit => self.profit_per_unit,
            NumericColumn::TotalProfit => self.total_profit,
        }
    }
}
