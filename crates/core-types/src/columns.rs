//! Canonical column labels of the sales dataset.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CUSTOMER_ID: &str = "Customer ID";
pub const CUSTOMER_NAME: &str = "Customer Name";
pub const QUANTITY_ORDERED: &str = "Quantity Ordered";
pub const MSRP: &str = "MSRP";
pub const COST_PRICE: &str = "Cost Price";
pub const SELLING_PRICE: &str = "Selling Price";
pub const SALES: &str = "Sales";
pub const PROFIT_PER_UNIT: &str = "Profit per Unit";
pub const TOTAL_PROFIT: &str = "Total Profit/Loss";
pub const STATUS: &str = "Status";
pub const ORDER_DATE: &str = "Order Date";
pub const MONTH: &str = "Month";
pub const YEAR: &str = "Year";
pub const PRODUCT: &str = "Product";
pub const PRODUCT_CODE: &str = "Product Code";
pub const CITY: &str = "City";
pub const COUNTRY: &str = "Country";
pub const DEAL_SIZE: &str = "Deal Size";

/// The canonical dataset columns, in the order they are written to disk.
pub const CANONICAL_COLUMNS: [&str; 18] = [
    CUSTOMER_ID,
    CUSTOMER_NAME,
    QUANTITY_ORDERED,
    MSRP,
    COST_PRICE,
    SELLING_PRICE,
    SALES,
    PROFIT_PER_UNIT,
    TOTAL_PROFIT,
    STATUS,
    ORDER_DATE,
    MONTH,
    YEAR,
    PRODUCT,
    PRODUCT_CODE,
    CITY,
    COUNTRY,
    DEAL_SIZE,
];

/// A canonical column that can be summed, aggregated or forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    QuantityOrdered,
    Msrp,
    CostPrice,
    SellingPrice,
    Sales,
    ProfitPerUnit,
    TotalProfit,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 7] = [
        NumericColumn::QuantityOrdered,
        NumericColumn::Msrp,
        NumericColumn::CostPrice,
        NumericColumn::SellingPrice,
        NumericColumn::Sales,
        NumericColumn::ProfitPerUnit,
        NumericColumn::TotalProfit,
    ];

    /// The canonical column label.
    pub fn name(&self) -> &'static str {
        match self {
            NumericColumn::QuantityOrdered => QUANTITY_ORDERED,
            NumericColumn::Msrp => MSRP,
            NumericColumn::CostPrice => COST_PRICE,
            NumericColumn::SellingPrice => SELLING_PRICE,
            NumericColumn::Sales => SALES,
            NumericColumn::ProfitPerUnit => PROFIT_PER_UNIT,
            NumericColumn::TotalProfit => TOTAL_PROFIT,
        }
    }

    /// Looks a column up by its canonical label.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericColumn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| {
            CoreError::InvalidInput("numeric column".to_string(), s.to_string())
        })
    }
}
