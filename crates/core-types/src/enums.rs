use crate::columns::{NumericColumn, SALES, TOTAL_PROFIT};
use crate::error::CoreError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The calendar period used to bucket records for time-series aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Month,
    Quarter,
    Year,
}

impl Granularity {
    /// Returns the first day of the period that contains `date`.
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        let month = match self {
            Granularity::Month => date.month(),
            Granularity::Quarter => ((date.month() - 1) / 3) * 3 + 1,
            Granularity::Year => 1,
        };
        // Day one of an existing month always exists.
        NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
    }

    /// A human readable label, e.g. "Monthly".
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Month => "Monthly",
            Granularity::Quarter => "Quarterly",
            Granularity::Year => "Yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Granularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "month" | "monthly" => Ok(Granularity::Month),
            "q" | "quarter" | "quarterly" => Ok(Granularity::Quarter),
            "y" | "year" | "yearly" => Ok(Granularity::Year),
            other => Err(CoreError::InvalidInput(
                "granularity".to_string(),
                other.to_string(),
            )),
        }
    }
}

/// The user-facing metric choice. Each label maps onto one numeric column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum MetricLabel {
    #[default]
    Revenue,
    Profit,
}

impl MetricLabel {
    pub fn column(&self) -> NumericColumn {
        match self {
            MetricLabel::Revenue => NumericColumn::Sales,
            MetricLabel::Profit => NumericColumn::TotalProfit,
        }
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            MetricLabel::Revenue => SALES,
            MetricLabel::Profit => TOTAL_PROFIT,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricLabel::Revenue => "Revenue",
            MetricLabel::Profit => "Profit",
        }
    }
}

impl fmt::Display for MetricLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MetricLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revenue" | "sales" => Ok(MetricLabel::Revenue),
            "profit" | "total profit/loss" => Ok(MetricLabel::Profit),
            other => Err(CoreError::InvalidInput("metric".to_string(), other.to_string())),
        }
    }
}
