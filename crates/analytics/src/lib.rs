//! # Sales Analytics Engine
//!
//! Aggregations and KPIs over the canonical sales table.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** Nothing here performs I/O. Inputs are borrowed
//!   `SalesTable`s and outputs are new values; the source table is never modified.
//! - **No Errors:** Arithmetic edge cases resolve to 0 or to `None`
//!   ("undefined"). Empty inputs give empty results, which callers render as
//!   informational states.
//!
//! ## Public API
//!
//! - `aggregate_by_period` / `aggregate_by_country`: grouped sums with profit margin.
//! - `build_comparison_window`: the prior period of equal length.
//! - `calculate_kpis`: the `KpiSnapshot` of a selection.
//! - `AnalyticsEngine`: a stateless facade over the above.

pub mod aggregation;
pub mod comparison;
pub mod engine;
pub mod kpi;

pub use aggregation::{
    CountryRow, PeriodDelta, PeriodRow, aggregate_by_country, aggregate_by_period,
    rank_countries, with_period_deltas,
};
pub use comparison::{build_comparison_window, comparison_bounds};
pub use engine::AnalyticsEngine;
pub use kpi::{KpiSnapshot, calculate_kpis, percentage_change};
