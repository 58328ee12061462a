//! # Sales Dashboard Core
//!
//! The interactive layer between a user's selections and the analytics
//! crates. A `Session` holds the selection, a `Dashboard` turns it into
//! presentation-ready panels, and front ends (the root CLI) only format them.
//!
//! ## Architectural Principles
//!
//! - **Explicit Context:** There is no global state. A `Session` is passed by
//!   reference to every panel builder and changes only through
//!   `Session::apply(Interaction)`.
//! - **Advisory Memoization:** Panel results are cached in a `Memo`, an LRU
//!   keyed by a SHA-256 hash of the panel inputs. Recomputing is always safe.
//! - **Soft-Empty Panels:** A panel is either content or a `Notice`. Empty
//!   selections and forecast validation failures never abort a render.
//!
//! ## Public API
//!
//! - `Dashboard`: `open`, `start_session`, `render` and the per-panel builders.
//! - `Session`, `Interaction`, `FilterState`, `DatePreset`: the selection model.
//! - `Memo`: the content-addressed cache.

pub mod cache;
pub mod dashboard;
pub mod error;
pub mod forecast_view;
pub mod geography;
pub mod kpi_cards;
pub mod panel;
pub mod session;
pub mod trend;

pub use cache::{Memo, content_key};
pub use dashboard::{Dashboard, Frame};
pub use error::DashboardError;
pub use forecast_view::{
    ForecastPanel, ForecastSegments, prepare_forecast_segments, summarize_forecast_insights,
};
pub use geography::GeographyPanel;
pub use kpi_cards::{KpiCard, KpiPanel};
pub use panel::{Notice, NoticeLevel, Panel};
pub use session::{DatePreset, FilterState, Interaction, Session};
pub use trend::TrendPanel;
