//! # Sales Dashboard Core Types
//!
//! The shared vocabulary of the workspace: the canonical `SalesRecord`, the
//! names of the canonical columns and the small enums used to pick a metric
//! or a time granularity.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** This crate depends on nothing else in the workspace. Every
//!   other crate builds on these definitions.
//! - **No I/O:** Parsing files and coercing raw values belongs to `data-store`.

pub mod columns;
pub mod enums;
pub mod error;
pub mod record;

// Re-export the core types to provide a clean public API.
pub use columns::NumericColumn;
pub use enums::{Granularity, MetricLabel};
pub use error::CoreError;
pub use record::SalesRecord;
