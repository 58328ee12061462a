//! # Sales Data Store
//!
//! The tabular store: the only component that touches the sales dataset on
//! disk and the sole owner of the canonical table.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** File formats (workbook or delimited text), header
//!   renaming and type coercion are hidden here. The rest of the system sees a
//!   `SalesTable` of typed records.
//! - **Read-only Views:** `SalesTable` queries return new tables; the loaded
//!   table is never modified by its consumers.
//!
//! ## Public API
//!
//! - `SalesStore`: resolves the cached canonical file or the raw workbook.
//! - `SalesTable`: the canonical table with its filter and distinct-value queries.
//! - `StoreError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod schema;
pub mod store;
pub mod table;
pub mod workbook;

// Re-export the key components to create a clean, public-facing API.
pub use error::StoreError;
pub use store::{SalesStore, read_raw, read_table, write_table};
pub use table::SalesTable;
