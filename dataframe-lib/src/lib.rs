//! Data table engine
//!
//! A configurable table over an in-memory row collection: filter, search,
//! sort and paginate; inline cell editing with validation; row and bulk
//! actions, run immediately or staged for batch confirmation; selection
//! that survives loading and resets on new data.
//!
//! The entry point is [`table::DataFrameTable`].

pub mod action;
pub mod column;
pub mod edit;
pub mod error;
pub mod model;
pub mod query;
pub mod selection;
pub mod staging;
pub mod store;
pub mod table;

pub use table::DataFrameTable;
pub use table::TableConfig;
