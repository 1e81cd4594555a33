//! Row and bulk actions.
//!
//! - [`RowAction`] / [`BulkAction`] - declared actions with a semantic
//!   [`ActionKind`]
//! - [`ActionManager`] - default behaviors and caller overrides
//! - [`DataIntent`] - the data changes actions ask the caller to make
//! - [`StagedRunner`] - runs staged actions from the staging queue

mod config;
mod confirm;
mod executor;
mod intent;
mod manager;

pub use config::*;
pub use confirm::*;
pub use executor::*;
pub use intent::*;
pub use manager::*;
