//! Row derivation pipeline.
//!
//! This module shapes a fully loaded row collection for display:
//!
//! - [`Filter`] - caller-supplied conditions (ranges, predicates)
//! - [`QuickFilter`] / [`ActiveFilters`] - declared single-field filters and
//!   the values a user picked
//! - [`SearchConfig`] - free-text search
//! - [`SortSpec`] - single-column sort with nulls last
//! - [`Pagination`] - the visible window
//!
//! [`Query`] runs filter, search and sort in that fixed order; pagination is
//! applied to its output.

mod filter;
mod order;
mod page;
mod pipeline;
mod search;

pub use filter::*;
pub use order::*;
pub use page::*;
pub use pipeline::*;
pub use search::*;
