//! Row model

mod dataset;
mod row;
mod row_serde;
mod schema;
mod value;

pub use dataset::*;
pub use row::*;
pub use schema::*;
pub use value::*;
