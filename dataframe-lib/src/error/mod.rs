//! Error types

mod edit;
mod export;
mod field;
mod store;
mod table;

pub use edit::*;
pub use export::*;
pub use field::*;
pub use store::*;
pub use table::*;
