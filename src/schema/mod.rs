//! Type system the query documents are bound against.

pub mod meta;
pub mod model;
