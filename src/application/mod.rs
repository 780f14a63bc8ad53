//! Application services layer: the index builder and the search engine.

pub mod error;
pub mod index;
pub mod search;
