//! Foglio: content indexing and search for a static personal blog.
//!
//! The crate loads article records from a content directory, builds an
//! immutable in-memory index (ordered listing, tag index, tag counts) once at
//! startup, and answers filter/search queries against it. Rendering,
//! theming, and routing are collaborators, not residents.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
