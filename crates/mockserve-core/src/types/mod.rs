//! Core domain types for routes, variants and collections.

pub mod collection;
pub mod handler;
pub mod route;
pub mod variant;
