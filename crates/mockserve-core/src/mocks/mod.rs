//! Mocks management module.
//!
//! - [`catalog::Catalog`]: validated, immutable routes and collections
//! - [`resolver`]: turns a collection into the ordered endpoints it serves
//! - [`dispatch::DispatchTable`]: matches requests against one resolved endpoint set
//! - [`switchboard::Switchboard`]: holds the active table and swaps it on collection change

pub mod catalog;
pub mod dispatch;
pub mod resolver;
pub mod switchboard;
