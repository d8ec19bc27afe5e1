//! Request path matching.

mod url;

pub use url::{PatternError, UrlPattern};
