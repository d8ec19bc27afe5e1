//! Route/collection definitions and the files they are loaded from.

pub mod definition;
pub mod error;
pub mod parser;
pub mod settings;

pub use error::ConfigError;
