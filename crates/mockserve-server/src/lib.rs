//! HTTP transport for the mockserve engine.
//!
//! [`MockServer`] validates route and collection definitions, activates the selected
//! collection and serves it with axum. Every request goes through a single fallback handler,
//! so switching collections never touches the axum router.

pub mod cli;
pub mod convert;
pub mod server;

pub use server::{app, MockServer, StartupError};
