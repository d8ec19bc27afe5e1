//! Core engine of the mockserve mock server.
//!
//! Routes declare one or more response variants, collections pick one variant per route,
//! and the [`Switchboard`](mocks::switchboard::Switchboard) serves whichever collection is
//! currently active. The HTTP listener lives in `mockserve-server`; this crate never touches
//! sockets.

pub mod config;
pub mod http;
pub mod logger;
pub mod matching;
pub mod mocks;
pub mod registry;
pub mod types;
pub mod validation;

pub use config::settings::MockConfig;
pub use http::{Body, MockRequest, MockResponse};
pub use logger::{Logger, MemoryLogger, TracingLogger};
pub use mocks::catalog::Catalog;
pub use mocks::switchboard::Switchboard;
pub use registry::HandlerRegistry;
pub use validation::ValidationError;
