//! Transport-independent request and response model.

mod request;
mod response;

pub use request::{parse_query_string, MockRequest};
pub use response::{Body, MockResponse};
