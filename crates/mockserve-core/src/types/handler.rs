//! Capabilities of handler variants.

use crate::http::{MockRequest, MockResponse};

/// Per-installation data handed to a response handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerContext {
    /// Requests served by this endpoint since its dispatch table was installed, this one included
    pub call_count: u64,
}

/// Computes the response of a handler variant.
pub trait ResponseHandler: Send + Sync {
    fn respond(&self, request: &MockRequest, response: &mut MockResponse, ctx: &HandlerContext);
}

impl<F> ResponseHandler for F
where
    F: Fn(&MockRequest, &mut MockResponse, &HandlerContext) + Send + Sync,
{
    fn respond(&self, request: &MockRequest, response: &mut MockResponse, ctx: &HandlerContext) {
        self(request, response, ctx)
    }
}

/// Outcome of one middleware step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next step
    Continue,
    /// Stop the chain; the response written so far is sent
    Halt,
}

/// Request-processing step run before a handler.
pub trait Middleware: Send + Sync {
    fn handle(&self, request: &mut MockRequest, response: &mut MockResponse) -> Flow;
}

impl<F> Middleware for F
where
    F: Fn(&mut MockRequest, &mut MockResponse) -> Flow + Send + Sync,
{
    fn handle(&self, request: &mut MockRequest, response: &mut MockResponse) -> Flow {
        self(request, response)
    }
}
