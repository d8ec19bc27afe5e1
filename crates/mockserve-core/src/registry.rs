//! Named handlers and middleware that definition files can refer to.

use crate::types::handler::{Middleware, ResponseHandler};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn ResponseHandler>>,
    middleware: HashMap<String, Arc<dyn Middleware>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; a later registration under the same name wins.
    pub fn add_handler(
        &mut self,
        name: impl Into<String>,
        handler: impl ResponseHandler + 'static,
    ) -> &mut Self {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn add_middleware(
        &mut self,
        name: impl Into<String>,
        middleware: impl Middleware + 'static,
    ) -> &mut Self {
        self.middleware.insert(name.into(), Arc::new(middleware));
        self
    }

    pub fn handler(&self, name: &str) -> Option<Arc<dyn ResponseHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn middleware(&self, name: &str) -> Option<Arc<dyn Middleware>> {
        self.middleware.get(name).cloned()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        let mut middleware: Vec<&str> = self.middleware.keys().map(String::as_str).collect();
        handlers.sort_unstable();
        middleware.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &handlers)
            .field("middleware", &middleware)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MockRequest, MockResponse};
    use crate::types::handler::{Flow, HandlerContext};
    use rstest::rstest;

    #[rstest]
    fn test_lookup_registered_names() {
        let mut registry = HandlerRegistry::new();
        registry
            .add_handler(
                "teapot",
                |_: &MockRequest, res: &mut MockResponse, _: &HandlerContext| {
                    res.set_status(418);
                },
            )
            .add_middleware("pass", |_: &mut MockRequest, _: &mut MockResponse| {
                Flow::Continue
            });

        let handler = registry.handler("teapot").expect("registered");
        let mut response = MockResponse::default();
        handler.respond(
            &MockRequest::default(),
            &mut response,
            &HandlerContext { call_count: 1 },
        );
        assert_eq!(response.status, 418);

        assert!(registry.middleware("pass").is_some());
        assert!(registry.handler("pass").is_none());
        assert!(registry.middleware("teapot").is_none());
    }

    #[rstest]
    fn test_debug_lists_sorted_names() {
        let mut registry = HandlerRegistry::new();
        registry
            .add_handler("b", |_: &MockRequest, _: &mut MockResponse, _: &HandlerContext| {})
            .add_handler("a", |_: &MockRequest, _: &mut MockResponse, _: &HandlerContext| {});
        let debug = format!("{registry:?}");
        assert!(debug.contains(r#"handlers: ["a", "b"]"#), "{debug}");
    }
}
