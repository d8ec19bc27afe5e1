//! Response variant types.

use crate::types::handler::{Middleware, ResponseHandler};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Response variant of a route.
#[derive(Debug, Clone)]
pub struct Variant {
    /// Unique identifier for this variant within the route
    pub id: String,
    /// Delay in milliseconds before responding, overrides the server default
    pub delay: Option<u64>,
    pub kind: VariantKind,
}

/// How a variant produces its response.
#[derive(Debug, Clone)]
pub enum VariantKind {
    /// Fixed status and body
    Json(JsonResponse),
    /// Computed by a handler, after its middleware
    Handler(HandlerVariant),
}

/// Canned response of a json variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResponse {
    /// HTTP status code for the response (100-599)
    pub status: u16,
    /// Response headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Response body, sent verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Handler computation with the middleware that runs before it.
#[derive(Clone)]
pub struct HandlerVariant {
    pub middleware: Vec<Arc<dyn Middleware>>,
    pub handler: Arc<dyn ResponseHandler>,
}

impl fmt::Debug for HandlerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerVariant")
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

impl Variant {
    pub fn json(id: impl Into<String>, status: u16, body: Value) -> Self {
        Self {
            id: id.into(),
            delay: None,
            kind: VariantKind::Json(JsonResponse {
                status,
                headers: None,
                body: Some(body),
            }),
        }
    }

    pub fn handler(id: impl Into<String>, handler: impl ResponseHandler + 'static) -> Self {
        Self::from_handler(id, Arc::new(handler))
    }

    pub fn from_handler(id: impl Into<String>, handler: Arc<dyn ResponseHandler>) -> Self {
        Self {
            id: id.into(),
            delay: None,
            kind: VariantKind::Handler(HandlerVariant {
                middleware: Vec::new(),
                handler,
            }),
        }
    }

    pub fn with_delay(mut self, delay: u64) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Appends a middleware step. Ignored for json variants.
    pub fn with_middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        if let VariantKind::Handler(handler) = &mut self.kind {
            handler.middleware.push(Arc::new(middleware));
        }
        self
    }

    /// Sets a response header. Ignored for handler variants, which write their own.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let VariantKind::Json(response) = &mut self.kind {
            response
                .headers
                .get_or_insert_with(HashMap::new)
                .insert(name.into(), value.into());
        }
        self
    }
}
