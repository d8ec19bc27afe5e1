//! Dispatch table built from one resolved endpoint set.
//!
//! A table is immutable once built apart from its per-endpoint call counters, so it can be
//! shared by any number of in-flight requests. Switching collections builds a new table.

use crate::config::settings::MockConfig;
use crate::http::{Body, MockRequest, MockResponse};
use crate::logger::Logger;
use crate::matching::UrlPattern;
use crate::mocks::resolver::Endpoint;
use crate::types::handler::{Flow, HandlerContext};
use crate::types::route::HttpMethod;
use crate::types::variant::VariantKind;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Control route that switches the active collection.
pub const SET_COLLECTION_PATH: &str = "/__set-collection";

#[derive(Debug)]
pub enum EntryAction {
    /// Serve a resolved endpoint
    Serve(Endpoint),
    /// Switch to the collection named in the request body
    SetCollection,
}

#[derive(Debug)]
pub struct DispatchEntry {
    pub method: HttpMethod,
    pub pattern: UrlPattern,
    pub action: EntryAction,
    calls: AtomicU64,
}

impl DispatchEntry {
    fn new(method: HttpMethod, pattern: UrlPattern, action: EntryAction) -> Self {
        Self {
            method,
            pattern,
            action,
            calls: AtomicU64::new(0),
        }
    }

    /// Requests this entry has served since the table was built.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
pub struct DispatchTable {
    entries: Vec<DispatchEntry>,
    config: MockConfig,
}

impl DispatchTable {
    /// One entry per endpoint in the given order, then the set-collection control entry.
    pub fn build(config: &MockConfig, endpoints: Vec<Endpoint>) -> Self {
        let mut entries: Vec<DispatchEntry> = endpoints
            .into_iter()
            .map(|endpoint| {
                DispatchEntry::new(
                    endpoint.method,
                    endpoint.pattern.clone(),
                    EntryAction::Serve(endpoint),
                )
            })
            .collect();
        entries.push(DispatchEntry::new(
            HttpMethod::Post,
            UrlPattern::exact(SET_COLLECTION_PATH),
            EntryAction::SetCollection,
        ));

        Self {
            entries,
            config: config.clone(),
        }
    }

    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    /// First entry registered for the request's method whose pattern matches its URL.
    pub fn find(&self, request: &MockRequest) -> Option<(&DispatchEntry, HashMap<String, String>)> {
        let method = request.method?;
        self.entries
            .iter()
            .filter(|entry| entry.method == method)
            .find_map(|entry| entry.pattern.matches(&request.url).map(|params| (entry, params)))
    }

    /// Serve `request` with a matched endpoint.
    ///
    /// Logs the call, waits out the effective delay without blocking the runtime, then
    /// produces the variant's response.
    pub async fn serve(
        &self,
        entry: &DispatchEntry,
        endpoint: &Endpoint,
        mut request: MockRequest,
        logger: &dyn Logger,
    ) -> MockResponse {
        let call_count = entry.calls.fetch_add(1, Ordering::Relaxed) + 1;
        let variant = &endpoint.variant;

        logger.info(&format!(
            "Calling {}:{} - {} {}",
            endpoint.route_id, variant.id, endpoint.method, endpoint.url
        ));

        let delay = self.config.effective_delay(variant.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut response = MockResponse::default();
        match &variant.kind {
            VariantKind::Json(json) => {
                response.set_status(json.status);
                if let Some(headers) = &json.headers {
                    for (name, value) in headers {
                        response.set_header(name.clone(), value.clone());
                    }
                }
                response.body = match &json.body {
                    None => Body::Empty,
                    Some(Value::String(text)) => Body::Text(text.clone()),
                    Some(value) => Body::Json(value.clone()),
                };
            }
            VariantKind::Handler(handler) => {
                for middleware in &handler.middleware {
                    if middleware.handle(&mut request, &mut response) == Flow::Halt {
                        return response;
                    }
                }
                handler
                    .handler
                    .respond(&request, &mut response, &HandlerContext { call_count });
            }
        }

        response
    }
}
