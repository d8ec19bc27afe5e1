//! Router switchboard.
//!
//! Holds the active dispatch table behind an atomic pointer. Every request loads the pointer
//! once and is served entirely by that snapshot; a collection switch builds a fresh table and
//! swaps it in without waiting for in-flight requests.

use crate::config::settings::MockConfig;
use crate::http::{MockRequest, MockResponse};
use crate::logger::Logger;
use crate::mocks::catalog::Catalog;
use crate::mocks::dispatch::{DispatchTable, EntryAction};
use crate::mocks::resolver::{resolve_endpoints, select_collection};
use arc_swap::ArcSwapOption;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Collection currently served, with the table built for it.
#[derive(Debug)]
pub struct ActiveSelection {
    pub collection_id: String,
    pub table: DispatchTable,
}

pub struct Switchboard {
    catalog: Arc<Catalog>,
    config: MockConfig,
    logger: Arc<dyn Logger>,
    active: ArcSwapOption<ActiveSelection>,
}

impl fmt::Debug for Switchboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switchboard")
            .field("config", &self.config)
            .field("active", &self.active_collection_id())
            .finish_non_exhaustive()
    }
}

impl Switchboard {
    /// Switchboard with no active table; every request gets a 404 until a collection is set.
    pub fn new(catalog: Arc<Catalog>, config: MockConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            catalog,
            config,
            logger,
            active: ArcSwapOption::empty(),
        }
    }

    /// New switchboard serving the configured `selected` collection.
    pub fn start(catalog: Arc<Catalog>, config: MockConfig, logger: Arc<dyn Logger>) -> Self {
        let switchboard = Self::new(catalog, config, logger);
        let selected = switchboard.config.selected.clone();
        switchboard.set_collection(selected.as_deref());
        switchboard
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Build a table for the named collection and make it the active one.
    ///
    /// Unknown or missing names select the first collection.
    pub fn set_collection(&self, name: Option<&str>) -> Arc<ActiveSelection> {
        let collection = select_collection(&self.catalog, name, self.logger.as_ref());
        self.logger.info(&format!("Using collection: {}", collection.id));

        let endpoints = resolve_endpoints(collection, self.catalog.routes());
        let table = DispatchTable::build(&self.config, endpoints);
        self.install(collection.id.clone(), table)
    }

    /// Replace the active selection. Requests already holding the previous one finish on it.
    pub fn install(&self, collection_id: String, table: DispatchTable) -> Arc<ActiveSelection> {
        let selection = Arc::new(ActiveSelection {
            collection_id,
            table,
        });
        self.active.store(Some(Arc::clone(&selection)));
        selection
    }

    pub fn current(&self) -> Option<Arc<ActiveSelection>> {
        self.active.load_full()
    }

    pub fn active_collection_id(&self) -> Option<String> {
        self.current().map(|selection| selection.collection_id.clone())
    }

    /// Serve one request against the table active when it arrived.
    pub async fn dispatch(&self, mut request: MockRequest) -> MockResponse {
        let Some(selection) = self.current() else {
            return self.not_found(&request);
        };
        let Some((entry, params)) = selection.table.find(&request) else {
            return self.not_found(&request);
        };
        request.params = params;

        match &entry.action {
            EntryAction::Serve(endpoint) => {
                selection
                    .table
                    .serve(entry, endpoint, request, self.logger.as_ref())
                    .await
            }
            EntryAction::SetCollection => {
                let name = request
                    .body
                    .as_ref()
                    .and_then(|body| body.get("collection"))
                    .and_then(Value::as_str);
                self.set_collection(name);
                MockResponse::text(200, "OK")
            }
        }
    }

    fn not_found(&self, request: &MockRequest) -> MockResponse {
        self.logger.error(&format!("{} not found", request.url));
        MockResponse::not_found()
    }
}
