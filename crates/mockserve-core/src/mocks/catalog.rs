//! Catalog of validated routes and collections.
//!
//! Built once at startup and never mutated; the switchboard only ever reads from it.

use crate::config::definition::DefinitionError;
use crate::registry::HandlerRegistry;
use crate::types::collection::Collection;
use crate::types::route::Route;
use crate::validation::{
    check_collections, check_routes, validate_collections, validate_routes, ValidationError,
};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

#[derive(Debug)]
pub struct Catalog {
    routes: Vec<Route>,
    /// Never empty
    collections: Vec<Collection>,
}

impl Catalog {
    /// Check uniqueness and referential integrity of already-typed routes and collections.
    pub fn new(routes: Vec<Route>, collections: Vec<Collection>) -> Result<Self, ValidationError> {
        check_routes(&routes)?;
        check_collections(&collections, &routes)?;
        Ok(Self {
            routes,
            collections,
        })
    }

    /// Validate raw definitions and build the catalog, resolving handler names in `registry`.
    pub fn from_definitions(
        routes: &[Value],
        collections: &[Value],
        registry: &HandlerRegistry,
    ) -> Result<Self, CatalogError> {
        let route_defs = validate_routes(routes)?;
        let collections = validate_collections(collections, &route_defs)?;
        let routes = route_defs
            .into_iter()
            .map(|def| def.into_route(registry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(routes, collections)?)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn route(&self, route_id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == route_id)
    }

    pub fn collection(&self, collection_id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == collection_id)
    }

    /// First defined collection.
    pub fn default_collection(&self) -> &Collection {
        &self.collections[0]
    }
}
