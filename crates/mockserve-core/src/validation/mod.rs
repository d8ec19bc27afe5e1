//! Startup checks for route and collection definitions.
//!
//! Every failure here is fatal: the server must not start on a catalog that did not pass.
//! Shape checks run on raw definitions (JSON/YAML values); reference checks run on anything
//! implementing [`VariantKeys`], so programmatically built routes get the same treatment.

use crate::config::definition::{RouteDef, VariantDefKind};
use crate::matching::UrlPattern;
use crate::types::collection::Collection;
use crate::types::route::{Route, RouteReference};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("One or more routes not in expected shape")]
    RouteShape,
    #[error("One or more collections not in expected shape")]
    CollectionShape,
    #[error("No collections found")]
    NoCollections,
    #[error("Route: {reference} not found for collection: {collection_id}")]
    UnknownReference {
        reference: String,
        collection_id: String,
    },
}

/// Access to a route's id and its variant ids.
pub trait VariantKeys {
    fn route_id(&self) -> &str;
    fn variant_ids(&self) -> Vec<&str>;
}

impl VariantKeys for RouteDef {
    fn route_id(&self) -> &str {
        &self.id
    }

    fn variant_ids(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.id.as_str()).collect()
    }
}

impl VariantKeys for Route {
    fn route_id(&self) -> &str {
        &self.id
    }

    fn variant_ids(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.id.as_str()).collect()
    }
}

/// Check that every raw route has the expected shape.
///
/// Stops at the first offending route and does not say which one it was.
pub fn validate_routes(routes: &[Value]) -> Result<Vec<RouteDef>, ValidationError> {
    let defs = routes
        .iter()
        .map(|value| {
            let def = RouteDef::deserialize(value).map_err(|err| {
                tracing::debug!(%err, "route definition rejected");
                ValidationError::RouteShape
            })?;
            check_route_def(&def)?;
            Ok(def)
        })
        .collect::<Result<Vec<_>, _>>()?;

    check_routes(&defs)?;
    Ok(defs)
}

/// Check raw collections against the given routes.
///
/// In order: shape, emptiness, then the first reference (in source order) that names no
/// known `routeId:variantId` pair.
pub fn validate_collections<R: VariantKeys>(
    collections: &[Value],
    routes: &[R],
) -> Result<Vec<Collection>, ValidationError> {
    let collections = collections
        .iter()
        .map(|value| {
            Collection::deserialize(value).map_err(|err| {
                tracing::debug!(%err, "collection definition rejected");
                ValidationError::CollectionShape
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    check_collections(&collections, routes)?;
    Ok(collections)
}

/// Uniqueness of route ids, and of variant ids within each route.
pub fn check_routes<R: VariantKeys>(routes: &[R]) -> Result<(), ValidationError> {
    let mut route_ids = HashSet::new();
    for route in routes {
        if !route_ids.insert(route.route_id()) {
            return Err(ValidationError::RouteShape);
        }
        let mut variant_ids = HashSet::new();
        if !route.variant_ids().into_iter().all(|id| variant_ids.insert(id)) {
            return Err(ValidationError::RouteShape);
        }
    }
    Ok(())
}

/// Emptiness, duplicate ids and referential integrity of typed collections.
pub fn check_collections<R: VariantKeys>(
    collections: &[Collection],
    routes: &[R],
) -> Result<(), ValidationError> {
    let mut collection_ids = HashSet::new();
    if !collections.iter().all(|c| collection_ids.insert(c.id.as_str())) {
        return Err(ValidationError::CollectionShape);
    }

    if collections.is_empty() {
        return Err(ValidationError::NoCollections);
    }

    let known: HashSet<String> = routes
        .iter()
        .flat_map(|route| {
            route
                .variant_ids()
                .into_iter()
                .map(move |variant_id| RouteReference::key(route.route_id(), variant_id))
        })
        .collect();

    for collection in collections {
        if let Some(reference) = collection.routes.iter().find(|r| !known.contains(*r)) {
            return Err(ValidationError::UnknownReference {
                reference: reference.clone(),
                collection_id: collection.id.clone(),
            });
        }
    }

    Ok(())
}

fn check_route_def(def: &RouteDef) -> Result<(), ValidationError> {
    if UrlPattern::parse(&def.url).is_err() {
        return Err(ValidationError::RouteShape);
    }

    let statuses_valid = def.variants.iter().all(|variant| match &variant.kind {
        VariantDefKind::Json { response } => (100..=599).contains(&response.status),
        VariantDefKind::Handler { .. } => true,
    });
    if !statuses_valid {
        return Err(ValidationError::RouteShape);
    }

    Ok(())
}
