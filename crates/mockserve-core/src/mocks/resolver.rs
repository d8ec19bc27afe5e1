//! Collection resolution into servable endpoints.

use crate::logger::Logger;
use crate::matching::UrlPattern;
use crate::mocks::catalog::Catalog;
use crate::types::collection::Collection;
use crate::types::route::{HttpMethod, Route, RouteReference};
use crate::types::variant::Variant;

/// One route served with one selected variant.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub route_id: String,
    pub url: String,
    pub method: HttpMethod,
    pub pattern: UrlPattern,
    pub variant: Variant,
}

/// Resolve the endpoints of `collection`, in the order of its route references.
///
/// References that do not name an existing route and variant are skipped.
pub fn resolve_endpoints(collection: &Collection, routes: &[Route]) -> Vec<Endpoint> {
    collection
        .routes
        .iter()
        .filter_map(|reference| {
            let reference = RouteReference::parse(reference)?;
            let route = routes.iter().find(|r| r.id == reference.route_id)?;
            let variant = route.variant(&reference.variant_id)?;
            Some(Endpoint {
                route_id: route.id.clone(),
                url: route.url.clone(),
                method: route.method,
                pattern: route.pattern().clone(),
                variant: variant.clone(),
            })
        })
        .collect()
}

/// Pick the collection to serve.
///
/// No name (or an empty one) selects the first defined collection. An unknown name is
/// logged and also falls back to the first defined collection.
pub fn select_collection<'a>(
    catalog: &'a Catalog,
    name: Option<&str>,
    logger: &dyn Logger,
) -> &'a Collection {
    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return catalog.default_collection();
    };

    if let Some(found) = catalog.collection(name) {
        return found;
    }

    logger.error(&format!("Collection {name} not found"));
    catalog.default_collection()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{Level, MemoryLogger};
    use rstest::rstest;
    use serde_json::json;

    fn route(id: &str, url: &str, variants: &[&str]) -> Route {
        variants.iter().fold(
            Route::new(id, url, HttpMethod::Get).unwrap(),
            |route, variant| route.with_variant(Variant::json(*variant, 200, json!(variant))),
        )
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                route("get-users", "/api/users", &["success", "error"]),
                route("get-user", "/api/users/:id", &["success"]),
            ],
            vec![
                Collection::new("base", ["get-users:success", "get-user:success"]),
                Collection::new("errors", ["get-users:error"]),
            ],
        )
        .unwrap()
    }

    #[rstest]
    fn test_resolve_preserves_collection_order() {
        let catalog = catalog();
        let collection = Collection::new(
            "reordered",
            ["get-user:success", "get-users:error", "get-users:success"],
        );

        let endpoints = resolve_endpoints(&collection, catalog.routes());
        let keys: Vec<String> = endpoints
            .iter()
            .map(|e| RouteReference::key(&e.route_id, &e.variant.id))
            .collect();
        assert_eq!(
            keys,
            vec!["get-user:success", "get-users:error", "get-users:success"]
        );
        assert_eq!(endpoints[0].url, "/api/users/:id");
        assert_eq!(endpoints[0].method, HttpMethod::Get);
    }

    #[rstest]
    #[case(&["missing:success", "get-users:success"], &["get-users:success"])]
    #[case(&["get-users:missing", "get-user:success"], &["get-user:success"])]
    #[case(&["no-separator", "get-users:error"], &["get-users:error"])]
    #[case(&["missing:missing"], &[])]
    fn test_resolve_skips_dangling_references(
        #[case] references: &[&str],
        #[case] expected: &[&str],
    ) {
        let catalog = catalog();
        let collection = Collection::new("dangling", references.iter().copied());
        let keys: Vec<String> = resolve_endpoints(&collection, catalog.routes())
            .iter()
            .map(|e| RouteReference::key(&e.route_id, &e.variant.id))
            .collect();
        assert_eq!(keys, expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn test_select_defaults_to_first_collection(#[case] name: Option<&str>) {
        let catalog = catalog();
        let logger = MemoryLogger::new();
        assert_eq!(select_collection(&catalog, name, &logger).id, "base");
        assert!(logger.lines().is_empty());
    }

    #[rstest]
    fn test_select_by_name() {
        let catalog = catalog();
        let logger = MemoryLogger::new();
        assert_eq!(
            select_collection(&catalog, Some("errors"), &logger).id,
            "errors"
        );
        assert!(logger.lines().is_empty());
    }

    #[rstest]
    fn test_select_unknown_falls_back_and_logs() {
        let catalog = catalog();
        let logger = MemoryLogger::new();
        let selected = select_collection(&catalog, Some("does-not-exist"), &logger);
        assert_eq!(selected.id, "base");
        assert_eq!(
            logger.messages(Level::Error),
            vec!["Collection does-not-exist not found"]
        );
    }
}
