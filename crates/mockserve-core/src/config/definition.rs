//! Declarative route definitions as found in config files.

use crate::config::settings::deserialize_millis;
use crate::matching::PatternError;
use crate::registry::HandlerRegistry;
use crate::types::route::{HttpMethod, Route};
use crate::types::variant::{HandlerVariant, JsonResponse, Variant, VariantKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Route as written in a definitions file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDef {
    pub id: String,
    pub url: String,
    pub method: HttpMethod,
    pub variants: Vec<VariantDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDef {
    pub id: String,
    /// Milliseconds; fractional values are truncated
    #[serde(
        default,
        deserialize_with = "deserialize_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub delay: Option<u64>,
    #[serde(flatten)]
    pub kind: VariantDefKind,
}

/// Variant body, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VariantDefKind {
    Json {
        response: JsonResponse,
    },
    Handler {
        /// Name of a handler in the [`HandlerRegistry`]
        handler: String,
        /// Names of middleware in the [`HandlerRegistry`], run in order
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        middleware: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Handler '{name}' used by {route_id}:{variant_id} is not registered")]
    UnknownHandler {
        route_id: String,
        variant_id: String,
        name: String,
    },
    #[error("Middleware '{name}' used by {route_id}:{variant_id} is not registered")]
    UnknownMiddleware {
        route_id: String,
        variant_id: String,
        name: String,
    },
    #[error("Route {route_id} has an invalid url: {source}")]
    InvalidUrl {
        route_id: String,
        #[source]
        source: PatternError,
    },
}

impl RouteDef {
    /// Build the runtime route, looking handler names up in `registry`.
    pub fn into_route(self, registry: &HandlerRegistry) -> Result<Route, DefinitionError> {
        let route_id = self.id;
        let mut route =
            Route::new(route_id.clone(), self.url, self.method).map_err(|source| {
                DefinitionError::InvalidUrl {
                    route_id: route_id.clone(),
                    source,
                }
            })?;

        for variant in self.variants {
            let kind = match variant.kind {
                VariantDefKind::Json { response } => VariantKind::Json(response),
                VariantDefKind::Handler {
                    handler,
                    middleware,
                } => {
                    let handler_impl = registry.handler(&handler).ok_or_else(|| {
                        DefinitionError::UnknownHandler {
                            route_id: route_id.clone(),
                            variant_id: variant.id.clone(),
                            name: handler.clone(),
                        }
                    })?;
                    let middleware = middleware
                        .iter()
                        .map(|name| {
                            registry.middleware(name).ok_or_else(|| {
                                DefinitionError::UnknownMiddleware {
                                    route_id: route_id.clone(),
                                    variant_id: variant.id.clone(),
                                    name: name.clone(),
                                }
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    VariantKind::Handler(HandlerVariant {
                        middleware,
                        handler: handler_impl,
                    })
                }
            };
            route = route.with_variant(Variant {
                id: variant.id,
                delay: variant.delay,
                kind,
            });
        }

        Ok(route)
    }
}
