//! HTTP server wiring the switchboard into axum.

use crate::convert::{into_http_response, into_mock_request};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::Method;
use axum::response::Response;
use axum::Router;
use mockserve_core::config::ConfigError;
use mockserve_core::mocks::catalog::CatalogError;
use mockserve_core::types::collection::Collection;
use mockserve_core::types::route::Route;
use mockserve_core::{Catalog, HandlerRegistry, Logger, MockConfig, Switchboard, TracingLogger};
use serde_json::Value;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Mock server: validates definitions, then serves the selected collection over HTTP.
pub struct MockServer {
    config: MockConfig,
    logger: Arc<dyn Logger>,
    registry: HandlerRegistry,
}

impl MockServer {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            logger: Arc::new(TracingLogger),
            registry: HandlerRegistry::new(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Handlers and middleware that `type: handler` variants refer to by name.
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Validate raw definitions and activate the configured collection.
    ///
    /// Failures are logged before being returned.
    pub fn load(
        &self,
        routes: &[Value],
        collections: &[Value],
    ) -> Result<Arc<Switchboard>, StartupError> {
        let catalog = Catalog::from_definitions(routes, collections, &self.registry)
            .inspect_err(|err| self.logger.error(&err.to_string()))?;
        Ok(self.activate(catalog))
    }

    /// Same as [`MockServer::load`] for routes and collections built in code.
    pub fn load_routes(
        &self,
        routes: Vec<Route>,
        collections: Vec<Collection>,
    ) -> Result<Arc<Switchboard>, StartupError> {
        let catalog = Catalog::new(routes, collections)
            .map_err(CatalogError::from)
            .inspect_err(|err| self.logger.error(&err.to_string()))?;
        Ok(self.activate(catalog))
    }

    /// Bind `0.0.0.0:<port>` and serve until the process stops.
    pub async fn start(&self, routes: &[Value], collections: &[Value]) -> Result<(), StartupError> {
        let switchboard = self.load(routes, collections)?;
        let listener = self.bind().await?;
        self.serve(listener, switchboard).await
    }

    /// Serve on an already bound listener.
    pub async fn start_on(
        &self,
        listener: TcpListener,
        routes: &[Value],
        collections: &[Value],
    ) -> Result<(), StartupError> {
        let switchboard = self.load(routes, collections)?;
        self.serve(listener, switchboard).await
    }

    pub async fn start_with_routes(
        &self,
        routes: Vec<Route>,
        collections: Vec<Collection>,
    ) -> Result<(), StartupError> {
        let switchboard = self.load_routes(routes, collections)?;
        let listener = self.bind().await?;
        self.serve(listener, switchboard).await
    }

    fn activate(&self, catalog: Catalog) -> Arc<Switchboard> {
        Arc::new(Switchboard::start(
            Arc::new(catalog),
            self.config.clone(),
            Arc::clone(&self.logger),
        ))
    }

    async fn bind(&self) -> Result<TcpListener, StartupError> {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.config.port()));
        TcpListener::bind(addr).await.map_err(|source| {
            let err = StartupError::Bind { addr, source };
            self.logger.error(&err.to_string());
            err
        })
    }

    async fn serve(
        &self,
        listener: TcpListener,
        switchboard: Arc<Switchboard>,
    ) -> Result<(), StartupError> {
        let port = listener
            .local_addr()
            .map(|addr| addr.port())
            .unwrap_or_else(|_| self.config.port());
        self.logger.info(&format!("Mocks server listening on port {port}"));

        axum::serve(listener, app(switchboard))
            .await
            .map_err(StartupError::Serve)
    }
}

/// Router forwarding every request to `switchboard`.
pub fn app(switchboard: Arc<Switchboard>) -> Router {
    Router::new()
        .fallback(forward)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(switchboard)
}

async fn forward(State(switchboard): State<Arc<Switchboard>>, request: Request) -> Response {
    let head = request.method() == Method::HEAD;
    let request = into_mock_request(request).await;
    let mut response = into_http_response(switchboard.dispatch(request).await);
    if head {
        *response.body_mut() = Body::empty();
    }
    response
}
