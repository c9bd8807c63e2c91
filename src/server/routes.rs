//! Route table and router configuration for the Pokédex API.
//!
//! # Route Structure
//!
//! ```text
//! GET /types      - The 18 type tags (protected)
//! GET /pokemon    - Records filtered by `name` and `type` (protected)
//! ```
//!
//! CORS is an outer tower-http layer, so preflight requests are answered
//! before the pipeline runs. Every other request, matched or not, runs
//! through the same pipeline:
//! access log → security headers → bearer auth → route table.
//!
//! `HEAD` is served by the `GET` handler with the body dropped.
//!
//! # Example
//!
//! ```ignore
//! use pokedex_api::{create_router, Dataset, RouterConfig};
//!
//! let dataset = Dataset::load("pokedex.json")?;
//! let config = RouterConfig::new("my-api-token")
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(dataset, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    response::{IntoResponse, Response},
    Router,
};
use http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::access_log::AccessLog;
use super::auth::BearerAuth;
use super::handlers::{pokemon_handler, types_handler};
use super::headers::SecurityHeaders;
use super::pipeline::{ApiResponse, ErrorNormalizer, Pipeline, RequestContext};
use crate::config::Environment;
use crate::dataset::Dataset;
use crate::error::PipelineError;

// =============================================================================
// Route Table
// =============================================================================

/// A terminal request handler.
pub type Handler = fn(&Dataset, &RequestContext) -> Result<ApiResponse, PipelineError>;

/// A single exact-match route.
#[derive(Clone)]
pub struct Route {
    pub method: Method,
    pub path: &'static str,
    pub handler: Handler,
}

/// Dispatches on exact method and path.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The API's routes: `GET /types` and `GET /pokemon`.
    pub fn standard() -> Self {
        Self::new()
            .route(Method::GET, "/types", types_handler)
            .route(Method::GET, "/pokemon", pokemon_handler)
    }

    pub fn route(mut self, method: Method, path: &'static str, handler: Handler) -> Self {
        self.routes.push(Route {
            method,
            path,
            handler,
        });
        self
    }

    /// Find the handler for a method and path. `HEAD` matches `GET` routes.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<Handler> {
        let method = if *method == Method::HEAD {
            &Method::GET
        } else {
            method
        };

        self.routes
            .iter()
            .find(|route| route.method == *method && route.path == path)
            .map(|route| route.handler)
    }

    /// Run the matching handler, or answer 404 with an empty body.
    pub fn dispatch(
        &self,
        dataset: &Dataset,
        ctx: &RequestContext,
    ) -> Result<ApiResponse, PipelineError> {
        match self.lookup(&ctx.method, &ctx.path) {
            Some(handler) => handler(dataset, ctx),
            None => Ok(ApiResponse::not_found()),
        }
    }
}

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Bearer token every request must present
    pub api_token: String,

    /// Deployment environment; controls log format and error detail
    pub environment: Environment,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to wrap the router in a tower-http trace layer
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration with the given token.
    ///
    /// By default:
    /// - The environment is `development`
    /// - CORS allows any origin
    /// - Tracing is enabled
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            environment: Environment::default(),
            cors_origins: None,
            enable_tracing: true,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Assemble the standard pipeline for a dataset.
pub fn build_pipeline(dataset: Dataset, config: &RouterConfig) -> Pipeline {
    Pipeline::new(
        dataset,
        RouteTable::standard(),
        ErrorNormalizer::new(config.environment.clone()),
    )
    .with_stage(AccessLog::for_environment(&config.environment))
    .with_stage(SecurityHeaders::new())
    .with_stage(BearerAuth::new(&config.api_token))
}

/// Create the main application router.
///
/// All routing happens inside the pipeline, so the axum router is a single
/// fallback service wrapped in a CORS layer and, optionally, a trace layer.
pub fn create_router(dataset: Dataset, config: RouterConfig) -> Router {
    let pipeline = build_pipeline(dataset, &config);
    create_router_with_pipeline(pipeline, &config)
}

/// Serve a pre-built pipeline with the layers described by `config`.
pub fn create_router_with_pipeline(pipeline: Pipeline, config: &RouterConfig) -> Router {
    let cors = build_cors_layer(config);

    let router = Router::new()
        .fallback(pipeline_handler)
        .with_state(Arc::new(pipeline))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        // An empty list allows no cross-origin requests
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

/// Bridge an axum request into the pipeline.
async fn pipeline_handler(State(pipeline): State<Arc<Pipeline>>, request: Request) -> Response {
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let (parts, _body) = request.into_parts();
    let ctx = RequestContext::from_parts(parts, remote_addr);

    pipeline.handle(ctx).into_response()
}

// =============================================================================
// Tests
// =============================================================================
