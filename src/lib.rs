//! # Pokédex API
//!
//! A small read-only HTTP API over an in-memory Pokédex.
//!
//! Every request passes through an explicit pipeline of stages: access
//! logging, security headers and a static bearer-token check, all behind an
//! outer CORS layer. Requests that get through are routed to one of two
//! handlers (each also answering `HEAD`):
//!
//! - `GET /types` - the 18 type tags
//! - `GET /pokemon?name=&type=` - records filtered by name (case-insensitive)
//!   and type (case-sensitive)
//!
//! Errors raised by any stage are turned into a 500 response in one place;
//! details are only exposed outside production.
//!
//! ## Architecture
//!
//! - [`dataset`] - Record model, type tags and filtering
//! - [`server`] - Pipeline, stages, route table and the axum bridge
//! - [`config`] - CLI and environment configuration
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use pokedex_api::{create_router, Dataset, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dataset = Dataset::load("pokedex.json").unwrap();
//!     let router = create_router(dataset, RouterConfig::new("my-api-token"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod server;

// Re-export commonly used types
pub use config::{Config, Environment};
pub use dataset::{CreatureQuery, CreatureRecord, Dataset, TYPE_TAGS};
pub use error::{DatasetError, PipelineError};
pub use server::{
    build_pipeline, create_router, create_router_with_pipeline, AccessLog, ApiResponse,
    AuthError, BearerAuth, ErrorNormalizer, Flow, LogFormat, Pipeline, QueryParams,
    RequestContext, RouteTable, RouterConfig, SecurityHeaders, Stage,
};
