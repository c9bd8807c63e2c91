//! HTTP server layer for the Pokédex API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                 TraceLayer (optional) ▶ CorsLayer                │
//! │            preflight (OPTIONS) is answered here, no auth         │
//! └────────────────────────────────┬─────────────────────────────────┘
//!                                  ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        pipeline (driver)                         │
//! │                                                                  │
//! │  ┌────────────┐ ┌──────────────────┐ ┌─────────────┐ ┌────────┐  │
//! │  │ access_log │▶│ security_headers │▶│ bearer_auth │▶│ routes │  │
//! │  └────────────┘ └──────────────────┘ └─────────────┘ └───┬────┘  │
//! │                                                          ▼       │
//! │                                   GET|HEAD /types, /pokemon      │
//! │                                                                  │
//! │  Err from any stage or handler ▶ error normalizer (500)          │
//! │  response ◀ on_response of every entered stage, in reverse       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod access_log;
pub mod auth;
pub mod handlers;
pub mod headers;
pub mod pipeline;
pub mod routes;

pub use access_log::{AccessLog, LogFormat};
pub use auth::{AuthError, BearerAuth, UNAUTHORIZED_MESSAGE};
pub use handlers::{pokemon_handler, types_handler};
pub use headers::SecurityHeaders;
pub use pipeline::{
    ApiResponse, ErrorNormalizer, Flow, Pipeline, QueryParams, RequestContext, Stage,
    JSON_CONTENT_TYPE,
};
pub use routes::{
    build_pipeline, create_router, create_router_with_pipeline, Handler, Route, RouteTable,
    RouterConfig,
};
