//! The request pipeline.
//!
//! Every request is turned into a [`RequestContext`] and driven through an
//! ordered list of [`Stage`]s. Each stage either lets the request continue or
//! answers it directly. Requests that get past every stage are dispatched by
//! the [`RouteTable`]. Errors returned anywhere along the way are converted to
//! a 500 response by the [`ErrorNormalizer`].
//!
//! ```text
//!  request ─▶ stage 1 ─▶ stage 2 ─▶ ... ─▶ stage N ─▶ route table ─▶ handler
//!                │           │                │            │
//!                └───────────┴── Respond / Err ┴────────────┘
//!                                      │
//!                              error normalizer
//!                                      │
//!  response ◀─ stage 1 ◀─ stage 2 ◀─ ... (on_response, reverse order)
//! ```
//!
//! Only stages whose `on_request` ran get `on_response`, so a short-circuit at
//! stage K still passes its response back through stages K..1.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{
    header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, Version,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error};
use url::form_urlencoded;

use super::routes::RouteTable;
use crate::config::Environment;
use crate::dataset::{CreatureQuery, Dataset};
use crate::error::PipelineError;

/// Content type of every JSON body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

// =============================================================================
// Request Context
// =============================================================================

/// Query parameters understood by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub name: Option<String>,
    pub type_tag: Option<String>,
}

impl QueryParams {
    /// Parse a raw query string. The first occurrence of a repeated key wins.
    pub fn parse(query: Option<&str>) -> Self {
        let mut params = Self::default();

        for (key, value) in form_urlencoded::parse(query.unwrap_or("").as_bytes()) {
            match key.as_ref() {
                "name" if params.name.is_none() => params.name = Some(value.into_owned()),
                "type" if params.type_tag.is_none() => params.type_tag = Some(value.into_owned()),
                _ => {}
            }
        }

        params
    }

    pub fn to_creature_query(&self) -> CreatureQuery {
        CreatureQuery {
            name: self.name.clone(),
            type_tag: self.type_tag.clone(),
        }
    }
}

/// Per-request state carried through the pipeline.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub raw_query: Option<String>,
    pub query: QueryParams,
    pub headers: HeaderMap,
    pub version: Version,
    pub remote_addr: Option<SocketAddr>,
    pub started_at: Instant,
}

impl RequestContext {
    pub fn new(method: Method, uri: &Uri) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            raw_query: uri.query().map(str::to_string),
            query: QueryParams::parse(uri.query()),
            headers: HeaderMap::new(),
            version: Version::HTTP_11,
            remote_addr: None,
            started_at: Instant::now(),
        }
    }

    /// Build the context from the head of an incoming request.
    pub fn from_parts(parts: Parts, remote_addr: Option<SocketAddr>) -> Self {
        let mut ctx = Self::new(parts.method, &parts.uri);
        ctx.headers = parts.headers;
        ctx.version = parts.version;
        ctx.remote_addr = remote_addr;
        ctx
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// The `Authorization` header, if present and valid text.
    pub fn authorization(&self) -> Option<&str> {
        self.header_str(&header::AUTHORIZATION)
    }

    pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Path plus query string, as requested.
    pub fn url(&self) -> String {
        match &self.raw_query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// A fully materialized response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(
        status: StatusCode,
        value: &T,
    ) -> Result<Self, PipelineError> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::with_json_body(status, Bytes::from(body)))
    }

    /// Build a JSON response from an already-constructed value.
    pub fn json_value(status: StatusCode, value: Value) -> Self {
        Self::with_json_body(status, Bytes::from(value.to_string()))
    }

    /// Drop the body for a `HEAD` request, keeping its length.
    pub fn strip_body(&mut self) {
        self.headers
            .insert(header::CONTENT_LENGTH, HeaderValue::from(self.body.len()));
        self.body = Bytes::new();
    }

    /// The response for requests no route matches.
    pub fn not_found() -> Self {
        Self::empty(StatusCode::NOT_FOUND)
    }

    fn with_json_body(status: StatusCode, body: Bytes) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        );
        Self {
            status,
            headers,
            body,
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, Body::from(self.body)).into_response()
    }
}

// =============================================================================
// Stages
// =============================================================================

/// What a stage decided to do with a request.
#[derive(Debug)]
pub enum Flow {
    /// Hand the request to the next stage.
    Continue,

    /// Stop here and send this response.
    Respond(ApiResponse),
}

/// One step of the pipeline.
pub trait Stage: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Inspect (and possibly annotate) the request on the way in.
    fn on_request(&self, ctx: &mut RequestContext) -> Result<Flow, PipelineError>;

    /// Decorate the final response on the way out.
    fn on_response(&self, _ctx: &RequestContext, _response: &mut ApiResponse) {}
}

// =============================================================================
// Error Normalizer
// =============================================================================

/// Turns pipeline errors into 500 responses.
///
/// This is the only place error detail can reach a client, and only outside
/// production.
#[derive(Debug, Clone, Default)]
pub struct ErrorNormalizer {
    environment: Environment,
}

impl ErrorNormalizer {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    pub fn normalize(&self, err: &PipelineError) -> ApiResponse {
        let detail = err.detail();

        error!(
            error_type = err.kind(),
            status = StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail = %detail,
            "Server error: {}",
            err
        );

        let body = if self.environment.is_production() {
            json!({ "error": { "message": "server error" } })
        } else {
            json!({ "error": detail })
        };

        ApiResponse::json_value(StatusCode::INTERNAL_SERVER_ERROR, body)
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Ordered stages plus the route table they guard.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    routes: RouteTable,
    dataset: Dataset,
    normalizer: ErrorNormalizer,
}

impl Pipeline {
    /// Create a pipeline with no stages.
    pub fn new(dataset: Dataset, routes: RouteTable, normalizer: ErrorNormalizer) -> Self {
        Self {
            stages: Vec::new(),
            routes,
            dataset,
            normalizer,
        }
    }

    /// Append a stage. Stages run in the order they are added.
    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Run one request through the pipeline.
    pub fn handle(&self, mut ctx: RequestContext) -> ApiResponse {
        let mut entered = 0;
        let mut outcome = None;

        for stage in &self.stages {
            entered += 1;
            match stage.on_request(&mut ctx) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Respond(response)) => {
                    debug!(
                        stage = stage.name(),
                        status = response.status.as_u16(),
                        "Pipeline short-circuited"
                    );
                    outcome = Some(Ok(response));
                    break;
                }
                Err(err) => {
                    outcome = Some(Err(err));
                    break;
                }
            }
        }

        let outcome = match outcome {
            Some(outcome) => outcome,
            None => self.routes.dispatch(&self.dataset, &ctx),
        };

        let mut response = outcome.unwrap_or_else(|err| self.normalizer.normalize(&err));

        for stage in self.stages[..entered].iter().rev() {
            stage.on_response(&ctx, &mut response);
        }

        if ctx.method == Method::HEAD {
            response.strip_body();
        }

        response
    }
}

// =============================================================================
// Tests
// =============================================================================
