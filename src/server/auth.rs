//! Static bearer-token authentication.
//!
//! Every request must carry an `Authorization` header of exactly two
//! space-separated parts, the second of which equals the configured token:
//!
//! ```text
//! Authorization: Bearer 3f0c2a4e-...
//! ```
//!
//! The scheme word is not checked. There are no public routes.
//!
//! # Example
//!
//! ```rust
//! use pokedex_api::server::auth::{AuthError, BearerAuth};
//!
//! let auth = BearerAuth::new("my-token");
//! assert!(auth.verify(Some("Bearer my-token")).is_ok());
//! assert!(matches!(auth.verify(None), Err(AuthError::MissingHeader)));
//! ```

use std::fmt;

use axum::http::StatusCode;
use serde_json::json;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::pipeline::{ApiResponse, Flow, RequestContext, Stage};
use crate::error::PipelineError;

/// Body of every 401 response.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized request";

// =============================================================================
// Types
// =============================================================================

/// Authentication error types.
///
/// All variants produce the same client-facing response; the distinction only
/// shows up in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable `Authorization` header
    MissingHeader,

    /// Header is not `<scheme> <token>`
    MalformedHeader,

    /// Token does not match
    InvalidToken,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "Missing authorization header"),
            AuthError::MalformedHeader => write!(f, "Malformed authorization header"),
            AuthError::InvalidToken => write!(f, "Invalid bearer token"),
        }
    }
}

impl AuthError {
    /// Convert to the 401 response, logging the reason.
    pub fn to_response(&self) -> ApiResponse {
        let status = StatusCode::UNAUTHORIZED;

        // A wrong token could indicate probing, so log at warn level
        match self {
            AuthError::InvalidToken => {
                warn!(status = status.as_u16(), "Authentication failed: {}", self);
            }
            _ => {
                debug!(status = status.as_u16(), "Authentication failed: {}", self);
            }
        }

        ApiResponse::json_value(status, json!({ "error": UNAUTHORIZED_MESSAGE }))
    }
}

// =============================================================================
// Bearer Authentication
// =============================================================================

/// Pipeline stage checking the bearer token.
#[derive(Clone)]
pub struct BearerAuth {
    token: Vec<u8>,
}

impl BearerAuth {
    pub fn new(token: impl AsRef<[u8]>) -> Self {
        Self {
            token: token.as_ref().to_vec(),
        }
    }

    /// Check an `Authorization` header value.
    pub fn verify(&self, header: Option<&str>) -> Result<(), AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;

        let mut parts = header.split(' ');
        let token = match (parts.next(), parts.next(), parts.next()) {
            (Some(_scheme), Some(token), None) => token,
            _ => return Err(AuthError::MalformedHeader),
        };

        // Constant-time comparison
        if token.as_bytes().ct_eq(&self.token).into() {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth").finish_non_exhaustive()
    }
}

impl Stage for BearerAuth {
    fn name(&self) -> &'static str {
        "bearer_auth"
    }

    fn on_request(&self, ctx: &mut RequestContext) -> Result<Flow, PipelineError> {
        match self.verify(ctx.authorization()) {
            Ok(()) => Ok(Flow::Continue),
            Err(err) => Ok(Flow::Respond(err.to_response())),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
