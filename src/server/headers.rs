//! Security headers stage.
//!
//! Headers are applied on the way out, so every response that passes through
//! the pipeline (including 401s, 404s and normalized errors) carries them.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use super::pipeline::{ApiResponse, Flow, RequestContext, Stage};
use crate::error::PipelineError;

// =============================================================================
// Security Headers
// =============================================================================

/// Content-Security-Policy applied to every response.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self';base-uri 'self';\
    font-src 'self' https: data:;form-action 'self';frame-ancestors 'self';\
    img-src 'self' data:;object-src 'none';script-src 'self';script-src-attr 'none';\
    style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests";

const SECURITY_HEADERS: [(&str, &str); 12] = [
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// Adds a fixed set of hardening headers and strips `x-powered-by`.
#[derive(Debug, Clone, Default)]
pub struct SecurityHeaders;

impl SecurityHeaders {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(headers: &mut HeaderMap) {
        for (name, value) in SECURITY_HEADERS {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        headers.remove("x-powered-by");
    }
}

impl Stage for SecurityHeaders {
    fn name(&self) -> &'static str {
        "security_headers"
    }

    fn on_request(&self, _ctx: &mut RequestContext) -> Result<Flow, PipelineError> {
        Ok(Flow::Continue)
    }

    fn on_response(&self, _ctx: &RequestContext, response: &mut ApiResponse) {
        Self::apply(&mut response.headers);
    }
}

// =============================================================================
// Tests
// =============================================================================
