//! Access logging stage.
//!
//! Emits one `info` event per request once the response is known. Production
//! uses the compact `tiny` layout; every other environment uses `common`,
//! which adds the peer address and protocol version.

use std::time::Instant;

use http::Version;
use tracing::info;

use super::pipeline::{ApiResponse, Flow, RequestContext, Stage};
use crate::config::Environment;
use crate::error::PipelineError;

/// Which fields an access log line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// method, url, status, content length, response time
    Tiny,
    /// remote address, method, url, HTTP version, status, content length
    Common,
}

/// Pipeline stage writing access logs.
#[derive(Debug, Clone)]
pub struct AccessLog {
    format: LogFormat,
}

impl AccessLog {
    pub fn new(format: LogFormat) -> Self {
        Self { format }
    }

    pub fn for_environment(environment: &Environment) -> Self {
        if environment.is_production() {
            Self::new(LogFormat::Tiny)
        } else {
            Self::new(LogFormat::Common)
        }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }
}

impl Stage for AccessLog {
    fn name(&self) -> &'static str {
        "access_log"
    }

    fn on_request(&self, ctx: &mut RequestContext) -> Result<Flow, PipelineError> {
        ctx.started_at = Instant::now();
        Ok(Flow::Continue)
    }

    fn on_response(&self, ctx: &RequestContext, response: &mut ApiResponse) {
        let content_length = response.body.len();
        let url = ctx.url();

        match self.format {
            LogFormat::Tiny => {
                let elapsed_ms = ctx.started_at.elapsed().as_secs_f64() * 1000.0;
                info!(
                    method = %ctx.method,
                    url = %url,
                    status = response.status.as_u16(),
                    content_length,
                    elapsed_ms,
                    "request"
                );
            }
            LogFormat::Common => {
                let remote_addr = ctx
                    .remote_addr
                    .map(|addr| addr.ip().to_string())
                    .unwrap_or_else(|| "-".to_string());
                info!(
                    remote_addr = %remote_addr,
                    method = %ctx.method,
                    url = %url,
                    version = http_version(ctx.version),
                    status = response.status.as_u16(),
                    content_length,
                    "request"
                );
            }
        }
    }
}

fn http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/?",
    }
}
