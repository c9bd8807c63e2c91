//! Route handlers for the Pokédex API.
//!
//! # Endpoints
//!
//! - `GET /types` - The fixed list of type tags
//! - `GET /pokemon?name=&type=` - Records filtered by name and type

use http::StatusCode;
use tracing::debug;

use super::pipeline::{ApiResponse, RequestContext};
use crate::dataset::{Dataset, TYPE_TAGS};
use crate::error::PipelineError;

/// Handler for `GET /types`.
///
/// Ignores the query string.
pub fn types_handler(
    _dataset: &Dataset,
    _ctx: &RequestContext,
) -> Result<ApiResponse, PipelineError> {
    ApiResponse::json(StatusCode::OK, &TYPE_TAGS)
}

/// Handler for `GET /pokemon`.
///
/// `name` is matched case-insensitively against record names, `type` is
/// matched case-sensitively against the record's type list. Both are
/// substring matches and combine with AND. Results keep dataset order.
pub fn pokemon_handler(
    dataset: &Dataset,
    ctx: &RequestContext,
) -> Result<ApiResponse, PipelineError> {
    let query = ctx.query.to_creature_query();
    let matches = dataset.query(&query);

    debug!(
        name = ?query.name,
        type_tag = ?query.type_tag,
        matched = matches.len(),
        total = dataset.len(),
        "Pokemon query"
    );

    ApiResponse::json(StatusCode::OK, &matches)
}
