//! Authentication integration tests.
//!
//! Tests verify:
//! - Valid tokens reach the handlers
//! - Missing, malformed and wrong tokens get the fixed 401 on every route
//! - 401 bodies never leak detail, in any environment

use axum::http::StatusCode;

use super::test_utils::{bearer, get, production_router, test_router, TEST_TOKEN};

const UNAUTHORIZED_BODY: &[u8] = br#"{"error":"Unauthorized request"}"#;

const ROUTES: [&str; 5] = [
    "/types",
    "/pokemon",
    "/pokemon?name=char&type=Fire",
    "/berries",
    "/",
];

// =============================================================================
// Valid Tokens
// =============================================================================

#[tokio::test]
async fn test_valid_token_succeeds() {
    let response = get(test_router(), "/types", Some(&bearer())).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_any_scheme_word_is_accepted() {
    let header = format!("Token {}", TEST_TOKEN);
    let response = get(test_router(), "/pokemon", Some(&header)).await;
    assert_eq!(response.status, StatusCode::OK);
}

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn test_missing_header_rejected_on_every_route() {
    for uri in ROUTES {
        let response = get(test_router(), uri, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "uri: {}", uri);
        assert_eq!(response.body, UNAUTHORIZED_BODY, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_wrong_token_rejected_on_every_route() {
    for uri in ROUTES {
        let response = get(test_router(), uri, Some("Bearer not-the-token")).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "uri: {}", uri);
        assert_eq!(response.body, UNAUTHORIZED_BODY, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_token_without_scheme_rejected() {
    let response = get(test_router(), "/types", Some(TEST_TOKEN)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_extra_parts_rejected() {
    let header = format!("Bearer {} extra", TEST_TOKEN);
    let response = get(test_router(), "/types", Some(&header)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_comparison_is_case_sensitive() {
    let header = format!("Bearer {}", TEST_TOKEN.to_uppercase());
    let response = get(test_router(), "/types", Some(&header)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_header_rejected() {
    let response = get(test_router(), "/types", Some("")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthorized_body_same_in_production() {
    let response = get(production_router(), "/pokemon", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, UNAUTHORIZED_BODY);
}

#[tokio::test]
async fn test_unauthorized_response_is_json() {
    let response = get(test_router(), "/types", None).await;
    assert_eq!(
        response.headers.get("content-type").unwrap(),
        "application/json; charset=utf-8"
    );
}
