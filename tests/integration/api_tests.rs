//! API endpoint integration tests.
//!
//! Tests verify:
//! - `/types` returns the fixed type list
//! - `/pokemon` filtering by name, type, and both
//! - Unknown routes fall through to an empty 404
//! - Responses are deterministic

use axum::http::{header, StatusCode};

use pokedex_api::TYPE_TAGS;

use super::test_utils::{get_authorized, test_router};

// =============================================================================
// Types
// =============================================================================

#[tokio::test]
async fn test_types_returns_fixed_list() {
    let response = get_authorized(test_router(), "/types").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        serde_json::json!([
            "Bug", "Dark", "Dragon", "Electric", "Fairy", "Fighting", "Fire", "Flying", "Ghost",
            "Grass", "Ground", "Ice", "Normal", "Poison", "Psychic", "Rock", "Steel", "Water"
        ])
    );
}

#[tokio::test]
async fn test_types_ignores_query_string() {
    let response = get_authorized(test_router(), "/types?name=char&type=Fire").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json().as_array().unwrap().len(), TYPE_TAGS.len());
}

#[tokio::test]
async fn test_json_content_type() {
    let response = get_authorized(test_router(), "/types").await;

    assert_eq!(
        response.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json; charset=utf-8"
    );
}

// =============================================================================
// Pokemon
// =============================================================================

#[tokio::test]
async fn test_pokemon_without_filters_returns_everything() {
    let response = get_authorized(test_router(), "/pokemon").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.names(),
        [
            "Bulbasaur",
            "Charmander",
            "Charmeleon",
            "Charizard",
            "Squirtle",
            "Pidgey",
            "Vulpix",
            "CHARJABUG"
        ]
    );
}

#[tokio::test]
async fn test_pokemon_records_pass_through_unchanged() {
    let response = get_authorized(test_router(), "/pokemon?name=squirtle").await;

    let body = String::from_utf8(response.body).unwrap();
    assert_eq!(
        body,
        r#"[{"id":7,"num":"007","name":"Squirtle","type":["Water"],"weight":"9.0 kg"}]"#
    );
}

#[tokio::test]
async fn test_pokemon_name_filter_is_case_insensitive() {
    let expected = ["Charmander", "Charmeleon", "Charizard", "CHARJABUG"];

    let response = get_authorized(test_router(), "/pokemon?name=char").await;
    assert_eq!(response.names(), expected);

    let response = get_authorized(test_router(), "/pokemon?name=ChAr").await;
    assert_eq!(response.names(), expected);
}

#[tokio::test]
async fn test_pokemon_empty_name_matches_everything() {
    let response = get_authorized(test_router(), "/pokemon?name=").await;
    assert_eq!(response.names().len(), 8);
}

#[tokio::test]
async fn test_pokemon_type_filter() {
    let response = get_authorized(test_router(), "/pokemon?type=Fire").await;

    assert_eq!(
        response.names(),
        ["Charmander", "Charmeleon", "Charizard", "Vulpix"]
    );
}

#[tokio::test]
async fn test_pokemon_type_filter_is_case_sensitive() {
    let response = get_authorized(test_router(), "/pokemon?type=fire").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.names().is_empty());
}

#[tokio::test]
async fn test_pokemon_secondary_type_matches() {
    let response = get_authorized(test_router(), "/pokemon?type=Flying").await;
    assert_eq!(response.names(), ["Charizard", "Pidgey"]);
}

#[tokio::test]
async fn test_pokemon_empty_type_is_ignored() {
    let response = get_authorized(test_router(), "/pokemon?type=").await;
    assert_eq!(response.names().len(), 8);
}

#[tokio::test]
async fn test_pokemon_name_and_type() {
    let response = get_authorized(test_router(), "/pokemon?name=char&type=Fire").await;

    assert_eq!(
        response.names(),
        ["Charmander", "Charmeleon", "Charizard"]
    );
}

#[tokio::test]
async fn test_pokemon_filter_order_does_not_matter() {
    let a = get_authorized(test_router(), "/pokemon?name=char&type=Fire").await;
    let b = get_authorized(test_router(), "/pokemon?type=Fire&name=char").await;
    assert_eq!(a.body, b.body);
}

#[tokio::test]
async fn test_pokemon_encoded_query() {
    let response = get_authorized(test_router(), "/pokemon?name=%43HAR&type=F%69re").await;
    assert_eq!(
        response.names(),
        ["Charmander", "Charmeleon", "Charizard"]
    );
}

#[tokio::test]
async fn test_pokemon_no_matches_is_empty_array() {
    let response = get_authorized(test_router(), "/pokemon?name=mewtwo").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"[]");
}

#[tokio::test]
async fn test_identical_requests_identical_bodies() {
    let router = test_router();

    let first = get_authorized(router.clone(), "/pokemon?name=a&type=Fire").await;
    let second = get_authorized(router, "/pokemon?name=a&type=Fire").await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn test_unknown_route_is_empty_404() {
    let response = get_authorized(test_router(), "/berries").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_route_paths_are_exact() {
    for uri in ["/types/", "/Types", "/pokemon/1", "/"] {
        let response = get_authorized(test_router(), uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_wrong_method_is_404() {
    use super::test_utils::{bearer, send};
    use axum::body::Body;
    use axum::http::{Method, Request};

    let request = Request::builder()
        .method(Method::POST)
        .uri("/pokemon")
        .header(header::AUTHORIZATION, bearer())
        .body(Body::empty())
        .unwrap();

    let response = send(test_router(), request).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
