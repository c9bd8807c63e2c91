//! Shared helpers for integration tests.

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pokedex_api::{create_router, Dataset, Environment, RouterConfig};

pub const TEST_TOKEN: &str = "3b1f6a52-1c7e-4e0b-9a55-2f7c3d9e8a10";

/// Small Pokédex with enough overlap to exercise both filters.
///
/// `CHARJABUG` is upper-cased on purpose to exercise case-insensitive names.
pub const TEST_POKEDEX: &str = r#"{
    "pokemon": [
        {"id": 1, "num": "001", "name": "Bulbasaur", "type": ["Grass", "Poison"], "weight": "6.9 kg"},
        {"id": 4, "num": "004", "name": "Charmander", "type": ["Fire"], "weight": "8.5 kg"},
        {"id": 5, "num": "005", "name": "Charmeleon", "type": ["Fire"], "weight": "19.0 kg"},
        {"id": 6, "num": "006", "name": "Charizard", "type": ["Fire", "Flying"], "weight": "90.5 kg"},
        {"id": 7, "num": "007", "name": "Squirtle", "type": ["Water"], "weight": "9.0 kg"},
        {"id": 16, "num": "016", "name": "Pidgey", "type": ["Normal", "Flying"], "weight": "1.8 kg"},
        {"id": 37, "num": "037", "name": "Vulpix", "type": ["Fire"], "weight": "9.9 kg"},
        {"id": 736, "num": "736", "name": "CHARJABUG", "type": ["Bug", "Electric"], "weight": "10.5 kg"}
    ]
}"#;

pub fn test_dataset() -> Dataset {
    Dataset::from_json_str(TEST_POKEDEX).unwrap()
}

pub fn test_config() -> RouterConfig {
    RouterConfig::new(TEST_TOKEN).with_tracing(false)
}

pub fn test_router() -> Router {
    create_router(test_dataset(), test_config())
}

pub fn production_router() -> Router {
    create_router(
        test_dataset(),
        test_config().with_environment(Environment::Production),
    )
}

pub fn bearer() -> String {
    format!("Bearer {}", TEST_TOKEN)
}

/// A collected response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// The `name` of every record in a `/pokemon` response.
    pub fn names(&self) -> Vec<String> {
        self.json()
            .as_array()
            .unwrap()
            .iter()
            .map(|record| record["name"].as_str().unwrap().to_string())
            .collect()
    }
}

pub async fn send(router: Router, request: Request<Body>) -> TestResponse {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        headers,
        body: body.to_vec(),
    }
}

/// GET `uri` with an optional raw `Authorization` header.
pub async fn get(router: Router, uri: &str, authorization: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    send(router, builder.body(Body::empty()).unwrap()).await
}

/// GET `uri` with a valid token.
pub async fn get_authorized(router: Router, uri: &str) -> TestResponse {
    get(router, uri, Some(&bearer())).await
}
