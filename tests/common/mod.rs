#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;

use cogplay_backend::adaptive::AdaptiveConfig;

pub fn create_test_app() -> Router {
    create_test_app_with(AdaptiveConfig::default())
}

pub fn create_test_app_with(config: AdaptiveConfig) -> Router {
    cogplay_backend::create_app(config).expect("test config is valid")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
