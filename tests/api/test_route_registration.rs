// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration tests
//!
//! Verifies that the classify routes only accept POST, that the health
//! route reports the provider, and that CORS is open to any origin.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use fabstir_image_classifier::api::http_server::create_app;
use std::sync::Arc;
use tower::util::ServiceExt;

use super::helpers::*;

#[tokio::test]
async fn test_get_on_classify_route_not_allowed() {
    for uri in ["/", "/v1/classify"] {
        let app = create_app(Arc::new(state_with(idle_provider())));
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "GET {} should not be routed",
            uri
        );
    }
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let app = create_app(Arc::new(state_with(idle_provider())));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/describe-image")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_provider() {
    let app = create_app(Arc::new(state_with(idle_provider())));
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["provider"], "mock-vision");
    assert_eq!(json["providerAvailable"], true);
    assert_eq!(
        json["version"],
        fabstir_image_classifier::version::VERSION
    );
    assert_eq!(json["versionNumber"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["categoryPriority"], "animal-first");

    let features: Vec<&str> = json["features"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f.as_str())
        .collect();
    assert_eq!(features, fabstir_image_classifier::version::FEATURES);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = create_app(Arc::new(state_with(idle_provider())));
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_cors_preflight_for_classify() {
    let app = create_app(Arc::new(state_with(idle_provider())));
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-methods"));
}
