// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Google Vision provider tests against a local fake endpoint
//!
//! These tests verify that the provider:
//! - Posts a single-image batch to `/v1/images:annotate`
//! - Sends the API key as the `key` query parameter
//! - Parses label, object, face and web annotations
//! - Maps error statuses and per-image errors to `VisionError`

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use fabstir_image_classifier::vision::{
    AnnotateImageRequest, FeatureType, GoogleVisionProvider, Likelihood, VisionAuth,
    VisionConfig, VisionError, VisionProvider,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Request as seen by the fake endpoint
#[derive(Debug, Clone)]
struct SeenRequest {
    path: String,
    query: Option<String>,
    authorization: Option<String>,
    body: serde_json::Value,
}

#[derive(Clone)]
struct FakeVision {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakeVision {
    fn new(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

async fn fake_annotate(
    State(fake): State<FakeVision>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    fake.seen.lock().unwrap().push(SeenRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    if let Some(delay) = fake.delay {
        tokio::time::sleep(delay).await;
    }

    (
        fake.status,
        [(header::CONTENT_TYPE, "application/json")],
        fake.body.clone(),
    )
        .into_response()
}

/// Serve the fake on an ephemeral port and return its base URL
async fn spawn_fake(fake: FakeVision) -> String {
    // `images:annotate` is not a valid route pattern, so answer everything
    let app = Router::new().fallback(fake_annotate).with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn api_key_provider(endpoint: &str) -> GoogleVisionProvider {
    GoogleVisionProvider::new(endpoint, VisionAuth::ApiKey("test-key".to_string()), 5).unwrap()
}

fn sample_request() -> AnnotateImageRequest {
    AnnotateImageRequest::new("dGVzdA==".to_string(), VisionConfig::default().features())
}

const COW_RESPONSE: &str = r#"{
  "responses": [{
    "labelAnnotations": [
      {"mid": "/m/01xq0k1", "description": "Cattle", "score": 0.97, "topicality": 0.97},
      {"mid": "/m/0ch_cf", "description": "Pasture", "score": 0.91, "topicality": 0.91}
    ],
    "localizedObjectAnnotations": [
      {"mid": "/m/01xq0k1", "name": "Cattle", "score": 0.88,
       "boundingPoly": {"normalizedVertices": [{"x": 0.1, "y": 0.2}, {"x": 0.8, "y": 0.2},
                                               {"x": 0.8, "y": 0.9}, {"x": 0.1, "y": 0.9}]}}
    ],
    "faceAnnotations": [
      {"joyLikelihood": "VERY_UNLIKELY", "sorrowLikelihood": "UNLIKELY",
       "surpriseLikelihood": "POSSIBLE", "angerLikelihood": "VERY_UNLIKELY",
       "detectionConfidence": 0.42}
    ],
    "webDetection": {
      "webEntities": [{"entityId": "/m/01xq0k1", "score": 1.2, "description": "Cattle"}],
      "bestGuessLabels": [{"label": "dairy cow", "languageCode": "en"}]
    }
  }]
}"#;

#[tokio::test]
async fn test_annotate_sends_api_key_and_batch_body() {
    let fake = FakeVision::new(StatusCode::OK, COW_RESPONSE);
    let endpoint = spawn_fake(fake.clone()).await;
    let provider = api_key_provider(&endpoint);

    provider.annotate(&sample_request()).await.unwrap();

    let seen = fake.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/v1/images:annotate");
    assert_eq!(seen[0].query.as_deref(), Some("key=test-key"));
    assert!(seen[0].authorization.is_none());

    let requests = seen[0].body["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["image"]["content"], "dGVzdA==");

    let features: Vec<_> = requests[0]["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        features,
        vec![
            "LABEL_DETECTION",
            "FACE_DETECTION",
            "OBJECT_LOCALIZATION",
            "WEB_DETECTION"
        ]
    );
    assert_eq!(requests[0]["features"][0]["maxResults"], 15);
    assert_eq!(requests[0]["features"][3]["maxResults"], 5);
}

#[tokio::test]
async fn test_annotate_parses_response() {
    let endpoint = spawn_fake(FakeVision::new(StatusCode::OK, COW_RESPONSE)).await;
    let provider = api_key_provider(&endpoint);

    let result = provider.annotate(&sample_request()).await.unwrap();

    assert_eq!(result.label_annotations.len(), 2);
    assert_eq!(result.label_annotations[0].description, "Cattle");
    assert_eq!(result.localized_object_annotations[0].name, "Cattle");
    assert_eq!(
        result.localized_object_annotations[0]
            .bounding_poly
            .as_ref()
            .map(|poly| poly.normalized_vertices.len()),
        Some(4)
    );

    let face = &result.face_annotations[0];
    assert_eq!(face.joy_likelihood, Likelihood::VeryUnlikely);
    assert_eq!(face.surprise_likelihood, Likelihood::Possible);
    assert!(!face.surprise_likelihood.is_likely());

    let web = result.web_detection.as_ref().unwrap();
    assert_eq!(web.best_guess_labels[0].label, "dairy cow");
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_annotate_missing_sections_default_to_empty() {
    let endpoint = spawn_fake(FakeVision::new(StatusCode::OK, r#"{"responses": [{}]}"#)).await;
    let provider = api_key_provider(&endpoint);

    let result = provider.annotate(&sample_request()).await.unwrap();
    assert!(result.label_annotations.is_empty());
    assert!(result.localized_object_annotations.is_empty());
    assert!(result.face_annotations.is_empty());
    assert!(result.web_detection.is_none());
}

#[tokio::test]
async fn test_annotate_forbidden_is_credentials_error() {
    let body = r#"{"error": {"code": 403, "message": "API key not valid."}}"#;
    let endpoint = spawn_fake(FakeVision::new(StatusCode::FORBIDDEN, body)).await;

    let err = api_key_provider(&endpoint)
        .annotate(&sample_request())
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::Credentials(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_annotate_rate_limited() {
    let endpoint = spawn_fake(FakeVision::new(StatusCode::TOO_MANY_REQUESTS, "{}")).await;

    let err = api_key_provider(&endpoint)
        .annotate(&sample_request())
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::RateLimited));
}

#[tokio::test]
async fn test_annotate_server_error() {
    let endpoint = spawn_fake(FakeVision::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"error": {"code": 500, "message": "backend"}}"#,
    ))
    .await;

    let err = api_key_provider(&endpoint)
        .annotate(&sample_request())
        .await
        .unwrap_err();
    match err {
        VisionError::Api { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("backend"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_annotate_per_image_error() {
    let body = r#"{"responses": [{"error": {"code": 3, "message": "Bad image data."}}]}"#;
    let endpoint = spawn_fake(FakeVision::new(StatusCode::OK, body)).await;

    let err = api_key_provider(&endpoint)
        .annotate(&sample_request())
        .await
        .unwrap_err();
    match err {
        VisionError::Annotation { code, message } => {
            assert_eq!(code, 3);
            assert_eq!(message, "Bad image data.");
        }
        other => panic!("expected Annotation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_annotate_empty_responses() {
    let endpoint = spawn_fake(FakeVision::new(StatusCode::OK, r#"{"responses": []}"#)).await;

    let err = api_key_provider(&endpoint)
        .annotate(&sample_request())
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_annotate_malformed_json() {
    let endpoint = spawn_fake(FakeVision::new(StatusCode::OK, "not json")).await;

    let err = api_key_provider(&endpoint)
        .annotate(&sample_request())
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_annotate_timeout() {
    let mut fake = FakeVision::new(StatusCode::OK, COW_RESPONSE);
    fake.delay = Some(Duration::from_secs(3));
    let endpoint = spawn_fake(fake).await;

    let provider =
        GoogleVisionProvider::new(&endpoint, VisionAuth::ApiKey("k".to_string()), 1).unwrap();
    let err = provider.annotate(&sample_request()).await.unwrap_err();
    assert!(
        matches!(err, VisionError::Timeout { timeout_secs: 1 }),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn test_feature_kinds_round_trip_config() {
    let config = VisionConfig {
        label_max_results: 7,
        web_max_results: 2,
        ..Default::default()
    };
    let features = config.features();
    assert_eq!(features[0].kind, FeatureType::LabelDetection);
    assert_eq!(features[0].max_results, Some(7));
    assert_eq!(features[3].kind, FeatureType::WebDetection);
    assert_eq!(features[3].max_results, Some(2));
}
