// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::classify::classify_handler;
use crate::classifier::{Classifier, ClassifierConfig};
use crate::config::{ServerConfig, MULTIPART_OVERHEAD_BYTES};
use crate::vision::{Feature, VisionConfig, VisionProvider};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub vision_provider: Arc<dyn VisionProvider>,
    pub classifier: Arc<Classifier>,
    /// Features requested for every image
    pub features: Arc<Vec<Feature>>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        vision_provider: Arc<dyn VisionProvider>,
        classifier_config: ClassifierConfig,
        vision_config: &VisionConfig,
        server_config: &ServerConfig,
    ) -> Self {
        Self {
            vision_provider,
            classifier: Arc::new(Classifier::new(classifier_config)),
            features: Arc::new(vision_config.features()),
            max_upload_bytes: server_config.max_upload_bytes,
        }
    }

    /// State with default settings around the given provider
    pub fn new_for_test(vision_provider: Arc<dyn VisionProvider>) -> Self {
        Self::new(
            vision_provider,
            ClassifierConfig::default(),
            &VisionConfig::default(),
            &ServerConfig::default(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub version_number: String,
    pub features: Vec<String>,
    pub provider: String,
    pub provider_available: bool,
    pub category_priority: String,
}

pub fn create_app(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/", post(classify_handler))
        .route("/v1/classify", post(classify_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(state: Arc<AppState>, config: &ServerConfig) -> Result<()> {
    let addr = config.socket_addr().map_err(anyhow::Error::msg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Image classifier listening on {}", listener.local_addr()?);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::version::VERSION.to_string(),
        version_number: crate::version::VERSION_NUMBER.to_string(),
        features: crate::version::FEATURES
            .iter()
            .map(|f| f.to_string())
            .collect(),
        provider: state.vision_provider.name().to_string(),
        provider_available: state.vision_provider.is_available(),
        category_priority: state.classifier.config().priority.to_string(),
    })
}
