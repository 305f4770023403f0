// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Parser;
use fabstir_image_classifier::{
    api::{start_server, AppState},
    cli::Cli,
    vision::{GoogleVisionProvider, VisionProvider},
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    info!(
        "Starting Fabstir Image Classifier {} (built {})",
        fabstir_image_classifier::version::VERSION,
        fabstir_image_classifier::version::BUILD_DATE
    );
    info!(
        "Features: {}",
        fabstir_image_classifier::version::FEATURES.join(", ")
    );

    let server_config = cli.server_config();
    server_config.validate().map_err(|e| anyhow!(e))?;

    let vision_config = cli.vision_config();
    vision_config.validate().map_err(|e| anyhow!(e))?;

    let classifier_config = cli.classifier_config();

    let provider = GoogleVisionProvider::from_config(&vision_config)?;
    info!(
        "Vision provider: {} at {} (available: {})",
        provider.name(),
        provider.endpoint(),
        provider.is_available()
    );

    let state = AppState::new(
        Arc::new(provider),
        classifier_config,
        &vision_config,
        &server_config,
    );

    info!(
        "Classifier category priority: {}",
        state.classifier.config().priority
    );

    start_server(Arc::new(state), &server_config).await
}
