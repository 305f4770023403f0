// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod classify;
pub mod errors;
pub mod http_server;

pub use classify::{classify_handler, ImageUpload};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_app, start_server, AppState, HealthResponse};
