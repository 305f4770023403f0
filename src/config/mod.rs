// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server configuration

use std::net::{IpAddr, SocketAddr};

use crate::vision::image_utils::MAX_IMAGE_SIZE;

/// Slack on top of the upload limit for multipart boundaries and headers
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum accepted image size in bytes
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Socket address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| format!("Invalid host '{}': {}", self.host, e))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.socket_addr()?;
        if self.max_upload_bytes == 0 {
            return Err("Max upload size must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: MAX_IMAGE_SIZE,
        }
    }
}
