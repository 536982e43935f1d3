// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Service banner returned at `/`.
#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct WelcomeResponse {
    pub message: String,
    /// Crate version.
    pub version: String,
    pub status: String,
    /// Path of the interactive API docs.
    pub docs: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Service banner", body = WelcomeResponse))
)]
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to StudentLink API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "healthy".to_string(),
        docs: "/docs".to_string(),
    })
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running. Supabase is not contacted.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
