// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use studentlink_api::{api::router, config::ServerConfig, logging::init_tracing, state::AppState};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Local runs pick up SUPABASE_URL etc. from .env when present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ServerConfig::from_env();
    if config.jwt_secret_configured {
        info!("SUPABASE_JWT_SECRET is set; bearer tokens are still decoded without verification");
    } else {
        warn!("SUPABASE_JWT_SECRET is not set");
    }

    // Supabase settings are read on the first request that needs them.
    let state = AppState::from_env();
    let app = router(state, &config.cors_origins);

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!(%addr, origins = ?config.cors_origins, "StudentLink API listening (docs at /docs)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
