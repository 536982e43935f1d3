// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! small config structs built from them. A `.env` file, if present, is loaded
//! by `main` before anything here is read.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SUPABASE_URL` | Supabase project base URL | Required at first Supabase call |
//! | `SUPABASE_ANON_KEY` | Supabase API key | Required at first Supabase call |
//! | `SUPABASE_JWT_SECRET` | JWT secret (unused, tokens are not verified here) | Optional |
//! | `SUPABASE_TIMEOUT_SECS` | HTTP timeout towards Supabase | `15` |
//! | `CORS_ORIGINS` | Extra allowed origins, comma separated | none |
//! | `FRONTEND_URL` | Deployed frontend origin | none |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

use crate::baas::BaasError;

pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
pub const SUPABASE_JWT_SECRET_ENV: &str = "SUPABASE_JWT_SECRET";
pub const SUPABASE_TIMEOUT_ENV: &str = "SUPABASE_TIMEOUT_SECS";
pub const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";
pub const FRONTEND_URL_ENV: &str = "FRONTEND_URL";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Local frontend dev servers that are always allowed to call the API.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:5174",
];

/// Connection settings for the Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://<ref>.supabase.co`.
    pub url: url::Url,
    /// Anon (public) API key.
    pub api_key: String,
    /// Request timeout for every call to Supabase.
    pub timeout: Duration,
}

impl SupabaseConfig {
    /// Read the Supabase settings from the environment.
    ///
    /// Fails with [`BaasError::Config`] when the URL or key is missing, or the
    /// URL does not parse.
    pub fn from_env() -> Result<Self, BaasError> {
        let raw_url = env_required(SUPABASE_URL_ENV)?;
        let api_key = env_required(SUPABASE_ANON_KEY_ENV)?;
        let timeout_secs = env_optional(SUPABASE_TIMEOUT_ENV)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(&raw_url, api_key, Duration::from_secs(timeout_secs))
    }

    pub fn new(
        raw_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BaasError> {
        let url = url::Url::parse(raw_url.trim())
            .map_err(|e| BaasError::Config(format!("{SUPABASE_URL_ENV} is invalid: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BaasError::Config(format!(
                "{SUPABASE_URL_ENV} must be an http(s) URL"
            )));
        }
        Ok(Self {
            url,
            api_key: api_key.into(),
            timeout,
        })
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Only reported at startup; bearer tokens are decoded, not verified.
    pub jwt_secret_configured: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = env_or_default(HOST_ENV, DEFAULT_HOST);
        let port = env_optional(PORT_ENV)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            host,
            port,
            cors_origins: cors_origins(
                env_optional(CORS_ORIGINS_ENV).as_deref(),
                env_optional(FRONTEND_URL_ENV).as_deref(),
            ),
            jwt_secret_configured: env_optional(SUPABASE_JWT_SECRET_ENV).is_some(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Default dev origins plus any configured extras, without duplicates.
pub fn cors_origins(extra: Option<&str>, frontend_url: Option<&str>) -> Vec<String> {
    let mut origins: Vec<String> = DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect();

    let extras = extra
        .unwrap_or_default()
        .split(',')
        .chain(frontend_url)
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty());

    for origin in extras {
        if !origins.iter().any(|o| o == origin) {
            origins.push(origin.to_string());
        }
    }
    origins
}

fn env_required(name: &str) -> Result<String, BaasError> {
    env_optional(name).ok_or_else(|| BaasError::Config(format!("{name} is not set")))
}

fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
