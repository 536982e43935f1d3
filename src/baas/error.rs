// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors returned by the BaaS accessor.
//!
//! Supabase reports "no such row" and "already registered" as free text, and
//! the wording is what clients have always been matched against. The typed
//! variants are filled in from HTTP status and PostgREST codes where possible;
//! the `is_*` helpers fall back to the provider's message text.

use reqwest::StatusCode;
use serde_json::Value;

/// PostgREST code for "JSON object requested, multiple (or no) rows returned".
const PGRST_NO_SINGLE_ROW: &str = "PGRST116";
/// Postgres unique violation.
const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum BaasError {
    #[error("Supabase configuration missing: {0}")]
    Config(String),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("Supabase response was invalid: {0}")]
    InvalidResponse(String),
}

impl BaasError {
    /// Classify a non-success response from Supabase.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let message = parsed
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status.to_string()
                } else {
                    trimmed.to_string()
                }
            });
        let code = parsed
            .as_ref()
            .and_then(|v| v.get("code"))
            .and_then(Value::as_str);

        match (status, code) {
            // A bare 404 (missing table, wrong base path) is a deployment
            // fault, not a missing row.
            (_, Some(PGRST_NO_SINGLE_ROW)) => BaasError::NotFound(message),
            (_, Some(PG_UNIQUE_VIOLATION)) | (StatusCode::CONFLICT, _) => {
                BaasError::Conflict(message)
            }
            (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => {
                BaasError::Unauthorized(message)
            }
            _ => BaasError::Service {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// The provider said the row does not exist.
    pub fn is_not_found(&self) -> bool {
        if matches!(self, BaasError::NotFound(_)) {
            return true;
        }
        let text = self.to_string();
        text.contains("Cannot coerce") || text.contains("0 rows")
    }

    /// Sign-up was refused because the email already has an account.
    pub fn is_already_registered(&self) -> bool {
        self.to_string().to_lowercase().contains("already registered")
    }

    /// Sign-in was refused for bad credentials.
    pub fn is_invalid_credentials(&self) -> bool {
        self.to_string().to_lowercase().contains("invalid")
    }
}

impl From<reqwest::Error> for BaasError {
    fn from(e: reqwest::Error) -> Self {
        BaasError::Transport(format!("Supabase request failed: {e}"))
    }
}

/// GoTrue uses `msg` / `error_description`, PostgREST uses `message`.
fn extract_message(body: &Value) -> Option<String> {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
