// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication endpoints (Supabase GoTrue pass-through).
//!
//! All routes here are public. Logout and forgot-password never report a
//! failure to the client: logout is a client-side token discard, and the
//! reset response must not reveal whether an account exists.

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::IntoParams;

use crate::{
    auth::OptionalBearer,
    error::{ApiError, AppJson},
    models::{ForgotPasswordRequest, MessageResponse, TokenResponse, UserAuth},
    state::AppState,
};

pub const LOGOUT_MESSAGE: &str = "Logged out successfully";
pub const RESET_MESSAGE: &str = "If the email exists, a reset link has been sent";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ForgotPasswordQuery {
    /// Account email; may also be sent as a JSON body.
    pub email: Option<String>,
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Authentication",
    request_body = UserAuth,
    responses(
        (status = 200, description = "User registered", body = TokenResponse),
        (status = 400, description = "Signup refused by Supabase"),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(credentials): AppJson<UserAuth>,
) -> Result<Json<TokenResponse>, ApiError> {
    let outcome = state
        .baas
        .sign_up(&credentials.email, &credentials.password)
        .await
        .map_err(|e| {
            info!(error = %e, "Signup rejected");
            if e.is_already_registered() {
                ApiError::bad_request("Email already registered")
            } else {
                ApiError::bad_request(e.to_string())
            }
        })?;

    let user = outcome
        .user
        .ok_or_else(|| ApiError::bad_request("Signup failed"))?;
    let access_token = outcome
        .session
        .map(|s| s.access_token)
        .unwrap_or_default();

    Ok(Json(TokenResponse::bearer(
        access_token,
        user.id,
        user.email.unwrap_or(credentials.email),
    )))
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = UserAuth,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(credentials): AppJson<UserAuth>,
) -> Result<Json<TokenResponse>, ApiError> {
    let outcome = state
        .baas
        .sign_in(&credentials.email, &credentials.password)
        .await
        .map_err(|e| {
            info!(error = %e, "Login rejected");
            if e.is_invalid_credentials() {
                ApiError::unauthorized("Invalid email or password")
            } else {
                ApiError::unauthorized(e.to_string())
            }
        })?;

    let (Some(user), Some(session)) = (outcome.user, outcome.session) else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    Ok(Json(TokenResponse::bearer(
        session.access_token,
        user.id,
        user.email.unwrap_or(credentials.email),
    )))
}

/// Log out. The client discards its token; the session is revoked upstream
/// when a bearer token is supplied.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses((status = 200, description = "Always succeeds", body = MessageResponse))
)]
pub async fn logout(
    State(state): State<AppState>,
    OptionalBearer(token): OptionalBearer,
) -> Json<MessageResponse> {
    if let Err(e) = state.baas.sign_out(token.as_deref()).await {
        warn!(error = %e, "Supabase sign-out failed, reporting logout anyway");
    }
    Json(MessageResponse::ok(LOGOUT_MESSAGE))
}

/// Send a password reset email.
///
/// The response is identical whether or not the account exists.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Authentication",
    params(ForgotPasswordQuery),
    request_body(
        content = ForgotPasswordRequest,
        description = "Alternative to the query parameter"
    ),
    responses(
        (status = 200, description = "Generic acknowledgement", body = MessageResponse),
        (status = 422, description = "No email supplied"),
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Query(query): Query<ForgotPasswordQuery>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = query
        .email
        .filter(|e| !e.trim().is_empty())
        .or_else(|| {
            serde_json::from_slice::<ForgotPasswordRequest>(&body)
                .ok()
                .map(|r| r.email)
        })
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::unprocessable("email is required"))?;

    if let Err(e) = state.baas.send_password_reset(&email).await {
        warn!(error = %e, "Password reset request failed");
    }
    Ok(Json(MessageResponse::ok(RESET_MESSAGE)))
}
