// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Profile endpoints.
//!
//! The public page lookup needs no authentication. Everything under
//! `/api/profile/` acts on the caller's own row, keyed by the token subject.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::{
    auth::Auth,
    baas::BaasError,
    error::{ApiError, AppJson},
    models::{MessageResponse, ProfileCreate, ProfilePublic, ProfileResponse, ProfileUpdate},
    repository::NewProfile,
    state::AppState,
};

const PROFILE_NOT_FOUND: &str = "Profile not found";
const OWN_PROFILE_NOT_FOUND: &str = "Profile not found. Please create one first.";
const USERNAME_TAKEN: &str = "Username already taken";

/// Map a lookup failure, treating Supabase's "no row" signals as 404.
fn lookup_error(not_found_message: &'static str) -> impl Fn(BaasError) -> ApiError {
    move |e| {
        if e.is_not_found() {
            ApiError::not_found(not_found_message)
        } else {
            ApiError::from(e)
        }
    }
}

/// Get a public profile by username.
#[utoipa::path(
    get,
    path = "/api/profile/{username}",
    tag = "Profile",
    params(("username" = String, Path, description = "Public handle")),
    responses(
        (status = 200, description = "Public profile", body = ProfilePublic),
        (status = 404, description = "No such username"),
        (status = 500, description = "Supabase error"),
    )
)]
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfilePublic>, ApiError> {
    let record = state
        .profiles()
        .find_by_username(&username)
        .await
        .map_err(lookup_error(PROFILE_NOT_FOUND))?
        .ok_or_else(|| ApiError::not_found(PROFILE_NOT_FOUND))?;

    Ok(Json(record.into()))
}

/// Get the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/profile/me/current",
    tag = "Profile",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Own profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No profile yet"),
        (status = 500, description = "Supabase error"),
    )
)]
pub async fn get_my_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let record = state
        .profiles()
        .find_by_id(&user.user_id)
        .await
        .map_err(lookup_error(OWN_PROFILE_NOT_FOUND))?
        .ok_or_else(|| ApiError::not_found(OWN_PROFILE_NOT_FOUND))?;

    Ok(Json(record.into()))
}

/// Create the authenticated user's profile.
#[utoipa::path(
    post,
    path = "/api/profile/",
    tag = "Profile",
    security(("bearer" = [])),
    request_body = ProfileCreate,
    responses(
        (status = 200, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "Username taken or profile already exists"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Supabase error"),
    )
)]
pub async fn create_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
    AppJson(request): AppJson<ProfileCreate>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profiles = state.profiles();

    if profiles.username_taken(&request.username, None).await? {
        info!(user_id = %user.user_id, username = %request.username, "Username already taken");
        return Err(ApiError::bad_request(USERNAME_TAKEN));
    }
    if profiles.exists(&user.user_id).await? {
        return Err(ApiError::bad_request(
            "Profile already exists. Use PUT to update.",
        ));
    }

    let record = profiles
        .create(&NewProfile::new(user.user_id.as_str(), request))
        .await?
        .ok_or_else(|| ApiError::internal("Failed to create profile"))?;

    info!(user_id = %user.user_id, username = %record.username, "Profile created");
    Ok(Json(record.into()))
}

/// Update the authenticated user's profile. Only supplied fields change.
#[utoipa::path(
    put,
    path = "/api/profile/",
    tag = "Profile",
    security(("bearer" = [])),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Nothing to update or username taken"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No profile yet"),
        (status = 500, description = "Supabase error"),
    )
)]
pub async fn update_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
    AppJson(request): AppJson<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let new_username = request.username.clone();
    let patch = request.into_patch();
    if patch.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let profiles = state.profiles();
    if let Some(username) = new_username {
        if profiles.username_taken(&username, Some(&user.user_id)).await? {
            info!(user_id = %user.user_id, username = %username, "Username already taken");
            return Err(ApiError::bad_request(USERNAME_TAKEN));
        }
    }

    let record = profiles
        .update(&user.user_id, patch)
        .await
        .map_err(lookup_error(PROFILE_NOT_FOUND))?
        .ok_or_else(|| ApiError::not_found(PROFILE_NOT_FOUND))?;

    Ok(Json(record.into()))
}

/// Delete the authenticated user's profile. Succeeds even if there was none.
#[utoipa::path(
    delete,
    path = "/api/profile/",
    tag = "Profile",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Supabase error"),
    )
)]
pub async fn delete_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state.profiles().delete(&user.user_id).await?;
    info!(user_id = %user.user_id, deleted, "Profile deleted");

    Ok(Json(MessageResponse::ok("Profile deleted successfully")))
}
