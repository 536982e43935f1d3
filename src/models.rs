// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`/`Deserialize` and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! Only structural validation happens here: a body that does not match its
//! shape is rejected by the extractor before any handler runs. Business rules
//! (unique usernames, one profile per user) live in the handlers.
//!
//! ## Model Categories
//!
//! - **Profiles**: the link-in-bio page of a student
//! - **Auth**: credentials and token envelopes
//! - **Messages**: generic success envelopes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Theme used when a profile does not pick one.
pub const DEFAULT_THEME: &str = "minimal";

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_theme_opt() -> Option<String> {
    Some(default_theme())
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Profile Sub-objects
// =============================================================================

/// Social links shown on a profile.
///
/// Unset links are omitted on the wire, so `{"github": "x"}` is stored and
/// returned as exactly that.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

/// The student's capstone project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CapstoneProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// =============================================================================
// Profile Requests
// =============================================================================

/// Request to create the caller's profile.
///
/// `is_premium` is not accepted; it is always stored as `false`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileCreate {
    /// Public handle, unique across all profiles.
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub links: Option<Links>,
    #[serde(default)]
    pub capstone_project: Option<CapstoneProject>,
    /// Defaults to `minimal`.
    #[serde(default = "default_theme_opt")]
    pub theme_id: Option<String>,
}

/// Partial update of the caller's profile.
///
/// A field that is absent (or `null`) is left unchanged; an empty string is a
/// real value and is written. `is_premium` cannot be changed here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub links: Option<Links>,
    #[serde(default)]
    pub capstone_project: Option<CapstoneProject>,
    #[serde(default)]
    pub theme_id: Option<String>,
}

impl ProfileUpdate {
    /// Column/value pairs for the fields that were supplied.
    pub fn into_patch(self) -> Map<String, Value> {
        let mut patch = Map::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                patch.insert(key.to_string(), value);
            }
        };

        put("username", self.username.map(Value::String));
        put("full_name", self.full_name.map(Value::String));
        put("bio", self.bio.map(Value::String));
        put("links", self.links.map(to_json));
        put("capstone_project", self.capstone_project.map(to_json));
        put("theme_id", self.theme_id.map(Value::String));

        patch
    }
}

/// Sub-objects are plain data; serializing them cannot fail.
pub(crate) fn to_json<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| Value::Object(Map::new()))
}

// =============================================================================
// Profile Responses
// =============================================================================

/// A `profiles` row as Supabase returns it.
///
/// Columns may be `null`; conversion into the response types applies the
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileRecord {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub links: Option<Value>,
    #[serde(default)]
    pub capstone_project: Option<Value>,
    #[serde(default)]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
}

/// The caller's own profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProfileResponse {
    /// Supabase user id of the owner.
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub links: Option<Links>,
    pub capstone_project: Option<CapstoneProject>,
    pub theme_id: Option<String>,
    pub is_premium: bool,
}

impl From<ProfileRecord> for ProfileResponse {
    fn from(record: ProfileRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            full_name: record.full_name,
            bio: record.bio,
            links: record.links.and_then(|v| serde_json::from_value(v).ok()),
            capstone_project: record
                .capstone_project
                .and_then(|v| serde_json::from_value(v).ok()),
            theme_id: record.theme_id.or_else(default_theme_opt),
            is_premium: record.is_premium.unwrap_or(false),
        }
    }
}

/// Profile as shown on a public page. Never includes the owner's id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProfilePublic {
    pub username: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub links: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub capstone_project: Option<Value>,
    pub theme_id: String,
    pub is_premium: bool,
}

impl From<ProfileRecord> for ProfilePublic {
    fn from(record: ProfileRecord) -> Self {
        Self {
            username: record.username,
            full_name: record.full_name,
            bio: record.bio,
            links: record.links.filter(|v| !v.is_null()),
            capstone_project: record.capstone_project.filter(|v| !v.is_null()),
            theme_id: record.theme_id.unwrap_or_else(default_theme),
            is_premium: record.is_premium.unwrap_or(false),
        }
    }
}

// =============================================================================
// Auth Models
// =============================================================================

/// Email/password credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserAuth {
    pub email: String,
    pub password: String,
}

/// Body form of the forgot-password request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Access token issued by Supabase for the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenResponse {
    /// Empty when sign-up is waiting on email confirmation.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    pub user_id: String,
    pub email: String,
}

impl TokenResponse {
    pub fn bearer(
        access_token: impl Into<String>,
        user_id: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            user_id: user_id.into(),
            email: email.into(),
        }
    }
}

// =============================================================================
// Generic Responses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default = "default_true")]
    pub success: bool,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }
}
