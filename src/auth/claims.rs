// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supabase JWT claims and the identity extracted from them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role Supabase assigns to signed-in users.
pub const DEFAULT_ROLE: &str = "authenticated";

/// Claims read from a Supabase access token.
///
/// Only the claims the API uses are modelled; everything else in the payload
/// (`aud`, `exp`, `app_metadata`, ...) is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseClaims {
    /// Subject (Supabase auth user id)
    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Postgres role (`authenticated`, `anon`, `service_role`)
    #[serde(default)]
    pub role: Option<String>,
}

/// The caller, as identified by their bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Supabase user id (`sub` claim); also the profile row id.
    pub user_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub role: String,
}

impl AuthenticatedUser {
    /// Build from decoded claims. Returns `None` when there is no usable subject.
    pub fn from_claims(claims: SupabaseClaims) -> Option<Self> {
        let user_id = claims.sub.filter(|sub| !sub.is_empty())?;

        Some(Self {
            user_id,
            email: claims.email,
            role: claims.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        })
    }
}
