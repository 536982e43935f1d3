// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token inspection.
//!
//! ## Security
//!
//! Tokens are decoded **without** signature or expiry verification. Supabase
//! issued and validated the token before the client received it, and every
//! table call is authorised again by Supabase itself. This API never holds
//! the signing secret, so this is identity *extraction*, not verification: a
//! forged token yields whatever `sub` it claims. Do not expose these routes
//! anywhere that trust boundary does not hold.

use super::{claims::SupabaseClaims, AuthError, AuthenticatedUser};

/// Decode `token` and extract `{user_id, email, role}`.
pub fn inspect_token(token: &str) -> Result<AuthenticatedUser, AuthError> {
    let token_data = jsonwebtoken::dangerous::insecure_decode::<SupabaseClaims>(token.trim())
        .map_err(|e| AuthError::MalformedToken(e.to_string()))?;

    AuthenticatedUser::from_claims(token_data.claims).ok_or(AuthError::MissingSubject)
}
