// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Identifies the caller from a Supabase access token.
//!
//! ## Auth Flow
//!
//! 1. Frontend signs the user in through `/api/auth/login` (Supabase GoTrue)
//! 2. Frontend sends `Authorization: Bearer <Supabase JWT>`
//! 3. This server:
//!    - Decodes the JWT payload (no signature check, see [`inspector`])
//!    - Extracts `sub` → `user_id`, `email`, `role`
//!
//! ## Security
//!
//! - Missing, non-bearer or undecodable tokens are rejected with 401
//! - Tokens without a subject are rejected with 401
//! - Signature and expiry are **not** verified here; Supabase does that

pub mod claims;
pub mod error;
pub mod extractor;
pub mod inspector;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::{Auth, OptionalBearer};
pub use inspector::inspect_token;
