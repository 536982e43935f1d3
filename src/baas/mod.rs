// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Backend-as-a-Service Accessor
//!
//! All persistence and authentication lives in Supabase. This module exposes
//! the handful of verb-shaped calls the API needs:
//!
//! - auth verbs against GoTrue (`/auth/v1`): sign up, sign in, sign out,
//!   send password reset
//! - table verbs against PostgREST (`/rest/v1`): select, insert, update and
//!   delete rows filtered by column predicates
//!
//! Handlers depend on the [`Baas`] trait only. Production wiring uses
//! [`LazySupabase`], which builds a single [`SupabaseClient`] on first use.

pub mod error;
pub mod lazy;
#[cfg(test)]
pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

pub use error::BaasError;
pub use lazy::LazySupabase;
pub use supabase::SupabaseClient;

/// A user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A session issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
}

/// Result of a sign-up or sign-in call.
///
/// Sign-up leaves `session` empty while email confirmation is pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthOutcome {
    pub user: Option<AuthUser>,
    pub session: Option<AuthSession>,
}

/// Column predicate for table verbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq(String, String),
    Neq(String, String),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq(column.into(), value.into())
    }

    pub fn neq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Neq(column.into(), value.into())
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(column, _) | Filter::Neq(column, _) => column,
        }
    }

    /// PostgREST operator form, e.g. `eq.alice`.
    pub fn operand(&self) -> String {
        match self {
            Filter::Eq(_, value) => format!("eq.{value}"),
            Filter::Neq(_, value) => format!("neq.{value}"),
        }
    }

    /// Whether a stored row satisfies this predicate.
    ///
    /// Non-string columns are compared through their JSON text form, the same
    /// way PostgREST compares query-string values.
    pub fn matches(&self, row: &Value) -> bool {
        let cell = row.get(self.column()).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        match self {
            Filter::Eq(_, value) => cell.as_deref() == Some(value.as_str()),
            Filter::Neq(_, value) => cell.as_deref() != Some(value.as_str()),
        }
    }
}

/// Verb-shaped access to the external auth service and tables.
///
/// Implementations never interpret provider error text; they return a
/// [`BaasError`] and the caller decides what it means.
#[async_trait]
pub trait Baas: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthOutcome, BaasError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, BaasError>;

    /// Revoke the session behind `access_token`. Without a token there is
    /// nothing to revoke server-side.
    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), BaasError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), BaasError>;

    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, BaasError>;

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, BaasError>;

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, BaasError>;

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, BaasError>;
}
