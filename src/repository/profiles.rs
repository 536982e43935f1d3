// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Profile repository for the Supabase `profiles` table.
//!
//! One row per Supabase user, keyed by the user id. Uniqueness of usernames
//! and "one profile per user" are checked here before writes; the table's
//! own constraints are the only guard against two racing requests.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::baas::{Baas, BaasError, Filter};
use crate::models::{to_json, CapstoneProject, Links, ProfileCreate, ProfileRecord, DEFAULT_THEME};

pub const PROFILES_TABLE: &str = "profiles";

/// Row inserted for a new profile.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewProfile {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    /// `{}` when not supplied.
    pub links: Value,
    /// `{}` when not supplied.
    pub capstone_project: Value,
    pub theme_id: String,
    pub is_premium: bool,
}

impl NewProfile {
    /// Row for `owner_id`. Premium is never granted on creation.
    pub fn new(owner_id: impl Into<String>, request: ProfileCreate) -> Self {
        Self {
            id: owner_id.into(),
            username: request.username,
            full_name: request.full_name,
            bio: request.bio,
            links: to_json(request.links.unwrap_or_else(Links::default)),
            capstone_project: to_json(
                request
                    .capstone_project
                    .unwrap_or_else(CapstoneProject::default),
            ),
            theme_id: request
                .theme_id
                .unwrap_or_else(|| DEFAULT_THEME.to_string()),
            is_premium: false,
        }
    }
}

/// Repository for profile operations on Supabase.
pub struct ProfileRepository<'a> {
    baas: &'a dyn Baas,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(baas: &'a dyn Baas) -> Self {
        Self { baas }
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileRecord>, BaasError> {
        let rows = self
            .baas
            .select(PROFILES_TABLE, &[Filter::eq("username", username)])
            .await?;
        first_record(rows)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<ProfileRecord>, BaasError> {
        let rows = self
            .baas
            .select(PROFILES_TABLE, &[Filter::eq("id", user_id)])
            .await?;
        first_record(rows)
    }

    /// Whether a profile for `user_id` exists.
    pub async fn exists(&self, user_id: &str) -> Result<bool, BaasError> {
        let rows = self
            .baas
            .select(PROFILES_TABLE, &[Filter::eq("id", user_id)])
            .await?;
        Ok(!rows.is_empty())
    }

    /// Whether `username` belongs to any profile other than `except_user_id`'s.
    pub async fn username_taken(
        &self,
        username: &str,
        except_user_id: Option<&str>,
    ) -> Result<bool, BaasError> {
        let mut filters = vec![Filter::eq("username", username)];
        if let Some(user_id) = except_user_id {
            filters.push(Filter::neq("id", user_id));
        }
        let rows = self.baas.select(PROFILES_TABLE, &filters).await?;
        Ok(!rows.is_empty())
    }

    /// Insert and return the stored row, or `None` if Supabase returned nothing.
    pub async fn create(&self, profile: &NewProfile) -> Result<Option<ProfileRecord>, BaasError> {
        let rows = self.baas.insert(PROFILES_TABLE, to_json(profile)).await?;
        first_record(rows)
    }

    /// Apply `patch` to the profile of `user_id`; `None` when no row matched.
    pub async fn update(
        &self,
        user_id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<ProfileRecord>, BaasError> {
        let rows = self
            .baas
            .update(PROFILES_TABLE, &[Filter::eq("id", user_id)], Value::Object(patch))
            .await?;
        first_record(rows)
    }

    /// Delete the profile of `user_id`, returning how many rows went away.
    pub async fn delete(&self, user_id: &str) -> Result<usize, BaasError> {
        let rows = self
            .baas
            .delete(PROFILES_TABLE, &[Filter::eq("id", user_id)])
            .await?;
        Ok(rows.len())
    }
}

fn first_record(rows: Vec<Value>) -> Result<Option<ProfileRecord>, BaasError> {
    rows.into_iter()
        .next()
        .map(|row| {
            serde_json::from_value(row)
                .map_err(|e| BaasError::InvalidResponse(format!("unexpected profile row: {e}")))
        })
        .transpose()
}
