// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-wide Supabase handle, built on first use.
//!
//! The server starts without Supabase credentials; the first request that
//! needs Supabase reads the environment and either builds the client for the
//! rest of the process lifetime or fails that request with a config error.
//! A failed attempt is not cached, so fixing the environment and retrying
//! works without a restart.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::info;

use super::{AuthOutcome, Baas, BaasError, Filter, SupabaseClient};
use crate::config::SupabaseConfig;

type ConfigLoader = Box<dyn Fn() -> Result<SupabaseConfig, BaasError> + Send + Sync>;

pub struct LazySupabase {
    cell: OnceCell<SupabaseClient>,
    load: ConfigLoader,
}

impl LazySupabase {
    /// Handle that reads [`SupabaseConfig::from_env`] on first use.
    pub fn from_env() -> Self {
        Self::with_loader(SupabaseConfig::from_env)
    }

    pub fn with_loader(
        load: impl Fn() -> Result<SupabaseConfig, BaasError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            cell: OnceCell::new(),
            load: Box::new(load),
        }
    }

    /// The shared client, building it if this is the first call.
    pub fn client(&self) -> Result<&SupabaseClient, BaasError> {
        self.cell.get_or_try_init(|| {
            let config = (self.load)()?;
            info!(url = %config.url, "Supabase client initialized");
            SupabaseClient::new(config)
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[async_trait]
impl Baas for LazySupabase {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthOutcome, BaasError> {
        self.client()?.sign_up(email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, BaasError> {
        self.client()?.sign_in(email, password).await
    }

    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), BaasError> {
        self.client()?.sign_out(access_token).await
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), BaasError> {
        self.client()?.send_password_reset(email).await
    }

    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, BaasError> {
        self.client()?.select(table, filters).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, BaasError> {
        self.client()?.insert(table, row).await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, BaasError> {
        self.client()?.update(table, filters, patch).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, BaasError> {
        self.client()?.delete(table, filters).await
    }
}
