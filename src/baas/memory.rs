// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory [`Baas`] used by handler and router tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{AuthOutcome, AuthSession, AuthUser, Baas, BaasError, Filter};

#[derive(Default)]
struct Inner {
    /// email -> (user id, password)
    accounts: HashMap<String, (String, String)>,
    tables: HashMap<String, Vec<Value>>,
    reset_requests: Vec<String>,
    sign_outs: Vec<Option<String>>,
    calls: usize,
    next_id: usize,
}

/// Accounts and rows kept in a mutex. Every verb bumps a call counter so
/// tests can assert that a request never reached the backend.
#[derive(Default)]
pub struct InMemoryBaas {
    inner: Mutex<Inner>,
    /// Every verb fails with this error when set.
    failure: Mutex<Option<String>>,
    /// When false, sign-up returns the user without a session.
    auto_confirm: bool,
}

impl InMemoryBaas {
    pub fn new() -> Self {
        Self {
            auto_confirm: true,
            ..Self::default()
        }
    }

    /// Sign-up leaves the session empty, as with email confirmation enabled.
    pub fn requiring_confirmation() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a service error carrying `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    pub fn register(&self, email: &str, password: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = format!("user-{}", inner.next_id);
        inner
            .accounts
            .insert(email.to_string(), (id.clone(), password.to_string()));
        id
    }

    pub fn seed(&self, table: &str, row: Value) {
        let mut inner = self.inner.lock().unwrap();
        inner.tables.entry(table.to_string()).or_default().push(row);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        let inner = self.inner.lock().unwrap();
        inner.tables.get(table).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }

    pub fn reset_requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().reset_requests.clone()
    }

    pub fn sign_outs(&self) -> Vec<Option<String>> {
        self.inner.lock().unwrap().sign_outs.clone()
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, Inner>, BaasError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(BaasError::Service {
                status: 500,
                message,
            });
        }
        Ok(inner)
    }
}

fn token_for(id: &str) -> String {
    format!("token-{id}")
}

#[async_trait]
impl Baas for InMemoryBaas {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthOutcome, BaasError> {
        let mut inner = self.begin()?;
        if inner.accounts.contains_key(email) {
            return Err(BaasError::Service {
                status: 422,
                message: "User already registered".into(),
            });
        }
        inner.next_id += 1;
        let id = format!("user-{}", inner.next_id);
        inner
            .accounts
            .insert(email.to_string(), (id.clone(), password.to_string()));

        let session = self.auto_confirm.then(|| AuthSession {
            access_token: token_for(&id),
        });
        Ok(AuthOutcome {
            user: Some(AuthUser {
                id,
                email: Some(email.to_string()),
            }),
            session,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, BaasError> {
        let inner = self.begin()?;
        match inner.accounts.get(email) {
            Some((id, stored)) if stored == password => Ok(AuthOutcome {
                user: Some(AuthUser {
                    id: id.clone(),
                    email: Some(email.to_string()),
                }),
                session: Some(AuthSession {
                    access_token: token_for(id),
                }),
            }),
            _ => Err(BaasError::Service {
                status: 400,
                message: "Invalid login credentials".into(),
            }),
        }
    }

    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), BaasError> {
        let mut inner = self.begin()?;
        inner.sign_outs.push(access_token.map(str::to_string));
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), BaasError> {
        let mut inner = self.begin()?;
        inner.reset_requests.push(email.to_string());
        Ok(())
    }

    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, BaasError> {
        let inner = self.begin()?;
        Ok(inner
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filters.iter().all(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, BaasError> {
        let mut inner = self.begin()?;
        inner
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(vec![row])
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, BaasError> {
        let mut inner = self.begin()?;
        let Some(patch) = patch.as_object() else {
            return Err(BaasError::Service {
                status: 400,
                message: "patch must be an object".into(),
            });
        };

        let mut updated = Vec::new();
        for row in inner.tables.entry(table.to_string()).or_default() {
            if !filters.iter().all(|f| f.matches(row)) {
                continue;
            }
            if let Some(fields) = row.as_object_mut() {
                for (key, value) in patch {
                    fields.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, BaasError> {
        let mut inner = self.begin()?;
        let rows = inner.tables.entry(table.to_string()).or_default();
        let (deleted, kept): (Vec<Value>, Vec<Value>) = rows
            .drain(..)
            .partition(|row| filters.iter().all(|f| f.matches(row)));
        *rows = kept;
        Ok(deleted)
    }
}
