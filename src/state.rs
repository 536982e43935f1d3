// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::baas::{Baas, LazySupabase};
use crate::repository::ProfileRepository;

#[derive(Clone)]
pub struct AppState {
    pub baas: Arc<dyn Baas>,
}

impl AppState {
    pub fn new(baas: Arc<dyn Baas>) -> Self {
        Self { baas }
    }

    /// State backed by the process-wide Supabase handle, configured from the
    /// environment on first use.
    pub fn from_env() -> Self {
        Self::new(Arc::new(LazySupabase::from_env()))
    }

    pub fn profiles(&self) -> ProfileRepository<'_> {
        ProfileRepository::new(self.baas.as_ref())
    }
}
