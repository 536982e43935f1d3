// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to Supabase tables.
//!
//! Each repository wraps the generic table verbs of [`crate::baas::Baas`]
//! for one table, turning JSON rows into typed records.

pub mod profiles;

pub use profiles::{NewProfile, ProfileRepository, PROFILES_TABLE};
