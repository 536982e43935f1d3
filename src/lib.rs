// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! StudentLink API - backend for the StudentLink link-in-bio app
//!
//! A thin HTTP layer in front of Supabase: authentication is delegated to
//! GoTrue and profiles live in a PostgREST table.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Bearer token extraction and claim decoding
//! - `baas` - Supabase accessor behind the `Baas` trait
//! - `repository` - Profile table operations

pub mod api;
pub mod auth;
pub mod baas;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod state;
