// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Middleware modules (authentication, security, scheduler checks).

pub mod auth;
pub mod jobs_auth;
pub mod security;

pub use auth::{optional_auth, require_auth};
pub use jobs_auth::require_scheduler;
