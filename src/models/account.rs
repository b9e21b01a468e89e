// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Authentication account records and custom claims.

use crate::models::user::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key/value pairs attached to an account and consulted by authorization
/// checks. Copied into session tokens at mint time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomClaims {
    pub role: Role,
    pub admin: bool,
}

impl CustomClaims {
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            admin: role == Role::Admin,
        }
    }
}

/// Authentication account stored in Firestore (`accounts/{uid}`).
///
/// Holds the credential hash and custom claims; everything user-facing lives
/// on the profile document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Stable user id (also used as document ID, shared with the profile)
    pub uid: String,
    /// Email address, unique across accounts (looked up by query)
    pub email: String,
    /// Argon2 password hash (PHC string format)
    pub password_hash: String,
    pub claims: CustomClaims,
    pub created_at: DateTime<Utc>,
}
