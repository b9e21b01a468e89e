// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Account service: signup, login verification, profile provisioning,
//! and account deletion.
//!
//! Every new account gets a free-tier profile provisioned alongside it;
//! there is no path that creates one without the other.

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use chrono::Utc;
use rand::rngs::OsRng;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Account, CustomClaims, Role, UserProfile};

const MIN_PASSWORD_LEN: usize = 8;

/// Account management backed by Firestore.
#[derive(Clone)]
pub struct AccountService {
    db: FirestoreDb,
}

impl AccountService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Create an account and its profile.
    ///
    /// The account is written first; the profile write is the provisioning
    /// step. A duplicate email is rejected before anything is written.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<UserProfile> {
        validate_password(password)?;

        if self.db.find_account_by_email(email).await?.is_some() {
            return Err(AppError::InvalidArgument(format!(
                "An account already exists for {}",
                email
            )));
        }

        let uid = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        let account = Account {
            uid: uid.clone(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            claims: CustomClaims::for_role(role),
            created_at: now,
        };
        self.db.upsert_account(&account).await?;

        let mut profile = UserProfile::free_tier(&uid, email, display_name, now);
        profile.role = role;
        profile.permissions = role.permissions();
        self.db.upsert_user(&profile).await?;

        tracing::info!(uid = %uid, email = %email, role = role.as_str(), "User created");

        Ok(profile)
    }

    /// Verify credentials, returning the account on success.
    ///
    /// Both unknown email and bad password map to unauthenticated so the
    /// response does not reveal which one failed.
    pub async fn verify_login(&self, email: &str, password: &str) -> Result<Account> {
        let account = self
            .db
            .find_account_by_email(email)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        if !verify_password(password, &account.password_hash) {
            return Err(AppError::Unauthenticated);
        }

        Ok(account)
    }

    /// Delete a user's account and profile (the per-collection cascade).
    ///
    /// Returns the number of documents deleted; 0 means the user was
    /// already gone.
    pub async fn delete_user(&self, uid: &str) -> Result<usize> {
        self.db.delete_user_data(uid).await
    }
}

/// Hash a password with argon2 and a fresh OS-random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored PHC hash string.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidArgument(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
