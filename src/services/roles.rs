// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Role assignment and removal.
//!
//! The admin check is one fresh profile read of the caller; session tokens
//! carry the role only as a hint, since they are never revoked on role
//! change. A role change is two independent writes (custom claims, then
//! profile) with no rollback. Both are idempotent overwrites, so a retry
//! converges.

use chrono::Utc;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{CustomClaims, Role, UserProfile};

/// Role management backed by Firestore.
#[derive(Clone)]
pub struct RoleService {
    db: FirestoreDb,
}

impl RoleService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Assign a role to a user. Caller must currently hold the admin role.
    pub async fn assign_role(
        &self,
        caller_uid: &str,
        target_uid: &str,
        role: Role,
    ) -> Result<UserProfile> {
        self.require_admin(caller_uid).await?;
        self.apply_role(target_uid, role).await
    }

    /// Remove a user's admin role, falling back to whatever their
    /// subscription still implies. Caller must currently hold admin.
    pub async fn remove_admin(&self, caller_uid: &str, target_uid: &str) -> Result<UserProfile> {
        self.require_admin(caller_uid).await?;

        let target = self
            .db
            .get_user(target_uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", target_uid)))?;

        let new_role = Role::implied_by(target.subscription.as_ref());
        self.apply_role(target_uid, new_role).await
    }

    /// Overwrite a user's role with no caller check.
    ///
    /// Operator entry point for the admin CLI, which runs with service
    /// credentials rather than a session.
    pub async fn set_role_unchecked(&self, target_uid: &str, role: Role) -> Result<UserProfile> {
        self.apply_role(target_uid, role).await
    }

    /// One document read deciding whether the caller may manage roles.
    async fn require_admin(&self, caller_uid: &str) -> Result<()> {
        let caller = self
            .db
            .get_user(caller_uid)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        if caller.role != Role::Admin {
            return Err(AppError::PermissionDenied(
                "Only admins can manage roles".to_string(),
            ));
        }
        Ok(())
    }

    /// The two-write role change: claims first, then profile.
    async fn apply_role(&self, target_uid: &str, role: Role) -> Result<UserProfile> {
        let mut target = self
            .db
            .get_user(target_uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", target_uid)))?;

        // Write 1: custom claims on the account.
        self.db
            .set_custom_claims(target_uid, &CustomClaims::for_role(role))
            .await?;

        // Write 2: profile role + derived permissions. If this fails the
        // claims write stands; the error is surfaced so the caller retries.
        target.role = role;
        target.permissions = role.permissions();
        target.updated_at = Utc::now();

        if let Err(e) = self.db.upsert_user(&target).await {
            tracing::error!(
                uid = target_uid,
                role = role.as_str(),
                error = %e,
                "Claims updated but profile write failed; role change incomplete"
            );
            return Err(e);
        }

        tracing::info!(uid = target_uid, role = role.as_str(), "Role updated");

        Ok(target)
    }
}
