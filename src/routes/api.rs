// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Role, Subscription};
use crate::AppState;
use axum::{
    extract::State,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/subscription", get(get_subscription))
        .route("/api/account", delete(delete_account))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub role: Role,
    pub permissions: Vec<String>,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .db
        .get_user(&user.uid)
        .await?
        .ok_or_else(|| crate::error::AppError::NotFound(format!("User {} not found", user.uid)))?;

    Ok(Json(UserResponse {
        uid: profile.uid,
        display_name: profile.display_name,
        email: profile.email,
        avatar_url: profile.avatar_url,
        role: profile.role,
        permissions: profile.permissions,
    }))
}

// ─── Subscription ────────────────────────────────────────────

/// Get the current user's subscription, or null if they never had one.
async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Option<Subscription>>> {
    let profile = state
        .db
        .get_user(&user.uid)
        .await?
        .ok_or_else(|| crate::error::AppError::NotFound(format!("User {} not found", user.uid)))?;

    Ok(Json(profile.subscription))
}

// ─── Account Deletion ────────────────────────────────────────

/// Response for account deletion.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub deleted_documents: usize,
}

/// Delete the caller's account and profile.
///
/// The cascade is sequential per-collection deletes, not a transaction; a
/// profile that is already gone still gets its account record removed.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(uid = %user.uid, "User-initiated account deletion");

    let deleted = state.accounts.delete_user(&user.uid).await?;

    Ok(Json(DeleteAccountResponse {
        success: true,
        deleted_documents: deleted,
    }))
}
