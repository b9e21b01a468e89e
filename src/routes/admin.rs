// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Admin routes: role management, user statistics, content administration.
//!
//! Every handler re-checks the caller's CURRENT role with one profile read;
//! the role claim in the session token is never trusted for admin
//! operations because tokens are not revoked on role change.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ContentItem, Role, UserStatsReport, Visibility};
use crate::routes::content::ContentItemResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Admin routes (require authentication via JWT; admin status is checked
/// per-handler against the stored profile).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/roles/assign", post(assign_role))
        .route("/admin/roles/remove", post(remove_admin_role))
        .route("/admin/stats", get(get_user_stats))
        .route("/admin/content/{kind}", post(upsert_content))
        .route("/admin/content/{kind}/{lang}/{id}", delete(delete_content))
}

/// One fresh document read deciding whether the caller is an admin.
async fn require_admin_profile(state: &AppState, caller_uid: &str) -> Result<()> {
    let caller = state
        .db
        .get_user(caller_uid)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    if caller.role != Role::Admin {
        return Err(AppError::PermissionDenied(
            "Admin role required".to_string(),
        ));
    }
    Ok(())
}

// ─── Role Management ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct AssignRoleRequest {
    pub uid: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct RemoveAdminRequest {
    pub uid: String,
}

/// Role-change response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RoleChangeResponse {
    pub uid: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub role: Role,
    pub permissions: Vec<String>,
}

/// Assign a role to a user.
async fn assign_role(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<RoleChangeResponse>> {
    let role = Role::parse(&req.role)
        .ok_or_else(|| AppError::InvalidArgument(format!("Unknown role '{}'", req.role)))?;

    let updated = state.roles.assign_role(&user.uid, &req.uid, role).await?;

    Ok(Json(RoleChangeResponse {
        uid: updated.uid,
        role: updated.role,
        permissions: updated.permissions,
    }))
}

/// Remove a user's admin role, falling back to the subscription-implied
/// role.
async fn remove_admin_role(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RemoveAdminRequest>,
) -> Result<Json<RoleChangeResponse>> {
    let updated = state.roles.remove_admin(&user.uid, &req.uid).await?;

    Ok(Json(RoleChangeResponse {
        uid: updated.uid,
        role: updated.role,
        permissions: updated.permissions,
    }))
}

// ─── User Statistics ─────────────────────────────────────────

/// Full-scan user statistics.
async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserStatsReport>> {
    require_admin_profile(&state, &user.uid).await?;

    let report = state.stats.user_stats(chrono::Utc::now()).await?;

    Ok(Json(report))
}

// ─── Content Administration ──────────────────────────────────

#[derive(Deserialize)]
pub struct UpsertContentRequest {
    pub lang: String,
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub body: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub visibility: Visibility,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

/// Create or overwrite a content item.
async fn upsert_content(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(kind): Path<String>,
    Json(req): Json<UpsertContentRequest>,
) -> Result<Json<ContentItemResponse>> {
    require_admin_profile(&state, &user.uid).await?;

    let kind = crate::models::ContentKind::parse(&kind)
        .ok_or_else(|| AppError::InvalidArgument(format!("Unknown content kind '{}'", kind)))?;
    let lang = crate::models::Language::parse(&req.lang)
        .ok_or_else(|| AppError::InvalidArgument(format!("Unsupported language '{}'", req.lang)))?;

    if req.id.trim().is_empty() {
        return Err(AppError::InvalidArgument(
            "Content id must not be empty".to_string(),
        ));
    }

    let now = chrono::Utc::now();
    let item = ContentItem {
        id: req.id,
        title: req.title,
        summary: req.summary,
        body: req.body,
        image_url: req.image_url,
        visibility: req.visibility,
        is_premium: req.is_premium,
        published: req.published,
        created_at: now,
        updated_at: now,
    };

    let stored = state.content.upsert(kind, lang, item).await?;

    Ok(Json(ContentItemResponse::from(stored)))
}

/// Delete response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteContentResponse {
    pub success: bool,
}

/// Delete a content item.
async fn delete_content(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((kind, lang, id)): Path<(String, String, String)>,
) -> Result<Json<DeleteContentResponse>> {
    require_admin_profile(&state, &user.uid).await?;

    let kind = crate::models::ContentKind::parse(&kind)
        .ok_or_else(|| AppError::InvalidArgument(format!("Unknown content kind '{}'", kind)))?;
    let lang = crate::models::Language::parse(&lang)
        .ok_or_else(|| AppError::InvalidArgument(format!("Unsupported language '{}'", lang)))?;

    state.content.delete(kind, lang, &id).await?;

    Ok(Json(DeleteContentResponse { success: true }))
}
