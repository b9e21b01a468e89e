// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Signup and login routes.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::Role;
use crate::AppState;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session issued after signup or login.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub token: String,
    pub uid: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub role: Role,
}

/// Create an account with a free-tier profile and sign the user in.
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SessionResponse>> {
    req.validate()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    let profile = state
        .accounts
        .create_user(&req.email, &req.password, &req.display_name, Role::Free)
        .await?;

    let token = create_jwt(&profile.uid, profile.role, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(uid = %profile.uid, "Signup complete");

    Ok(Json(SessionResponse {
        token,
        uid: profile.uid,
        role: profile.role,
    }))
}

/// Verify credentials and mint a session token.
///
/// The role claim is copied from the account's custom claims at mint time.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let account = state.accounts.verify_login(&req.email, &req.password).await?;

    let token = create_jwt(
        &account.uid,
        account.claims.role,
        &state.config.jwt_signing_key,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(uid = %account.uid, "Login successful");

    Ok(Json(SessionResponse {
        token,
        uid: account.uid,
        role: account.claims.role,
    }))
}
