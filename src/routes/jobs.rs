// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Scheduled-job routes, invoked by Cloud Scheduler.
//!
//! The scheduler-origin check is applied as middleware in routes/mod.rs;
//! these handlers assume internal origin.

use crate::services::SweepOutcome;
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use std::sync::Arc;

/// Job routes (scheduler only).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/jobs/expire-subscriptions", post(expire_subscriptions))
}

/// Daily subscription-expiry sweep.
///
/// Returns 500 on database failure so the scheduler's retry policy kicks
/// in; the sweep is idempotent (expired profiles stop matching the
/// candidate filter).
async fn expire_subscriptions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SweepOutcome>, StatusCode> {
    tracing::info!("Starting subscription-expiry sweep");

    match state.subscriptions.expire_lapsed(chrono::Utc::now()).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => {
            tracing::error!(error = %e, "Expiry sweep failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
