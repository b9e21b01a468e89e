// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Scheduler-origin check for `/jobs/*` routes.
//!
//! These endpoints are invoked by Cloud Scheduler, never by users. Cloud Run
//! strips the scheduler header from external requests, so its presence
//! guarantees internal origin; we additionally pin the job name.

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};

const SCHEDULER_HEADER: &str = "x-cloudscheduler-jobname";

/// Reject `/jobs/*` requests that did not come from our scheduler job.
pub async fn require_scheduler(request: Request, next: Next) -> Result<Response, StatusCode> {
    let job_header = request.headers().get(SCHEDULER_HEADER);
    let is_valid_job = job_header
        .and_then(|h| h.to_str().ok())
        .map(|name| name == crate::config::SCHEDULER_JOB_NAME)
        .unwrap_or(false);

    if !is_valid_job {
        tracing::warn!(
            header = ?job_header,
            "Blocked jobs request with invalid scheduler header"
        );
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}
