// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! AppError -> HTTP response mapping tests.

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use playnest::error::AppError;

async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_unauthenticated_maps_to_401() {
    let (status, body) = response_parts(AppError::Unauthenticated).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn test_permission_denied_maps_to_403() {
    let (status, body) =
        response_parts(AppError::PermissionDenied("Admin role required".into())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "permission_denied");
    assert_eq!(body["details"], "Admin role required");
}

#[tokio::test]
async fn test_not_found_maps_to_404() {
    let (status, body) = response_parts(AppError::NotFound("User u-1 not found".into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_invalid_argument_maps_to_400() {
    let (status, body) = response_parts(AppError::InvalidArgument("bad role".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_argument");
}

#[tokio::test]
async fn test_database_error_hides_details() {
    let (status, body) = response_parts(AppError::Database("connection refused".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let (status, body) =
        response_parts(AppError::Internal(anyhow::anyhow!("secret failure"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert!(body.get("details").is_none());
}
