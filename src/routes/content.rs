// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Public content-fetch routes.
//!
//! Anonymous callers get the public view; a valid session token upgrades
//! visibility according to the viewer's role claim.

use crate::error::{AppError, Result};
use crate::middleware::auth::MaybeAuthUser;
use crate::models::{ContentItem, ContentKind, Language, Visibility};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_PER_PAGE: u32 = 100;

/// Content routes (optional authentication, applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/content/{kind}", get(list_content))
        .route("/content/{kind}/{lang}/{id}", get(get_content_item))
}

#[derive(Deserialize)]
struct ContentQuery {
    /// Content language (collection suffix)
    lang: Option<String>,
    /// Pagination: page number (1-indexed)
    #[serde(default = "default_page")]
    page: u32,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    20
}

/// One content item as served to clients.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ContentItemResponse {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub body: String,
    pub image_url: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub visibility: Visibility,
    pub is_premium: bool,
    pub updated_at: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ContentListResponse {
    pub items: Vec<ContentItemResponse>,
    pub page: u32,
    pub per_page: u32,
}

impl From<ContentItem> for ContentItemResponse {
    fn from(item: ContentItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            summary: item.summary,
            body: item.body,
            image_url: item.image_url,
            visibility: item.visibility,
            is_premium: item.is_premium,
            updated_at: crate::time_utils::format_utc_rfc3339(item.updated_at),
        }
    }
}

fn parse_kind(kind: &str) -> Result<ContentKind> {
    ContentKind::parse(kind)
        .ok_or_else(|| AppError::InvalidArgument(format!("Unknown content kind '{}'", kind)))
}

fn parse_lang(lang: &str) -> Result<Language> {
    Language::parse(lang)
        .ok_or_else(|| AppError::InvalidArgument(format!("Unsupported language '{}'", lang)))
}

/// List visible content, newest first.
async fn list_content(
    State(state): State<Arc<AppState>>,
    Extension(MaybeAuthUser(viewer)): Extension<MaybeAuthUser>,
    Path(kind): Path<String>,
    Query(params): Query<ContentQuery>,
) -> Result<Json<ContentListResponse>> {
    let kind = parse_kind(&kind)?;
    let lang = parse_lang(params.lang.as_deref().unwrap_or("en"))?;

    if params.page < 1 {
        return Err(AppError::InvalidArgument(
            "Page must be greater than 0".to_string(),
        ));
    }
    let per_page = params.per_page.min(MAX_PER_PAGE);
    let offset = (params.page - 1).saturating_mul(per_page);

    let viewer_role = viewer.map(|u| u.role);

    tracing::debug!(
        kind = kind.as_str(),
        lang = lang.as_str(),
        role = ?viewer_role,
        page = params.page,
        "Fetching content"
    );

    let items = state
        .content
        .fetch_visible(kind, lang, viewer_role, offset, per_page)
        .await?;

    Ok(Json(ContentListResponse {
        items: items.into_iter().map(ContentItemResponse::from).collect(),
        page: params.page,
        per_page,
    }))
}

/// Fetch a single content item, honoring visibility.
async fn get_content_item(
    State(state): State<Arc<AppState>>,
    Extension(MaybeAuthUser(viewer)): Extension<MaybeAuthUser>,
    Path((kind, lang, id)): Path<(String, String, String)>,
) -> Result<Json<ContentItemResponse>> {
    let kind = parse_kind(&kind)?;
    let lang = parse_lang(&lang)?;

    let item = state
        .content
        .fetch_one(kind, lang, &id, viewer.map(|u| u.role))
        .await?;

    Ok(Json(ContentItemResponse::from(item)))
}
