// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Content service: localized fetch with visibility filtering, and admin
//! upserts.
//!
//! Filtering is a serving convenience, not a security boundary; premium
//! bodies are not otherwise protected.

use chrono::Utc;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{ContentItem, ContentKind, Language, Role};

/// Query page size when scanning a content collection.
const CONTENT_PAGE_SIZE: u32 = 100;

/// Upper bound on documents scanned per fetch, so a huge collection cannot
/// turn one request into an unbounded walk.
const MAX_SCANNED: u32 = 2000;

/// Content access backed by Firestore.
#[derive(Clone)]
pub struct ContentService {
    db: FirestoreDb,
}

impl ContentService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Fetch a page of items the viewer may see, newest first.
    ///
    /// `viewer` is None for anonymous callers. `offset` counts visible
    /// items, not stored documents.
    pub async fn fetch_visible(
        &self,
        kind: ContentKind,
        lang: Language,
        viewer: Option<Role>,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<ContentItem>> {
        let wanted = (offset + limit) as usize;
        let mut visible: Vec<ContentItem> = Vec::new();
        let mut scan_offset = 0u32;

        while visible.len() < wanted && scan_offset < MAX_SCANNED {
            let page = self
                .db
                .list_content_page(kind, lang, scan_offset, CONTENT_PAGE_SIZE)
                .await?;
            let page_len = page.len() as u32;

            visible.extend(page.into_iter().filter(|item| item.visible_to(viewer)));

            if page_len < CONTENT_PAGE_SIZE {
                break;
            }
            scan_offset += page_len;
        }

        Ok(visible
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    /// Fetch one item, honoring the viewer's visibility.
    pub async fn fetch_one(
        &self,
        kind: ContentKind,
        lang: Language,
        id: &str,
        viewer: Option<Role>,
    ) -> Result<ContentItem> {
        let item = self
            .db
            .get_content(kind, lang, id)
            .await?
            .filter(|item| item.visible_to(viewer))
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", kind.as_str(), id)))?;
        Ok(item)
    }

    /// Create or overwrite a content item, stamping timestamps.
    ///
    /// An existing item keeps its creation time.
    pub async fn upsert(
        &self,
        kind: ContentKind,
        lang: Language,
        mut item: ContentItem,
    ) -> Result<ContentItem> {
        let now = Utc::now();
        if let Some(existing) = self.db.get_content(kind, lang, &item.id).await? {
            item.created_at = existing.created_at;
        } else {
            item.created_at = now;
        }
        item.updated_at = now;

        self.db.upsert_content(kind, lang, &item).await?;

        tracing::info!(
            kind = kind.as_str(),
            lang = lang.as_str(),
            id = %item.id,
            "Content upserted"
        );

        Ok(item)
    }

    /// Delete a content item. Deleting a missing item is not an error.
    pub async fn delete(&self, kind: ContentKind, lang: Language, id: &str) -> Result<()> {
        self.db.delete_content(kind, lang, id).await?;
        tracing::info!(
            kind = kind.as_str(),
            lang = lang.as_str(),
            id,
            "Content deleted"
        );
        Ok(())
    }
}
