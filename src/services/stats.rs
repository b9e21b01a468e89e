// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! User statistics aggregation: a full collection scan per call.

use chrono::{DateTime, Utc};

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::UserStatsReport;

/// Query page size for the statistics scan.
const SCAN_PAGE_SIZE: u32 = 300;

/// Statistics queries backed by Firestore.
#[derive(Clone)]
pub struct StatsService {
    db: FirestoreDb,
}

impl StatsService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Scan every user profile and tally the report.
    pub async fn user_stats(&self, now: DateTime<Utc>) -> Result<UserStatsReport> {
        let mut report = UserStatsReport::new(now);
        let mut offset = 0u32;

        loop {
            let page = self.db.list_users_page(offset, SCAN_PAGE_SIZE).await?;
            let page_len = page.len() as u32;

            for profile in &page {
                report.tally(profile, now);
            }

            if page_len < SCAN_PAGE_SIZE {
                break;
            }
            offset += page_len;
        }

        tracing::debug!(total = report.total_users, "User statistics computed");

        Ok(report)
    }
}
