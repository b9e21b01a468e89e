// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Subscription-expiry sweep.
//!
//! Runs once a day, driven by Cloud Scheduler through `/jobs/*`. The query
//! pages past the backend's default page size, so large result sets are
//! fully processed; all downgrades for a sweep are collected first and then
//! written in transactional batches.

use chrono::{DateTime, Utc};

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::UserProfile;

/// Query page size for the sweep scan.
const SWEEP_PAGE_SIZE: u32 = 300;

/// Counters reported by one sweep run.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct SweepOutcome {
    /// Profiles returned by the lapsed-subscription query
    pub scanned: u32,
    /// Profiles actually downgraded
    pub expired: u32,
}

/// Subscription lifecycle operations backed by Firestore.
#[derive(Clone)]
pub struct SubscriptionService {
    db: FirestoreDb,
}

impl SubscriptionService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Downgrade every non-admin profile whose active or trial subscription
    /// ended before `now`.
    pub async fn expire_lapsed(&self, now: DateTime<Utc>) -> Result<SweepOutcome> {
        let mut outcome = SweepOutcome::default();
        let mut to_expire: Vec<UserProfile> = Vec::new();
        let mut offset = 0u32;

        loop {
            let page = self
                .db
                .list_lapsed_subscriptions_page(now, offset, SWEEP_PAGE_SIZE)
                .await?;
            let page_len = page.len() as u32;
            outcome.scanned += page_len;

            to_expire.extend(collect_candidates(page, now));

            if page_len < SWEEP_PAGE_SIZE {
                break;
            }
            offset += page_len;
        }

        if to_expire.is_empty() {
            tracing::info!(scanned = outcome.scanned, "Expiry sweep found nothing to do");
            return Ok(outcome);
        }

        outcome.expired = to_expire.len() as u32;
        self.db.batch_update_users(&to_expire).await?;

        tracing::info!(
            scanned = outcome.scanned,
            expired = outcome.expired,
            "Expiry sweep complete"
        );

        Ok(outcome)
    }
}

/// Select and downgrade the profiles a sweep should touch.
///
/// The query only matches on the end-date inequality; status and role
/// filtering happen here.
fn collect_candidates(page: Vec<UserProfile>, now: DateTime<Utc>) -> Vec<UserProfile> {
    page.into_iter()
        .filter(|p| p.is_expiry_candidate(now))
        .map(|mut p| {
            p.expire_subscription(now);
            p
        })
        .collect()
}
