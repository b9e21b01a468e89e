//! User statistics report computed by a full collection scan.
//!
//! There is no incremental maintenance: the admin stats endpoint and the
//! CLI both rebuild the report from every user document, O(n) per call.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::UserProfile;

/// Window for the "recent signups" counter.
const RECENT_SIGNUP_DAYS: i64 = 7;

/// Aggregate counts over all user profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsReport {
    /// Total number of user profiles scanned
    pub total_users: u32,
    /// User count per role ("admin", "subscriber", ...)
    #[serde(default)]
    pub by_role: HashMap<String, u32>,
    /// User count per subscription status; users without a subscription
    /// are counted under "none"
    #[serde(default)]
    pub by_subscription_status: HashMap<String, u32>,
    /// Profiles created within the last 7 days
    pub new_last_7_days: u32,
    /// When the report was computed (ISO 8601)
    pub generated_at: DateTime<Utc>,
}

impl UserStatsReport {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            total_users: 0,
            by_role: HashMap::new(),
            by_subscription_status: HashMap::new(),
            new_last_7_days: 0,
            generated_at: now,
        }
    }

    /// Fold one profile into the report.
    pub fn tally(&mut self, profile: &UserProfile, now: DateTime<Utc>) {
        self.total_users += 1;

        *self
            .by_role
            .entry(profile.role.as_str().to_string())
            .or_insert(0) += 1;

        let status = profile
            .subscription
            .as_ref()
            .map(|s| s.status.as_str())
            .unwrap_or("none");
        *self
            .by_subscription_status
            .entry(status.to_string())
            .or_insert(0) += 1;

        if now.signed_duration_since(profile.created_at) <= Duration::days(RECENT_SIGNUP_DAYS) {
            self.new_last_7_days += 1;
        }
    }
}
