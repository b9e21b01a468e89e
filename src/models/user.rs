//! User profile, roles, and subscription state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named capability strings gating feature access.
pub mod permissions {
    pub const READ_PUBLIC: &str = "content:read:public";
    pub const READ_PREMIUM: &str = "content:read:premium";
    pub const WRITE_CONTENT: &str = "content:write";
    pub const MANAGE_USERS: &str = "users:manage";
    pub const READ_STATS: &str = "stats:read";
}

/// User role, determining the static permission list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Subscriber,
    Trial,
    Free,
}

impl Role {
    /// The permission list granted by this role.
    ///
    /// Profiles always store exactly this derived set; nothing edits the
    /// permission list directly.
    pub fn permissions(&self) -> Vec<String> {
        use permissions::*;
        let perms: &[&str] = match self {
            Role::Free => &[READ_PUBLIC],
            Role::Trial | Role::Subscriber => &[READ_PUBLIC, READ_PREMIUM],
            Role::Admin => &[
                READ_PUBLIC,
                READ_PREMIUM,
                WRITE_CONTENT,
                MANAGE_USERS,
                READ_STATS,
            ],
        };
        perms.iter().map(|p| p.to_string()).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Subscriber => "subscriber",
            Role::Trial => "trial",
            Role::Free => "free",
        }
    }

    /// Parse a role name as given on the command line or in a request body.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "subscriber" => Some(Role::Subscriber),
            "trial" => Some(Role::Trial),
            "free" => Some(Role::Free),
            _ => None,
        }
    }

    /// The role implied by a subscription's current state.
    ///
    /// Used when an admin role is removed: the user falls back to whatever
    /// their subscription still entitles them to.
    pub fn implied_by(subscription: Option<&Subscription>) -> Role {
        match subscription.map(|s| s.status) {
            Some(SubscriptionStatus::Active) => Role::Subscriber,
            Some(SubscriptionStatus::Trial) => Role::Trial,
            _ => Role::Free,
        }
    }
}

/// Subscription plan type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Monthly,
    Yearly,
}

/// Subscription lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Trial,
    Expired,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

/// Subscription state, embedded in the user profile.
///
/// The profile document is the single source of truth; there is no
/// separate subscriptions collection to drift out of sync with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub plan: PlanType,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub auto_renew: bool,
    pub last_payment_at: Option<DateTime<Utc>>,
    pub next_payment_at: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Whether this subscription has run past its end date while still in a
    /// counting state (active or trial).
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.status,
            SubscriptionStatus::Active | SubscriptionStatus::Trial
        ) && self.end_date < now
    }
}

/// User profile stored in Firestore (`users/{uid}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable user id (also used as document ID)
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    /// Flat permission list derived from `role`
    pub permissions: Vec<String>,
    /// Embedded subscription state (None for users who never subscribed)
    pub subscription: Option<Subscription>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Fresh free-tier profile, as auto-provisioned on first sign-in.
    pub fn free_tier(uid: &str, email: &str, display_name: &str, now: DateTime<Utc>) -> Self {
        Self {
            uid: uid.to_string(),
            display_name: display_name.to_string(),
            email: email.to_string(),
            avatar_url: None,
            role: Role::Free,
            permissions: Role::Free.permissions(),
            subscription: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the expiry sweep should downgrade this profile.
    ///
    /// Admins are never demoted by the sweep, even with a lapsed
    /// subscription.
    pub fn is_expiry_candidate(&self, now: DateTime<Utc>) -> bool {
        self.role != Role::Admin
            && self
                .subscription
                .as_ref()
                .is_some_and(|sub| sub.is_lapsed(now))
    }

    /// Apply the downgrade the expiry sweep performs: role to free,
    /// permissions to the free set, subscription marked expired.
    pub fn expire_subscription(&mut self, now: DateTime<Utc>) {
        self.role = Role::Free;
        self.permissions = Role::Free.permissions();
        if let Some(sub) = self.subscription.as_mut() {
            sub.status = SubscriptionStatus::Expired;
            sub.auto_renew = false;
            sub.next_payment_at = None;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn subscription(status: SubscriptionStatus, ends_in_days: i64) -> Subscription {
        let now = Utc::now();
        Subscription {
            plan: PlanType::Monthly,
            status,
            start_date: now - Duration::days(30),
            end_date: now + Duration::days(ends_in_days),
            auto_renew: true,
            last_payment_at: Some(now - Duration::days(30)),
            next_payment_at: Some(now + Duration::days(ends_in_days)),
        }
    }

    fn profile(role: Role, sub: Option<Subscription>) -> UserProfile {
        let now = Utc::now();
        let mut p = UserProfile::free_tier("u1", "parent@example.com", "Test Parent", now);
        p.role = role;
        p.permissions = role.permissions();
        p.subscription = sub;
        p
    }

    #[test]
    fn free_tier_profile_has_free_permissions() {
        let p = UserProfile::free_tier("u1", "a@b.c", "A", Utc::now());
        assert_eq!(p.role, Role::Free);
        assert_eq!(p.permissions, vec![permissions::READ_PUBLIC.to_string()]);
        assert!(p.subscription.is_none());
    }

    #[test]
    fn admin_permissions_are_superset() {
        let admin = Role::Admin.permissions();
        for p in Role::Subscriber.permissions() {
            assert!(admin.contains(&p));
        }
        assert!(admin.contains(&permissions::MANAGE_USERS.to_string()));
    }

    #[test]
    fn lapsed_active_subscription_is_candidate() {
        let now = Utc::now();
        let p = profile(
            Role::Subscriber,
            Some(subscription(SubscriptionStatus::Active, -1)),
        );
        assert!(p.is_expiry_candidate(now));
    }

    #[test]
    fn current_subscription_is_not_candidate() {
        let now = Utc::now();
        let p = profile(
            Role::Subscriber,
            Some(subscription(SubscriptionStatus::Active, 10)),
        );
        assert!(!p.is_expiry_candidate(now));
    }

    #[test]
    fn admin_is_never_candidate() {
        let now = Utc::now();
        let p = profile(
            Role::Admin,
            Some(subscription(SubscriptionStatus::Trial, -5)),
        );
        assert!(!p.is_expiry_candidate(now));
    }

    #[test]
    fn profile_without_subscription_is_not_candidate() {
        let now = Utc::now();
        let p = profile(Role::Free, None);
        assert!(!p.is_expiry_candidate(now));
    }

    #[test]
    fn already_expired_subscription_is_not_candidate() {
        let now = Utc::now();
        let p = profile(
            Role::Free,
            Some(subscription(SubscriptionStatus::Expired, -30)),
        );
        assert!(!p.is_expiry_candidate(now));
    }

    #[test]
    fn expire_subscription_downgrades_in_place() {
        let now = Utc::now();
        let mut p = profile(
            Role::Subscriber,
            Some(subscription(SubscriptionStatus::Active, -1)),
        );

        p.expire_subscription(now);

        assert_eq!(p.role, Role::Free);
        assert_eq!(p.permissions, Role::Free.permissions());
        let sub = p.subscription.as_ref().unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Expired);
        assert!(!sub.auto_renew);
        assert!(sub.next_payment_at.is_none());
    }

    #[test]
    fn implied_role_follows_subscription_state() {
        assert_eq!(
            Role::implied_by(Some(&subscription(SubscriptionStatus::Active, 10))),
            Role::Subscriber
        );
        assert_eq!(
            Role::implied_by(Some(&subscription(SubscriptionStatus::Trial, 5))),
            Role::Trial
        );
        assert_eq!(
            Role::implied_by(Some(&subscription(SubscriptionStatus::Expired, -5))),
            Role::Free
        );
        assert_eq!(Role::implied_by(None), Role::Free);
    }

    #[test]
    fn role_parse_round_trips() {
        for role in [Role::Admin, Role::Subscriber, Role::Trial, Role::Free] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }
}
