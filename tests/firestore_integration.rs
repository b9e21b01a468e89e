// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Firestore emulator integration tests.
//!
//! Run with the emulator: `FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test`

use chrono::{Duration, Utc};
use playnest::models::user::{PlanType, Subscription, SubscriptionStatus};
use playnest::models::Role;
use playnest::services::{AccountService, RoleService, StatsService, SubscriptionService};

mod common;

#[tokio::test]
async fn test_create_login_and_delete_user() {
    require_emulator!();
    let db = common::test_db().await;
    let accounts = AccountService::new(db.clone());

    let email = format!("it-{}@example.com", uuid::Uuid::new_v4());
    let profile = accounts
        .create_user(&email, "long enough pw", "Integration Parent", Role::Free)
        .await
        .expect("create_user should succeed");

    assert_eq!(profile.role, Role::Free);
    assert_eq!(profile.permissions, Role::Free.permissions());

    // The account verifies with the right password only
    let account = accounts
        .verify_login(&email, "long enough pw")
        .await
        .expect("login should succeed");
    assert_eq!(account.uid, profile.uid);
    assert!(accounts.verify_login(&email, "wrong password").await.is_err());

    // Cascade removes both documents
    let deleted = accounts.delete_user(&profile.uid).await.unwrap();
    assert_eq!(deleted, 2);
    assert!(db.get_user(&profile.uid).await.unwrap().is_none());
    assert!(db.get_account(&profile.uid).await.unwrap().is_none());
}

#[tokio::test]
async fn test_role_change_touches_claims_and_profile() {
    require_emulator!();
    let db = common::test_db().await;
    let accounts = AccountService::new(db.clone());
    let roles = RoleService::new(db.clone());

    let admin_email = format!("admin-{}@example.com", uuid::Uuid::new_v4());
    let admin = accounts
        .create_user(&admin_email, "long enough pw", "Admin", Role::Admin)
        .await
        .unwrap();

    let user_email = format!("user-{}@example.com", uuid::Uuid::new_v4());
    let user = accounts
        .create_user(&user_email, "long enough pw", "User", Role::Free)
        .await
        .unwrap();

    let updated = roles
        .assign_role(&admin.uid, &user.uid, Role::Subscriber)
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Subscriber);

    let stored_profile = db.get_user(&user.uid).await.unwrap().unwrap();
    assert_eq!(stored_profile.role, Role::Subscriber);
    assert_eq!(stored_profile.permissions, Role::Subscriber.permissions());

    let stored_account = db.get_account(&user.uid).await.unwrap().unwrap();
    assert_eq!(stored_account.claims.role, Role::Subscriber);
    assert!(!stored_account.claims.admin);

    // Non-admin callers are refused
    let err = roles
        .assign_role(&user.uid, &admin.uid, Role::Free)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        playnest::error::AppError::PermissionDenied(_)
    ));

    accounts.delete_user(&admin.uid).await.unwrap();
    accounts.delete_user(&user.uid).await.unwrap();
}

#[tokio::test]
async fn test_expiry_sweep_downgrades_lapsed_profiles() {
    require_emulator!();
    let db = common::test_db().await;
    let accounts = AccountService::new(db.clone());
    let subscriptions = SubscriptionService::new(db.clone());

    let now = Utc::now();

    // Lapsed subscriber
    let lapsed_email = format!("lapsed-{}@example.com", uuid::Uuid::new_v4());
    let mut lapsed = accounts
        .create_user(&lapsed_email, "long enough pw", "Lapsed", Role::Subscriber)
        .await
        .unwrap();
    lapsed.subscription = Some(Subscription {
        plan: PlanType::Monthly,
        status: SubscriptionStatus::Active,
        start_date: now - Duration::days(40),
        end_date: now - Duration::days(2),
        auto_renew: true,
        last_payment_at: None,
        next_payment_at: None,
    });
    db.upsert_user(&lapsed).await.unwrap();

    // Current subscriber, must be untouched
    let current_email = format!("current-{}@example.com", uuid::Uuid::new_v4());
    let mut current = accounts
        .create_user(&current_email, "long enough pw", "Current", Role::Subscriber)
        .await
        .unwrap();
    current.subscription = Some(Subscription {
        plan: PlanType::Yearly,
        status: SubscriptionStatus::Active,
        start_date: now - Duration::days(10),
        end_date: now + Duration::days(300),
        auto_renew: true,
        last_payment_at: None,
        next_payment_at: None,
    });
    db.upsert_user(&current).await.unwrap();

    let outcome = subscriptions.expire_lapsed(Utc::now()).await.unwrap();
    assert!(outcome.expired >= 1);

    let lapsed_after = db.get_user(&lapsed.uid).await.unwrap().unwrap();
    assert_eq!(lapsed_after.role, Role::Free);
    assert_eq!(
        lapsed_after.subscription.unwrap().status,
        SubscriptionStatus::Expired
    );

    let current_after = db.get_user(&current.uid).await.unwrap().unwrap();
    assert_eq!(current_after.role, Role::Subscriber);
    assert_eq!(
        current_after.subscription.unwrap().status,
        SubscriptionStatus::Active
    );

    accounts.delete_user(&lapsed.uid).await.unwrap();
    accounts.delete_user(&current.uid).await.unwrap();
}

#[tokio::test]
async fn test_stats_scan_counts_created_users() {
    require_emulator!();
    let db = common::test_db().await;
    let accounts = AccountService::new(db.clone());
    let stats = StatsService::new(db.clone());

    let email = format!("stats-{}@example.com", uuid::Uuid::new_v4());
    let profile = accounts
        .create_user(&email, "long enough pw", "Stats", Role::Trial)
        .await
        .unwrap();

    let report = stats.user_stats(Utc::now()).await.unwrap();
    assert!(report.total_users >= 1);
    assert!(report.by_role.get("trial").copied().unwrap_or(0) >= 1);
    assert!(report.new_last_7_days >= 1);

    accounts.delete_user(&profile.uid).await.unwrap();
}
