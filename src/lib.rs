// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Playnest: children's activities and subscription platform API.
//!
//! This crate provides the backend API for localized activity and blog
//! content, user accounts with role-derived permissions, and the
//! subscription lifecycle (signup, expiry sweep, statistics).

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{AccountService, ContentService, RoleService, StatsService, SubscriptionService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub accounts: AccountService,
    pub roles: RoleService,
    pub subscriptions: SubscriptionService,
    pub stats: StatsService,
    pub content: ContentService,
}

impl AppState {
    /// Wire up all services over one database handle.
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        Self {
            accounts: AccountService::new(db.clone()),
            roles: RoleService::new(db.clone()),
            subscriptions: SubscriptionService::new(db.clone()),
            stats: StatsService::new(db.clone()),
            content: ContentService::new(db.clone()),
            config,
            db,
        }
    }
}
