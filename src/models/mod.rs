// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Data models for the application.

pub mod account;
pub mod content;
pub mod stats;
pub mod user;

pub use account::{Account, CustomClaims};
pub use content::{ContentItem, ContentKind, Language, Visibility};
pub use stats::UserStatsReport;
pub use user::{PlanType, Role, Subscription, SubscriptionStatus, UserProfile};
