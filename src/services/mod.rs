// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Services module - business logic layer.

pub mod accounts;
pub mod content;
pub mod roles;
pub mod stats;
pub mod subscriptions;

pub use accounts::AccountService;
pub use content::ContentService;
pub use roles::RoleService;
pub use stats::StatsService;
pub use subscriptions::{SubscriptionService, SweepOutcome};
