// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

use playnest::config::Config;
use playnest::db::FirestoreDb;
use playnest::models::Role;
use playnest::routes::create_router;
use playnest::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let state = Arc::new(AppState::new(config, db));

    (create_router(state.clone()), state)
}

/// Create a session token signed with the test config's key.
#[allow(dead_code)]
pub fn create_test_jwt(uid: &str, role: Role) -> String {
    let config = Config::test_default();
    playnest::middleware::auth::create_jwt(uid, role, &config.jwt_signing_key)
        .expect("JWT creation should succeed")
}
