// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Accounts (credentials + custom claims)
//! - User profiles (role, permissions, subscription)
//! - Localized content collections (activities, blog posts)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Account, ContentItem, ContentKind, CustomClaims, Language, UserProfile};
use chrono::{DateTime, Utc};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // Emulator connections are unauthenticated so local runs don't need
        // (or leak) real credentials.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore (emulator)");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Account Operations ──────────────────────────────────────

    /// Get an account by uid.
    pub async fn get_account(&self, uid: &str) -> Result<Option<Account>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ACCOUNTS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up an account by email. Emails are unique across accounts.
    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let email = email.to_string();
        let mut matches: Vec<Account> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ACCOUNTS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.pop())
    }

    /// Create or overwrite an account.
    pub async fn upsert_account(&self, account: &Account) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ACCOUNTS)
            .document_id(&account.uid)
            .object(account)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Overwrite the custom claims on an account (single write).
    ///
    /// Returns not-found if the account does not exist.
    pub async fn set_custom_claims(
        &self,
        uid: &str,
        claims: &CustomClaims,
    ) -> Result<(), AppError> {
        let mut account = self
            .get_account(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account {} not found", uid)))?;
        account.claims = claims.clone();
        self.upsert_account(&account).await
    }

    /// Delete an account document.
    pub async fn delete_account(&self, uid: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ACCOUNTS)
            .document_id(uid)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── User Profile Operations ─────────────────────────────────

    /// Get a user profile by uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite a user profile.
    pub async fn upsert_user(&self, user: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a user profile document.
    pub async fn delete_user(&self, uid: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(uid)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Page through all user profiles in stable uid order.
    ///
    /// Used by the statistics scan and the CLI listing; callers loop until a
    /// short page comes back.
    pub async fn list_users_page(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .order_by([("uid", firestore::FirestoreQueryDirection::Ascending)])
            .offset(offset)
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// One page of profiles whose subscription end date is in the past.
    ///
    /// Status and role filtering happen in the caller (the inequality is the
    /// only index the query needs); paging past the backend's default page
    /// size is the caller's responsibility too.
    pub async fn list_lapsed_subscriptions_page(
        &self,
        now: DateTime<Utc>,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("subscription.end_date").less_than(now))
            .order_by([(
                "subscription.end_date",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .offset(offset)
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite many user profiles in transactional batches.
    ///
    /// Chunks stay under Firestore's 500-operation transaction limit.
    pub async fn batch_update_users(&self, users: &[UserProfile]) -> Result<(), AppError> {
        let client = self.get_client()?;

        for chunk in users.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for user in chunk {
                client
                    .fluent()
                    .update()
                    .in_col(collections::USERS)
                    .document_id(&user.uid)
                    .object(user)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add profile {} to transaction: {}",
                            user.uid, e
                        ))
                    })?;
            }

            transaction
                .commit()
                .await
                .map_err(|e| AppError::Database(format!("Batch update commit failed: {}", e)))?;
        }

        Ok(())
    }

    // ─── Content Operations ──────────────────────────────────────

    /// Get a single content item.
    pub async fn get_content(
        &self,
        kind: ContentKind,
        lang: Language,
        id: &str,
    ) -> Result<Option<ContentItem>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(&kind.collection(lang))
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a page of content items, newest first.
    pub async fn list_content_page(
        &self,
        kind: ContentKind,
        lang: Language,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<ContentItem>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(kind.collection(lang).as_str())
            .order_by([("created_at", firestore::FirestoreQueryDirection::Descending)])
            .offset(offset)
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite a content item.
    pub async fn upsert_content(
        &self,
        kind: ContentKind,
        lang: Language,
        item: &ContentItem,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(&kind.collection(lang))
            .document_id(&item.id)
            .object(item)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a content item.
    pub async fn delete_content(
        &self,
        kind: ContentKind,
        lang: Language,
        id: &str,
    ) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(&kind.collection(lang))
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Untyped Collection Access (CLI tooling) ─────────────────

    /// Page through a collection as raw JSON documents, stable `__name__`
    /// order. Used by export/backup/migrate, which must not care about the
    /// document schema.
    pub async fn list_raw_page(
        &self,
        collection: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .offset(offset)
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Write a raw JSON document under an explicit document id.
    pub async fn upsert_raw(
        &self,
        collection: &str,
        doc_id: &str,
        doc: &serde_json::Value,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(doc_id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── User Data Deletion ──────────────────────────────────────

    /// Delete ALL data for a user: profile and account, sequentially,
    /// collection by collection. Not transactional; a partial failure
    /// leaves the remaining documents for a retry.
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_user_data(&self, uid: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        if self.get_user(uid).await?.is_some() {
            self.delete_user(uid).await?;
            deleted_count += 1;
            tracing::debug!(uid, "Deleted user profile");
        }

        if self.get_account(uid).await?.is_some() {
            self.delete_account(uid).await?;
            deleted_count += 1;
            tracing::debug!(uid, "Deleted account");
        }

        tracing::info!(uid, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}
