// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Operational CLI for user management and data tooling.
//!
//! Every command is a sequential run of reads/writes against Firestore;
//! errors are logged and the process exits non-zero. Environment selection
//! follows `GCP_PROJECT_ID` and the ambient credential chain, except for
//! `migrate`, which names both projects explicitly.

use clap::{Parser, Subcommand};
use playnest::db::{all_collections, FirestoreDb};
use playnest::models::Role;
use playnest::services::{AccountService, RoleService, StatsService};
use std::path::{Path, PathBuf};

/// Page size for collection walks.
const PAGE_SIZE: u32 = 300;

#[derive(Parser)]
#[command(name = "playnest-admin")]
#[command(about = "Playnest operations CLI", version)]
struct Cli {
    /// GCP project to operate on (defaults to GCP_PROJECT_ID)
    #[arg(long, global = true)]
    project: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and a provisioned profile
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        display_name: String,
        /// Initial role (admin|subscriber|trial|free)
        #[arg(long, default_value = "free")]
        role: String,
    },
    /// Delete a user's account and profile
    DeleteUser { uid: String },
    /// List user profiles
    ListUsers {
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    /// Overwrite a user's role (claims + profile)
    SetRole { uid: String, role: String },
    /// Dump a collection to a JSON array file
    Export { collection: String, file: PathBuf },
    /// Load a JSON array file into a collection
    Import { collection: String, file: PathBuf },
    /// Export every known collection into a directory
    Backup { dir: PathBuf },
    /// Copy all known collections from one project to another
    Migrate {
        source_project: String,
        target_project: String,
    },
    /// Print the user statistics report
    Stats,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("playnest=info".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let project = cli
        .project
        .or_else(|| std::env::var("GCP_PROJECT_ID").ok())
        .unwrap_or_else(|| "local-dev".to_string());

    match cli.command {
        Commands::CreateUser {
            email,
            password,
            display_name,
            role,
        } => {
            let role = Role::parse(&role)
                .ok_or_else(|| anyhow::anyhow!("Unknown role '{}'", role))?;
            let db = FirestoreDb::new(&project).await?;
            let profile = AccountService::new(db)
                .create_user(&email, &password, &display_name, role)
                .await?;
            println!("{}", profile.uid);
        }
        Commands::DeleteUser { uid } => {
            let db = FirestoreDb::new(&project).await?;
            let deleted = AccountService::new(db).delete_user(&uid).await?;
            if deleted == 0 {
                anyhow::bail!("User {} not found", uid);
            }
            println!("Deleted {} documents for {}", deleted, uid);
        }
        Commands::ListUsers { limit } => {
            let db = FirestoreDb::new(&project).await?;
            let mut offset = 0u32;
            let mut printed = 0u32;
            'pages: loop {
                let page = db.list_users_page(offset, PAGE_SIZE).await?;
                let page_len = page.len() as u32;
                for profile in page {
                    let status = profile
                        .subscription
                        .as_ref()
                        .map(|s| s.status.as_str())
                        .unwrap_or("none");
                    println!(
                        "{}\t{}\t{}\t{}",
                        profile.uid,
                        profile.email,
                        profile.role.as_str(),
                        status
                    );
                    printed += 1;
                    if printed >= limit {
                        break 'pages;
                    }
                }
                if page_len < PAGE_SIZE {
                    break;
                }
                offset += page_len;
            }
        }
        Commands::SetRole { uid, role } => {
            let role = Role::parse(&role)
                .ok_or_else(|| anyhow::anyhow!("Unknown role '{}'", role))?;
            let db = FirestoreDb::new(&project).await?;
            let updated = RoleService::new(db).set_role_unchecked(&uid, role).await?;
            println!("{} -> {}", updated.uid, updated.role.as_str());
        }
        Commands::Export { collection, file } => {
            let db = FirestoreDb::new(&project).await?;
            let count = export_collection(&db, &collection, &file).await?;
            println!("Exported {} documents from {}", count, collection);
        }
        Commands::Import { collection, file } => {
            let db = FirestoreDb::new(&project).await?;
            let count = import_collection(&db, &collection, &file).await?;
            println!("Imported {} documents into {}", count, collection);
        }
        Commands::Backup { dir } => {
            let db = FirestoreDb::new(&project).await?;
            std::fs::create_dir_all(&dir)?;
            for collection in all_collections() {
                let file = dir.join(format!("{}.json", collection));
                let count = export_collection(&db, &collection, &file).await?;
                tracing::info!(collection = %collection, count, "Collection backed up");
            }
            println!("Backup written to {}", dir.display());
        }
        Commands::Migrate {
            source_project,
            target_project,
        } => {
            let source = FirestoreDb::new(&source_project).await?;
            let target = FirestoreDb::new(&target_project).await?;
            for collection in all_collections() {
                let count = copy_collection(&source, &target, &collection).await?;
                tracing::info!(collection = %collection, count, "Collection migrated");
            }
            println!("Migrated {} -> {}", source_project, target_project);
        }
        Commands::Stats => {
            let db = FirestoreDb::new(&project).await?;
            let report = StatsService::new(db).user_stats(chrono::Utc::now()).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Walk a collection and write it as a JSON array.
async fn export_collection(
    db: &FirestoreDb,
    collection: &str,
    file: &Path,
) -> anyhow::Result<usize> {
    let docs = read_all(db, collection).await?;
    std::fs::write(file, serde_json::to_vec_pretty(&docs)?)?;
    Ok(docs.len())
}

/// Read a JSON array file and upsert every document.
async fn import_collection(
    db: &FirestoreDb,
    collection: &str,
    file: &Path,
) -> anyhow::Result<usize> {
    let bytes = std::fs::read(file)?;
    let docs: Vec<serde_json::Value> = serde_json::from_slice(&bytes)?;

    let mut count = 0usize;
    for doc in &docs {
        let id = doc_id(doc)
            .ok_or_else(|| anyhow::anyhow!("Document without uid/id field in {}", collection))?;
        db.upsert_raw(collection, &id, doc).await?;
        count += 1;
    }
    Ok(count)
}

/// Sequentially copy one collection between environments.
async fn copy_collection(
    source: &FirestoreDb,
    target: &FirestoreDb,
    collection: &str,
) -> anyhow::Result<usize> {
    let docs = read_all(source, collection).await?;
    for doc in &docs {
        let id = doc_id(doc)
            .ok_or_else(|| anyhow::anyhow!("Document without uid/id field in {}", collection))?;
        target.upsert_raw(collection, &id, doc).await?;
    }
    Ok(docs.len())
}

/// Page through every document of a collection.
async fn read_all(db: &FirestoreDb, collection: &str) -> anyhow::Result<Vec<serde_json::Value>> {
    let mut docs = Vec::new();
    let mut offset = 0u32;
    loop {
        let page = db.list_raw_page(collection, offset, PAGE_SIZE).await?;
        let page_len = page.len() as u32;
        docs.extend(page);
        if page_len < PAGE_SIZE {
            break;
        }
        offset += page_len;
    }
    Ok(docs)
}

/// Document id for re-import: accounts and profiles carry `uid`, content
/// carries `id`.
fn doc_id(doc: &serde_json::Value) -> Option<String> {
    doc.get("uid")
        .or_else(|| doc.get("id"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
