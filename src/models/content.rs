// SPDX-License-Identifier: MIT
// Copyright 2026 Playnest Developers

//! Localized content records: activities and blog posts.
//!
//! Content is localized per language via separate collections
//! (`activities_en`, `activities_sr`, `blog_en`, ...), not per field.

use crate::models::user::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported content languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Sr,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Sr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Sr => "sr",
        }
    }

    pub fn parse(code: &str) -> Option<Language> {
        match code {
            "en" => Some(Language::En),
            "sr" => Some(Language::Sr),
            _ => None,
        }
    }
}

/// Content kind, selecting the collection family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Activities,
    Blog,
}

impl ContentKind {
    pub const ALL: [ContentKind; 2] = [ContentKind::Activities, ContentKind::Blog];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Activities => "activities",
            ContentKind::Blog => "blog",
        }
    }

    pub fn parse(s: &str) -> Option<ContentKind> {
        match s {
            "activities" => Some(ContentKind::Activities),
            "blog" => Some(ContentKind::Blog),
            _ => None,
        }
    }

    /// Collection name for this kind in the given language, e.g.
    /// `activities_en`.
    pub fn collection(&self, lang: Language) -> String {
        format!("{}_{}", self.as_str(), lang.as_str())
    }
}

/// Per-item audience flag used to filter which users may see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Subscriber,
    Admin,
}

/// A content record: one activity or blog post in one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Document ID, shared across language variants of the same item
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub body: String,
    pub image_url: Option<String>,
    pub visibility: Visibility,
    pub is_premium: bool,
    #[serde(default = "default_published")]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_published() -> bool {
    true
}

impl ContentItem {
    /// Whether a viewer with the given role (None = anonymous) may see this
    /// item. This is a coarse serving filter, not a security boundary.
    pub fn visible_to(&self, viewer: Option<Role>) -> bool {
        match viewer {
            Some(Role::Admin) => true,
            _ if !self.published => false,
            None | Some(Role::Free) => self.visibility == Visibility::Public && !self.is_premium,
            Some(Role::Trial) | Some(Role::Subscriber) => {
                matches!(self.visibility, Visibility::Public | Visibility::Subscriber)
            }
        }
    }
}
