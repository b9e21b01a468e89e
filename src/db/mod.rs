//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

use crate::models::{ContentKind, Language};

/// Collection names as constants.
pub mod collections {
    /// Authentication accounts (keyed by uid)
    pub const ACCOUNTS: &str = "accounts";
    /// User profiles (keyed by uid)
    pub const USERS: &str = "users";
}

/// Every collection the CLI backup/migrate tooling knows about, including
/// each localized content collection.
pub fn all_collections() -> Vec<String> {
    let mut names = vec![
        collections::ACCOUNTS.to_string(),
        collections::USERS.to_string(),
    ];
    for kind in ContentKind::ALL {
        for lang in Language::ALL {
            names.push(kind.collection(lang));
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_collections_cover_every_language_variant() {
        let names = all_collections();
        assert!(names.contains(&"accounts".to_string()));
        assert!(names.contains(&"users".to_string()));
        assert!(names.contains(&"activities_en".to_string()));
        assert!(names.contains(&"activities_sr".to_string()));
        assert!(names.contains(&"blog_en".to_string()));
        assert!(names.contains(&"blog_sr".to_string()));
        assert_eq!(names.len(), 6);
    }
}
