//! User document schema

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::auth::UserRole;
use crate::db::mongo::IntoIndexes;
use crate::db::schemas::Metadata;

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// User document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UserDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    pub name: String,
    pub email: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Aadhar number, stored as provided
    pub aadhar: String,

    pub phone: String,

    #[serde(default)]
    pub role: UserRole,

    /// Whether the account is active
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl UserDoc {
    /// Create a new user document with the default role
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        aadhar: String,
        phone: String,
    ) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            name,
            email,
            password_hash,
            aadhar,
            phone,
            role: UserRole::default(),
            is_active: true,
        }
    }
}

impl IntoIndexes for UserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "email": 1 },
            Some(IndexOptions::builder().unique(true).build()),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = UserDoc::new(
            "Asha".into(),
            "asha@example.com".into(),
            "$argon2id$...".into(),
            "123412341234".into(),
            "9876543210".into(),
        );
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active);
        assert!(user._id.is_none());
    }

    #[test]
    fn test_unique_email_index() {
        let indices = UserDoc::into_indices();
        assert_eq!(indices.len(), 1);
        assert_eq!(indices[0].0, doc! { "email": 1 });
        assert_eq!(indices[0].1.as_ref().and_then(|o| o.unique), Some(true));
    }
}
