//! Scheme application document schema
//!
//! A citizen's application for one scheme. Document uploads are recorded
//! by name only; the files themselves are not stored here.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::mongo::IntoIndexes;
use crate::db::schemas::Metadata;

/// Collection name for applications
pub const APPLICATION_COLLECTION: &str = "applications";

/// Review state of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Parse a status from a request payload token
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(ApplicationStatus::Pending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::Pending => write!(f, "pending"),
            ApplicationStatus::Approved => write!(f, "approved"),
            ApplicationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Application document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApplicationDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Applicant's user ID
    pub user_id: ObjectId,

    /// Opaque tracking reference handed back to the applicant
    pub reference: String,

    /// Scheme name as stored in the catalog
    pub scheme: String,

    /// Free-form answers the applicant supplied
    #[serde(default)]
    pub answers: bson::Document,

    /// Names of uploaded supporting documents
    #[serde(default)]
    pub documents: Vec<String>,

    pub status: ApplicationStatus,

    /// Set when an admin approves or rejects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime>,
}

impl ApplicationDoc {
    /// Create a new pending application
    pub fn new(
        user_id: ObjectId,
        scheme: String,
        answers: bson::Document,
        documents: Vec<String>,
    ) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            user_id,
            reference: uuid::Uuid::new_v4().to_string(),
            scheme,
            answers,
            documents,
            status: ApplicationStatus::Pending,
            reviewed_at: None,
        }
    }
}

impl IntoIndexes for ApplicationDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(doc! { "user_id": 1 }, None)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_application_is_pending() {
        let app = ApplicationDoc::new(
            ObjectId::new(),
            "PM-KISAN".into(),
            doc! { "land_holding": "1.5 acres" },
            vec!["aadhar.pdf".into()],
        );
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert!(app.reviewed_at.is_none());
        assert!(!app.reference.is_empty());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            ApplicationStatus::parse("Approved"),
            Some(ApplicationStatus::Approved)
        );
        assert_eq!(
            ApplicationStatus::parse(" pending "),
            Some(ApplicationStatus::Pending)
        );
        assert_eq!(ApplicationStatus::parse("cancelled"), None);
    }
}
