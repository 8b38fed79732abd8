//! Scheme document schema
//!
//! One document per catalog scheme. The `order` field preserves the
//! presentation order of the built-in seed across reloads.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::catalog::SchemeRecord;
use crate::db::mongo::IntoIndexes;

/// Collection name for schemes
pub const SCHEME_COLLECTION: &str = "schemes";

/// Scheme document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SchemeDoc {
    /// Position in the catalog listing
    pub order: i64,

    #[serde(flatten)]
    pub record: SchemeRecord,
}

impl IntoIndexes for SchemeDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "name": 1 },
            Some(IndexOptions::builder().unique(true).build()),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::builtin_schemes;

    #[test]
    fn test_record_fields_flatten_to_top_level() {
        let doc = SchemeDoc {
            order: 0,
            record: builtin_schemes().remove(0),
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("name").is_some());
        assert!(value.get("record").is_none());
        assert_eq!(value["order"], 0);
    }
}
