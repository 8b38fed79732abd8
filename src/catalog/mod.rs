//! Scheme catalog
//!
//! The catalog is an immutable, in-memory collection of welfare scheme
//! records, initialized once at startup and shared read-only across
//! requests. Records come from the MongoDB `schemes` collection (seeded
//! from the built-in set when empty) or, in dev mode without MongoDB,
//! from the built-in set directly.

pub mod seed;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{GatewayError, Result};

/// Scheme category: centrally sponsored or Tamil Nadu state scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeCategory {
    Central,
    Tn,
}

impl SchemeCategory {
    /// All categories, in the order the frontend presents them
    pub const ALL: [SchemeCategory; 2] = [SchemeCategory::Central, SchemeCategory::Tn];

    /// Parse a category from a query/payload token
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "central" => Some(SchemeCategory::Central),
            "tn" | "state" => Some(SchemeCategory::Tn),
            _ => None,
        }
    }

    /// Human-readable label for chat replies
    pub fn label(&self) -> &'static str {
        match self {
            SchemeCategory::Central => "Central Government Schemes",
            SchemeCategory::Tn => "Tamil Nadu State Schemes",
        }
    }
}

impl fmt::Display for SchemeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeCategory::Central => write!(f, "central"),
            SchemeCategory::Tn => write!(f, "tn"),
        }
    }
}

/// Occupation criterion: a single allowed value or a set of allowed values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OccupationRule {
    One(String),
    AnyOf(Vec<String>),
}

impl OccupationRule {
    /// Whether the given occupation satisfies this rule (case-insensitive)
    pub fn allows(&self, occupation: &str) -> bool {
        let occupation = occupation.trim();
        match self {
            OccupationRule::One(allowed) => allowed.eq_ignore_ascii_case(occupation),
            OccupationRule::AnyOf(allowed) => {
                allowed.iter().any(|a| a.eq_ignore_ascii_case(occupation))
            }
        }
    }
}

/// Per-scheme eligibility criteria. Absent field = no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    /// Minimum age in years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i64>,

    /// Maximum annual income in rupees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_max: Option<i64>,

    /// Allowed occupation(s)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<OccupationRule>,

    /// Required state of residence ("any" = no restriction)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl EligibilityCriteria {
    /// Whether this criteria set places no constraints at all
    pub fn is_unrestricted(&self) -> bool {
        self.min_age.is_none()
            && self.income_max.is_none()
            && self.occupation.is_none()
            && self.state.is_none()
    }
}

/// A single welfare scheme record. Name is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeRecord {
    pub name: String,
    pub category: SchemeCategory,
    pub benefits: String,
    #[serde(default)]
    pub eligibility: EligibilityCriteria,
    pub deadline: String,
    pub steps: String,
    pub link: String,
}

/// Read-only scheme catalog, initialized once at startup
#[derive(Debug)]
pub struct SchemeCatalog {
    records: Vec<SchemeRecord>,
}

impl SchemeCatalog {
    pub fn new(records: Vec<SchemeRecord>) -> Self {
        Self { records }
    }

    /// Catalog built from the built-in seed set (dev mode without MongoDB)
    pub fn builtin() -> Self {
        Self::new(seed::builtin_schemes())
    }

    /// All records in insertion order
    pub fn all(&self) -> &[SchemeRecord] {
        &self.records
    }

    /// Records of the given category, insertion order preserved
    pub fn list(&self, category: SchemeCategory) -> Vec<&SchemeRecord> {
        self.records
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }

    /// Look up a record by its unique name
    pub fn get(&self, name: &str) -> Result<&SchemeRecord> {
        self.records
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| GatewayError::SchemeNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, category: SchemeCategory) -> SchemeRecord {
        SchemeRecord {
            name: name.to_string(),
            category,
            benefits: "Benefit".to_string(),
            eligibility: EligibilityCriteria::default(),
            deadline: "Open all year".to_string(),
            steps: "Apply online".to_string(),
            link: "https://example.gov.in".to_string(),
        }
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let catalog = SchemeCatalog::new(vec![
            record("A", SchemeCategory::Central),
            record("B", SchemeCategory::Tn),
            record("C", SchemeCategory::Central),
        ]);

        let central: Vec<&str> = catalog
            .list(SchemeCategory::Central)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(central, vec!["A", "C"]);
    }

    #[test]
    fn test_get_unknown_scheme_is_not_found() {
        let catalog = SchemeCatalog::new(vec![record("A", SchemeCategory::Central)]);

        assert!(catalog.get("A").is_ok());
        assert!(catalog.get("a ").is_ok(), "lookup is case-insensitive");
        assert!(matches!(
            catalog.get("Missing"),
            Err(GatewayError::SchemeNotFound(_))
        ));
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = SchemeCatalog::new(vec![]);
        assert!(catalog.is_empty());
        assert!(catalog.list(SchemeCategory::Tn).is_empty());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(SchemeCategory::parse("central"), Some(SchemeCategory::Central));
        assert_eq!(SchemeCategory::parse("TN"), Some(SchemeCategory::Tn));
        assert_eq!(SchemeCategory::parse("state"), Some(SchemeCategory::Tn));
        assert_eq!(SchemeCategory::parse("bogus"), None);
    }

    #[test]
    fn test_occupation_rule_allows() {
        let one = OccupationRule::One("farmer".to_string());
        assert!(one.allows("Farmer"));
        assert!(!one.allows("student"));

        let set = OccupationRule::AnyOf(vec!["farmer".to_string(), "fisherman".to_string()]);
        assert!(set.allows("fisherman"));
        assert!(!set.allows("weaver"));
    }

    #[test]
    fn test_builtin_seed_has_both_categories() {
        let catalog = SchemeCatalog::builtin();
        assert!(!catalog.list(SchemeCategory::Central).is_empty());
        assert!(!catalog.list(SchemeCategory::Tn).is_empty());
    }
}
