//! Rule-based eligibility matcher
//!
//! A scheme matches a profile iff every criterion present on the record
//! is satisfied (logical AND, no scoring). Matching is a pure function
//! of (profile, catalog); the result is always an order-preserving
//! subsequence of the catalog.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{SchemeCatalog, SchemeRecord};

/// Per-request user profile; never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: i64,
    pub income: i64,
    pub occupation: String,
    pub state: String,
}

/// All catalog records whose criteria the profile satisfies, in catalog order
pub fn match_schemes<'a>(profile: &UserProfile, catalog: &'a SchemeCatalog) -> Vec<&'a SchemeRecord> {
    let matches: Vec<&SchemeRecord> = catalog
        .all()
        .iter()
        .filter(|record| is_eligible(profile, record))
        .collect();

    debug!(
        matched = matches.len(),
        total = catalog.len(),
        "Eligibility match complete"
    );

    matches
}

/// Whether the profile satisfies every criterion present on the record
pub fn is_eligible(profile: &UserProfile, record: &SchemeRecord) -> bool {
    let criteria = &record.eligibility;

    if let Some(min_age) = criteria.min_age {
        if profile.age < min_age {
            return false;
        }
    }

    if let Some(income_max) = criteria.income_max {
        if profile.income > income_max {
            return false;
        }
    }

    if let Some(ref rule) = criteria.occupation {
        if !rule.allows(&profile.occupation) {
            return false;
        }
    }

    if let Some(ref state) = criteria.state {
        if !state_allows(state, &profile.state) {
            return false;
        }
    }

    true
}

/// State criterion comparison: case-insensitive, "any" matches everything
fn state_allows(required: &str, actual: &str) -> bool {
    let required = required.trim();
    required.eq_ignore_ascii_case("any") || required.eq_ignore_ascii_case(actual.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EligibilityCriteria, OccupationRule, SchemeCategory};

    fn record(name: &str, eligibility: EligibilityCriteria) -> SchemeRecord {
        SchemeRecord {
            name: name.to_string(),
            category: SchemeCategory::Central,
            benefits: "Benefit".to_string(),
            eligibility,
            deadline: "Open".to_string(),
            steps: "Apply".to_string(),
            link: "https://example.gov.in".to_string(),
        }
    }

    fn farmer_profile() -> UserProfile {
        UserProfile {
            age: 25,
            income: 150000,
            occupation: "farmer".to_string(),
            state: "Tamil Nadu".to_string(),
        }
    }

    #[test]
    fn test_result_is_order_preserving_subsequence() {
        let catalog = SchemeCatalog::new(vec![
            record("first", EligibilityCriteria::default()),
            record(
                "second",
                EligibilityCriteria {
                    occupation: Some(OccupationRule::One("student".to_string())),
                    ..Default::default()
                },
            ),
            record("third", EligibilityCriteria::default()),
        ]);

        let names: Vec<&str> = match_schemes(&farmer_profile(), &catalog)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "third"]);
    }

    #[test]
    fn test_unconstrained_record_matches_every_profile() {
        let unconstrained = record("open", EligibilityCriteria::default());

        let profiles = [
            farmer_profile(),
            UserProfile {
                age: 0,
                income: 0,
                occupation: String::new(),
                state: String::new(),
            },
            UserProfile {
                age: 99,
                income: 10_000_000,
                occupation: "astronaut".to_string(),
                state: "Mars".to_string(),
            },
        ];

        for profile in &profiles {
            assert!(is_eligible(profile, &unconstrained));
        }
    }

    #[test]
    fn test_income_above_cap_removes_record() {
        let capped = record(
            "capped",
            EligibilityCriteria {
                income_max: Some(200000),
                ..Default::default()
            },
        );

        let mut profile = farmer_profile();
        assert!(is_eligible(&profile, &capped));

        profile.income = 200000;
        assert!(is_eligible(&profile, &capped), "cap is inclusive");

        profile.income = 200001;
        assert!(!is_eligible(&profile, &capped));
    }

    #[test]
    fn test_min_age_boundary() {
        let adult_only = record(
            "adult",
            EligibilityCriteria {
                min_age: Some(18),
                ..Default::default()
            },
        );

        let mut profile = farmer_profile();
        profile.age = 17;
        assert!(!is_eligible(&profile, &adult_only));
        profile.age = 18;
        assert!(is_eligible(&profile, &adult_only));
    }

    #[test]
    fn test_occupation_set_membership() {
        let coastal = record(
            "coastal",
            EligibilityCriteria {
                occupation: Some(OccupationRule::AnyOf(vec![
                    "farmer".to_string(),
                    "fisherman".to_string(),
                ])),
                ..Default::default()
            },
        );

        let mut profile = farmer_profile();
        assert!(is_eligible(&profile, &coastal));

        profile.occupation = "student".to_string();
        assert!(!is_eligible(&profile, &coastal));
    }

    #[test]
    fn test_state_matching_is_case_insensitive() {
        let tn_only = record(
            "tn",
            EligibilityCriteria {
                state: Some("tamil nadu".to_string()),
                ..Default::default()
            },
        );

        let mut profile = farmer_profile();
        profile.state = "TAMIL NADU".to_string();
        assert!(is_eligible(&profile, &tn_only));

        profile.state = "Kerala".to_string();
        assert!(!is_eligible(&profile, &tn_only));
    }

    #[test]
    fn test_state_any_matches_everything() {
        let anywhere = record(
            "anywhere",
            EligibilityCriteria {
                state: Some("any".to_string()),
                ..Default::default()
            },
        );

        let mut profile = farmer_profile();
        profile.state = "Punjab".to_string();
        assert!(is_eligible(&profile, &anywhere));
    }

    #[test]
    fn test_farmer_matches_only_farmer_scheme() {
        let catalog = SchemeCatalog::new(vec![
            record(
                "farmer-support",
                EligibilityCriteria {
                    min_age: Some(18),
                    income_max: Some(200000),
                    occupation: Some(OccupationRule::AnyOf(vec![
                        "farmer".to_string(),
                        "weaver".to_string(),
                    ])),
                    ..Default::default()
                },
            ),
            record(
                "student-aid",
                EligibilityCriteria {
                    occupation: Some(OccupationRule::One("student".to_string())),
                    ..Default::default()
                },
            ),
        ]);

        let matches = match_schemes(&farmer_profile(), &catalog);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "farmer-support");
    }

    #[test]
    fn test_empty_catalog_yields_empty_result() {
        let catalog = SchemeCatalog::new(vec![]);
        assert!(match_schemes(&farmer_profile(), &catalog).is_empty());
    }

    #[test]
    fn test_unknown_occupation_still_matches_unrestricted() {
        let catalog = SchemeCatalog::new(vec![
            record("open", EligibilityCriteria::default()),
            record(
                "farmers-only",
                EligibilityCriteria {
                    occupation: Some(OccupationRule::One("farmer".to_string())),
                    ..Default::default()
                },
            ),
        ]);

        let profile = UserProfile {
            age: 30,
            income: 50000,
            occupation: "juggler".to_string(),
            state: "Nowhere".to_string(),
        };

        let names: Vec<&str> = match_schemes(&profile, &catalog)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["open"]);
    }
}
