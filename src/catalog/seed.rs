//! Built-in scheme seed data
//!
//! Used to seed the MongoDB `schemes` collection on first startup, and
//! served directly in dev mode without MongoDB. Operators can edit the
//! stored collection between restarts; this set is only the default.

use super::{EligibilityCriteria, OccupationRule, SchemeCategory, SchemeRecord};

fn scheme(
    name: &str,
    category: SchemeCategory,
    benefits: &str,
    eligibility: EligibilityCriteria,
    deadline: &str,
    steps: &str,
    link: &str,
) -> SchemeRecord {
    SchemeRecord {
        name: name.to_string(),
        category,
        benefits: benefits.to_string(),
        eligibility,
        deadline: deadline.to_string(),
        steps: steps.to_string(),
        link: link.to_string(),
    }
}

/// The default scheme catalog
pub fn builtin_schemes() -> Vec<SchemeRecord> {
    vec![
        scheme(
            "PM-KISAN",
            SchemeCategory::Central,
            "Income support of Rs. 6,000 per year in three equal instalments to landholding farmer families.",
            EligibilityCriteria {
                occupation: Some(OccupationRule::One("farmer".to_string())),
                ..Default::default()
            },
            "Open all year",
            "Register on the PM-KISAN portal with Aadhaar and land records, or visit the nearest Common Service Centre.",
            "https://pmkisan.gov.in",
        ),
        scheme(
            "Pradhan Mantri Fasal Bima Yojana",
            SchemeCategory::Central,
            "Crop insurance cover against natural calamities, pests and diseases at subsidised premium rates.",
            EligibilityCriteria {
                min_age: Some(18),
                occupation: Some(OccupationRule::One("farmer".to_string())),
                ..Default::default()
            },
            "Before the notified cut-off date for each crop season",
            "Apply through your bank, Primary Agricultural Credit Society, or the National Crop Insurance Portal.",
            "https://pmfby.gov.in",
        ),
        scheme(
            "Pradhan Mantri Jeevan Jyoti Bima Yojana",
            SchemeCategory::Central,
            "Life insurance cover of Rs. 2 lakh at an annual premium of Rs. 436.",
            EligibilityCriteria {
                min_age: Some(18),
                ..Default::default()
            },
            "Enrolment open all year; cover period 1 June to 31 May",
            "Enrol through your bank or post office account with auto-debit consent.",
            "https://jansuraksha.gov.in",
        ),
        scheme(
            "Atal Pension Yojana",
            SchemeCategory::Central,
            "Guaranteed minimum monthly pension of Rs. 1,000 to Rs. 5,000 after the age of 60.",
            EligibilityCriteria {
                min_age: Some(18),
                ..Default::default()
            },
            "Open all year",
            "Open an APY account at any bank branch or post office with an active savings account.",
            "https://npscra.nsdl.co.in",
        ),
        scheme(
            "Pradhan Mantri Awas Yojana - Gramin",
            SchemeCategory::Central,
            "Financial assistance of Rs. 1.2 lakh (plains) to Rs. 1.3 lakh (hilly areas) for pucca house construction.",
            EligibilityCriteria {
                income_max: Some(120000),
                ..Default::default()
            },
            "As per Gram Sabha beneficiary list",
            "Check your name in the SECC-based permanent wait list and apply through the Gram Panchayat.",
            "https://pmayg.nic.in",
        ),
        scheme(
            "Post Matric Scholarship",
            SchemeCategory::Central,
            "Scholarship covering maintenance allowance and fees for post-matriculation studies.",
            EligibilityCriteria {
                income_max: Some(250000),
                occupation: Some(OccupationRule::One("student".to_string())),
                ..Default::default()
            },
            "Usually 31 October each academic year",
            "Apply on the National Scholarship Portal with income certificate and previous mark sheets.",
            "https://scholarships.gov.in",
        ),
        scheme(
            "Pradhan Mantri Mudra Yojana",
            SchemeCategory::Central,
            "Collateral-free loans up to Rs. 10 lakh for non-corporate, non-farm micro enterprises.",
            EligibilityCriteria::default(),
            "Open all year",
            "Approach any bank, NBFC or MFI with a business plan, or apply on the Udyamimitra portal.",
            "https://mudra.org.in",
        ),
        scheme(
            "Old Age Pension Scheme",
            SchemeCategory::Tn,
            "Monthly pension of Rs. 1,200 for destitute elderly persons.",
            EligibilityCriteria {
                min_age: Some(60),
                income_max: Some(72000),
                state: Some("tamil nadu".to_string()),
                ..Default::default()
            },
            "Open all year",
            "Apply at the Taluk office with age proof and income certificate.",
            "https://www.tn.gov.in/scheme/data_view/6884",
        ),
        scheme(
            "Chief Minister's Comprehensive Health Insurance",
            SchemeCategory::Tn,
            "Cashless hospitalisation cover up to Rs. 5 lakh per family per year in empanelled hospitals.",
            EligibilityCriteria {
                income_max: Some(120000),
                state: Some("tamil nadu".to_string()),
                ..Default::default()
            },
            "Open all year",
            "Enrol at the nearest e-sevai centre or empanelled hospital kiosk with family card.",
            "https://www.cmchistn.com",
        ),
        scheme(
            "Fishermen Lean Season Assistance",
            SchemeCategory::Tn,
            "Lump-sum assistance during the fishing ban period and lean months.",
            EligibilityCriteria {
                min_age: Some(18),
                occupation: Some(OccupationRule::AnyOf(vec![
                    "fisherman".to_string(),
                    "fisherwoman".to_string(),
                ])),
                state: Some("tamil nadu".to_string()),
                ..Default::default()
            },
            "During the annual fishing ban, April to June",
            "Apply through the Fisheries Department with biometric fisher identity card.",
            "https://www.fisheries.tn.gov.in",
        ),
        scheme(
            "Handloom Weavers Welfare Scheme",
            SchemeCategory::Tn,
            "Free electricity up to 200 units, insurance cover and marketing support for handloom weavers.",
            EligibilityCriteria {
                occupation: Some(OccupationRule::AnyOf(vec![
                    "weaver".to_string(),
                    "handloom weaver".to_string(),
                ])),
                state: Some("tamil nadu".to_string()),
                ..Default::default()
            },
            "Open all year",
            "Register with the Department of Handlooms and Textiles through your co-operative society.",
            "https://www.tn.gov.in/department/13",
        ),
        scheme(
            "Pudhumai Penn Scheme",
            SchemeCategory::Tn,
            "Monthly assistance of Rs. 1,000 for girl students who studied in government schools and pursue higher education.",
            EligibilityCriteria {
                occupation: Some(OccupationRule::One("student".to_string())),
                state: Some("tamil nadu".to_string()),
                ..Default::default()
            },
            "At the start of each academic year",
            "Apply through the college with government school leaving certificate and bank details.",
            "https://pudhumaipenn.tn.gov.in",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_names_are_unique() {
        let schemes = builtin_schemes();
        let mut names: Vec<&str> = schemes.iter().map(|s| s.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), schemes.len());
    }

    #[test]
    fn test_seed_contains_an_unrestricted_scheme() {
        // At least one scheme must match every profile
        assert!(builtin_schemes()
            .iter()
            .any(|s| s.eligibility.is_unrestricted()));
    }
}
