//! Incoming message parsing
//!
//! The wire format is `{message, sender, payload?}` where `payload`
//! carries the eligibility form values for an eligibility check. All
//! validation happens here, before dispatch: handlers downstream only
//! ever see well-typed message kinds.

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::SchemeCategory;
use crate::matcher::UserProfile;

/// Request body of POST /api/chat
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Opaque client correlation key, passed through untouched
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub payload: Option<Value>,
}

/// Recognized message kinds after boundary validation
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    /// "browse" - show the category picker
    Browse,
    /// "browse_central" / "browse_tn" - list schemes of one category
    BrowseCategory(SchemeCategory),
    /// "eligibility" - point the user at the eligibility form
    EligibilityPrompt,
    /// "eligibility_check" with a well-formed profile payload
    EligibilityCheck(UserProfile),
    /// "eligibility_check" with a malformed payload; carries the
    /// user-facing validation message
    InvalidProfile(String),
    /// "help"
    Help,
    /// Anything else - free text we do not understand
    Unknown,
}

/// Classify an incoming request into a `MessageKind`
pub fn parse_message(request: &ChatRequest) -> MessageKind {
    match request.message.trim().to_ascii_lowercase().as_str() {
        "browse" => MessageKind::Browse,
        "browse_central" => MessageKind::BrowseCategory(SchemeCategory::Central),
        "browse_tn" => MessageKind::BrowseCategory(SchemeCategory::Tn),
        "eligibility" => MessageKind::EligibilityPrompt,
        "eligibility_check" => match parse_profile(request.payload.as_ref()) {
            Ok(profile) => MessageKind::EligibilityCheck(profile),
            Err(reason) => MessageKind::InvalidProfile(reason),
        },
        "help" => MessageKind::Help,
        _ => MessageKind::Unknown,
    }
}

/// Parse the eligibility form payload into a profile.
///
/// Age and income are required and must be numeric; the frontend form
/// submits them as strings, so numeric strings are accepted too.
/// Occupation and state default to empty, which still matches
/// unrestricted schemes.
fn parse_profile(payload: Option<&Value>) -> Result<UserProfile, String> {
    let payload = payload.ok_or_else(|| {
        "Please fill in the eligibility form before checking.".to_string()
    })?;

    let age = int_field(payload, "age")?;
    let income = int_field(payload, "income")?;

    if age < 0 {
        return Err("Age cannot be negative.".to_string());
    }
    if income < 0 {
        return Err("Income cannot be negative.".to_string());
    }

    Ok(UserProfile {
        age,
        income,
        occupation: str_field(payload, "occupation"),
        state: str_field(payload, "state"),
    })
}

fn int_field(payload: &Value, field: &str) -> Result<i64, String> {
    let value = payload
        .get(field)
        .ok_or_else(|| format!("Please provide your {} to check eligibility.", field))?;

    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("Please enter a whole number for {}.", field)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("Please enter a valid number for {}.", field)),
        _ => Err(format!("Please enter a valid number for {}.", field)),
    }
}

fn str_field(payload: &Value, field: &str) -> String {
    payload
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(message: &str, payload: Option<Value>) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            sender: "visitor-1".to_string(),
            payload,
        }
    }

    #[test]
    fn test_recognized_tokens() {
        assert_eq!(parse_message(&request("browse", None)), MessageKind::Browse);
        assert_eq!(
            parse_message(&request(" Browse ", None)),
            MessageKind::Browse
        );
        assert_eq!(
            parse_message(&request("browse_tn", None)),
            MessageKind::BrowseCategory(SchemeCategory::Tn)
        );
        assert_eq!(
            parse_message(&request("eligibility", None)),
            MessageKind::EligibilityPrompt
        );
        assert_eq!(parse_message(&request("help", None)), MessageKind::Help);
        assert_eq!(
            parse_message(&request("what schemes exist?", None)),
            MessageKind::Unknown
        );
    }

    #[test]
    fn test_eligibility_check_with_valid_payload() {
        let payload = json!({
            "age": 25,
            "income": "150000",
            "occupation": "farmer",
            "state": "Tamil Nadu"
        });

        match parse_message(&request("eligibility_check", Some(payload))) {
            MessageKind::EligibilityCheck(profile) => {
                assert_eq!(profile.age, 25);
                assert_eq!(profile.income, 150000);
                assert_eq!(profile.occupation, "farmer");
                assert_eq!(profile.state, "Tamil Nadu");
            }
            other => panic!("expected EligibilityCheck, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_age_is_invalid() {
        let payload = json!({ "age": "twenty", "income": 50000 });
        assert!(matches!(
            parse_message(&request("eligibility_check", Some(payload))),
            MessageKind::InvalidProfile(_)
        ));
    }

    #[test]
    fn test_missing_income_is_invalid() {
        let payload = json!({ "age": 30 });
        match parse_message(&request("eligibility_check", Some(payload))) {
            MessageKind::InvalidProfile(reason) => assert!(reason.contains("income")),
            other => panic!("expected InvalidProfile, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_payload_is_invalid() {
        assert!(matches!(
            parse_message(&request("eligibility_check", None)),
            MessageKind::InvalidProfile(_)
        ));
    }

    #[test]
    fn test_negative_values_are_invalid() {
        let payload = json!({ "age": -1, "income": 1000 });
        assert!(matches!(
            parse_message(&request("eligibility_check", Some(payload))),
            MessageKind::InvalidProfile(_)
        ));
    }

    #[test]
    fn test_missing_occupation_defaults_to_empty() {
        let payload = json!({ "age": 40, "income": 0 });
        match parse_message(&request("eligibility_check", Some(payload))) {
            MessageKind::EligibilityCheck(profile) => {
                assert!(profile.occupation.is_empty());
                assert!(profile.state.is_empty());
            }
            other => panic!("expected EligibilityCheck, got {:?}", other),
        }
    }
}
