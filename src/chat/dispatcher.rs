//! Message dispatch
//!
//! Maps each recognized `MessageKind` to either canned reply text or a
//! matcher invocation. Pure with respect to the catalog: no mutation,
//! no per-session state.

use crate::catalog::{SchemeCatalog, SchemeCategory};
use crate::chat::message::MessageKind;
use crate::chat::reply::{CategoryMatches, ChatReply, LinkButton, QuickReply, StructuredData};
use crate::matcher::{self, UserProfile};

pub const HELP_TEXT: &str = "I can help you discover government welfare schemes. \
    Browse schemes by category, or check which ones you may be eligible for \
    by filling in the eligibility form.";

const BROWSE_PROMPT: &str = "Which schemes would you like to browse?";

const ELIGIBILITY_PROMPT: &str = "To check your eligibility, please fill in the \
    eligibility form with your age, annual income, occupation and state.";

const FALLBACK_TEXT: &str = "Sorry, I didn't understand that. \
    Please use one of the quick replies below.";

/// Default quick replies offered when we have nothing more specific
fn default_quick_replies() -> Vec<QuickReply> {
    vec![
        QuickReply::new("Browse Schemes", "browse"),
        QuickReply::new("Check Eligibility", "eligibility"),
        QuickReply::new("Help", "help"),
    ]
}

/// One quick reply per scheme category
fn category_quick_replies() -> Vec<QuickReply> {
    SchemeCategory::ALL
        .iter()
        .map(|c| QuickReply::new(c.label(), &format!("browse_{}", c)))
        .collect()
}

/// Produce the reply for a parsed message
pub fn dispatch(kind: MessageKind, catalog: &SchemeCatalog) -> ChatReply {
    match kind {
        MessageKind::Browse => {
            ChatReply::text(BROWSE_PROMPT).with_quick_replies(category_quick_replies())
        }
        MessageKind::BrowseCategory(category) => browse_category(category, catalog),
        MessageKind::EligibilityPrompt => ChatReply::text(ELIGIBILITY_PROMPT)
            .with_quick_replies(vec![QuickReply::new("Browse Schemes", "browse")]),
        MessageKind::EligibilityCheck(profile) => eligibility_check(profile, catalog),
        MessageKind::InvalidProfile(reason) => {
            ChatReply::text(reason).with_quick_replies(default_quick_replies())
        }
        MessageKind::Help => {
            ChatReply::text(HELP_TEXT).with_quick_replies(default_quick_replies())
        }
        MessageKind::Unknown => {
            ChatReply::text(FALLBACK_TEXT).with_quick_replies(default_quick_replies())
        }
    }
}

/// List all schemes of one category, with a link button per scheme
fn browse_category(category: SchemeCategory, catalog: &SchemeCatalog) -> ChatReply {
    let schemes = catalog.list(category);

    if schemes.is_empty() {
        return ChatReply::text(format!("No {} are available right now.", category.label()))
            .with_quick_replies(default_quick_replies());
    }

    let mut text = format!("{}:\n", category.label());
    for scheme in &schemes {
        text.push_str(&format!("\u{2022} {} - {}\n", scheme.name, scheme.benefits));
    }

    let buttons = schemes
        .iter()
        .map(|s| LinkButton {
            title: s.name.clone(),
            url: s.link.clone(),
        })
        .collect();

    ChatReply::text(text.trim_end())
        .with_quick_replies(default_quick_replies())
        .with_buttons(buttons)
}

/// Run the matcher and build the eligibility reply with structured data
fn eligibility_check(profile: UserProfile, catalog: &SchemeCatalog) -> ChatReply {
    let matched = matcher::match_schemes(&profile, catalog);

    let matches: Vec<CategoryMatches> = SchemeCategory::ALL
        .iter()
        .map(|&category| CategoryMatches {
            category,
            label: category.label(),
            schemes: matched
                .iter()
                .filter(|r| r.category == category)
                .map(|r| (*r).clone())
                .collect(),
        })
        .collect();

    let text = if matched.is_empty() {
        "Based on the details you provided, no schemes matched. \
         You can still browse all schemes by category."
            .to_string()
    } else {
        let mut text = format!(
            "Based on your details, you may be eligible for {} scheme(s):\n",
            matched.len()
        );
        for group in matches.iter().filter(|g| !g.schemes.is_empty()) {
            text.push_str(&format!("\n{}:\n", group.label));
            for scheme in &group.schemes {
                text.push_str(&format!("\u{2022} {}\n", scheme.name));
            }
        }
        text.trim_end().to_string()
    };

    ChatReply::text(text)
        .with_quick_replies(vec![QuickReply::new("Browse Schemes", "browse")])
        .with_structured_data(StructuredData { profile, matches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SchemeCatalog;
    use crate::chat::message::{parse_message, ChatRequest};
    use serde_json::json;

    fn catalog() -> SchemeCatalog {
        SchemeCatalog::builtin()
    }

    fn reply_for(message: &str, payload: Option<serde_json::Value>) -> ChatReply {
        let request = ChatRequest {
            message: message.to_string(),
            sender: "test".to_string(),
            payload,
        };
        dispatch(parse_message(&request), &catalog())
    }

    #[test]
    fn test_help_has_fixed_text_and_quick_replies() {
        let reply = reply_for("help", None);
        assert_eq!(reply.text, HELP_TEXT);
        assert!(!reply.quick_replies.unwrap().is_empty());
        assert!(reply.structured_data.is_none());
    }

    #[test]
    fn test_browse_offers_one_quick_reply_per_category() {
        let reply = reply_for("browse", None);
        let payloads: Vec<String> = reply
            .quick_replies
            .unwrap()
            .into_iter()
            .map(|q| q.payload)
            .collect();
        assert_eq!(payloads, vec!["browse_central", "browse_tn"]);
    }

    #[test]
    fn test_browse_category_lists_schemes_with_links() {
        let reply = reply_for("browse_central", None);
        let buttons = reply.buttons.expect("central schemes have link buttons");
        assert_eq!(buttons.len(), catalog().list(SchemeCategory::Central).len());
        assert!(reply.text.contains("PM-KISAN"));
    }

    #[test]
    fn test_browse_empty_category_is_not_an_error() {
        let empty = SchemeCatalog::new(vec![]);
        let reply = dispatch(MessageKind::BrowseCategory(SchemeCategory::Tn), &empty);
        assert!(reply.text.contains("No"));
        assert!(reply.buttons.is_none());
    }

    #[test]
    fn test_eligibility_check_attaches_structured_data() {
        let payload = json!({
            "age": 25,
            "income": 150000,
            "occupation": "farmer",
            "state": "Tamil Nadu"
        });
        let reply = reply_for("eligibility_check", Some(payload));

        let data = reply.structured_data.expect("structured data present");
        assert_eq!(data.profile.occupation, "farmer");

        let matched: Vec<&str> = data
            .matches
            .iter()
            .flat_map(|g| g.schemes.iter().map(|s| s.name.as_str()))
            .collect();
        assert!(matched.contains(&"PM-KISAN"));
        assert!(!matched.contains(&"Post Matric Scholarship"));
    }

    #[test]
    fn test_invalid_profile_reply_has_no_structured_data() {
        let payload = json!({ "age": "abc", "income": 1000 });
        let reply = reply_for("eligibility_check", Some(payload));
        assert!(reply.structured_data.is_none());
        assert!(reply.text.contains("age"));
    }

    #[test]
    fn test_unknown_message_falls_back() {
        let reply = reply_for("tell me a joke", None);
        assert_eq!(reply.text, FALLBACK_TEXT);
        assert!(!reply.quick_replies.unwrap().is_empty());
    }

    #[test]
    fn test_same_profile_yields_same_reply() {
        // Requests are idempotent: no hidden per-session state
        let payload = json!({ "age": 40, "income": 60000, "occupation": "weaver", "state": "tamil nadu" });
        let first = reply_for("eligibility_check", Some(payload.clone()));
        let second = reply_for("eligibility_check", Some(payload));
        assert_eq!(first, second);
    }
}
