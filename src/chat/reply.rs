//! Chat reply payload types

use serde::Serialize;

use crate::catalog::{SchemeCategory, SchemeRecord};
use crate::matcher::UserProfile;

/// Suggested next-message button shown alongside a reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickReply {
    pub title: String,
    pub payload: String,
}

impl QuickReply {
    pub fn new(title: &str, payload: &str) -> Self {
        Self {
            title: title.to_string(),
            payload: payload.to_string(),
        }
    }
}

/// External link button
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkButton {
    pub title: String,
    pub url: String,
}

/// Matched schemes for one category, catalog order preserved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMatches {
    pub category: SchemeCategory,
    pub label: &'static str,
    pub schemes: Vec<SchemeRecord>,
}

/// Machine-readable payload attached to an eligibility-check reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredData {
    pub profile: UserProfile,
    pub matches: Vec<CategoryMatches>,
}

/// Reply returned from the chat endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<QuickReply>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<LinkButton>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<StructuredData>,
}

impl ChatReply {
    /// Plain text reply with no attachments
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quick_replies: None,
            buttons: None,
            structured_data: None,
        }
    }

    pub fn with_quick_replies(mut self, quick_replies: Vec<QuickReply>) -> Self {
        self.quick_replies = Some(quick_replies);
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<LinkButton>) -> Self {
        self.buttons = Some(buttons);
        self
    }

    pub fn with_structured_data(mut self, data: StructuredData) -> Self {
        self.structured_data = Some(data);
        self
    }
}
