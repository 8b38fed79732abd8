//! Conversational dispatcher
//!
//! Stateless across turns: each incoming message is parsed at the
//! boundary into a tagged `MessageKind`, then dispatched to a canned
//! reply or to the eligibility matcher. The `sender` field is an opaque
//! correlation key and is never stored.

pub mod dispatcher;
pub mod message;
pub mod reply;

pub use dispatcher::dispatch;
pub use message::{parse_message, ChatRequest, MessageKind};
pub use reply::{CategoryMatches, ChatReply, LinkButton, QuickReply, StructuredData};
