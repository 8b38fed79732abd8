//! Database schemas
//!
//! MongoDB document structures for users, schemes, and applications.

mod application;
mod metadata;
mod scheme;
mod user;

pub use application::{ApplicationDoc, ApplicationStatus, APPLICATION_COLLECTION};
pub use metadata::Metadata;
pub use scheme::{SchemeDoc, SCHEME_COLLECTION};
pub use user::{UserDoc, USER_COLLECTION};
