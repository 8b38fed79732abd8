//! Scheme Gateway - HTTP API for government welfare scheme discovery
//!
//! Serves a read-only catalog of central and Tamil Nadu state welfare
//! schemes, a rule-based eligibility matcher, and a stateless chat
//! assistant, backed by MongoDB for accounts and scheme applications.
//!
//! ## Services
//!
//! - **Catalog**: immutable scheme listing loaded at startup
//! - **Matcher**: pure eligibility predicate over {age, income, occupation, state}
//! - **Chat**: canned-reply dispatcher over recognized message tokens
//! - **Auth**: argon2 password hashing with HS256 JWT sessions
//! - **Applications**: pending/approved/rejected review workflow

pub mod auth;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod db;
pub mod matcher;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{GatewayError, Result};
