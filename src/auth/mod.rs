//! Authentication: password hashing, JWT issuance and verification, roles

pub mod jwt;
pub mod password;
pub mod role;

pub use jwt::{extract_token_from_header, Claims, JwtValidator};
pub use password::{hash_password, verify_password};
pub use role::UserRole;
