//! JWT token handling
//!
//! Tokens are signed with HS256. The secret comes from configuration;
//! production mode requires one at startup, dev mode falls back to a
//! fixed insecure secret.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::UserRole;
use crate::types::{GatewayError, Result};

/// Payload stored in a JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (MongoDB ObjectId hex)
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// JWT issuer and verifier
#[derive(Clone)]
pub struct JwtValidator {
    secret: String,
    expiry_seconds: u64,
}

impl JwtValidator {
    /// Create a validator with the given secret
    ///
    /// Returns an error if the secret is empty or too short.
    pub fn new(secret: String, expiry_seconds: u64) -> Result<Self> {
        if secret.is_empty() {
            return Err(GatewayError::Config(
                "JWT secret is required in production mode".into(),
            ));
        }

        if secret.len() < 32 {
            return Err(GatewayError::Config(
                "JWT secret must be at least 32 characters".into(),
            ));
        }

        Ok(Self {
            secret,
            expiry_seconds,
        })
    }

    /// Create a validator for dev mode with a fixed insecure secret
    pub fn new_dev(expiry_seconds: u64) -> Self {
        Self {
            secret: "dev-mode-secret-not-for-production-use-123456".into(),
            expiry_seconds,
        }
    }

    /// Issue a token for an authenticated user
    ///
    /// Returns the encoded token and its expiry timestamp.
    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        role: UserRole,
    ) -> Result<(String, u64)> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| GatewayError::Auth(format!("System time error: {e}")))?
            .as_secs();
        let exp = now + self.expiry_seconds;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            iat: now,
            exp,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| GatewayError::Auth(format!("Failed to issue token: {e}")))?;

        Ok((token, exp))
    }

    /// Verify and decode a token
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|err| {
            use jsonwebtoken::errors::ErrorKind;
            let msg = match err.kind() {
                ErrorKind::ExpiredSignature => "Token expired",
                ErrorKind::InvalidToken => "Invalid token",
                ErrorKind::InvalidSignature => "Invalid signature",
                _ => "Token validation failed",
            };
            GatewayError::Auth(msg.to_string())
        })
    }
}

/// Extract a token from an Authorization header in "Bearer <token>" format
pub fn extract_token_from_header(auth_header: Option<&str>) -> Option<&str> {
    let token = auth_header?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> JwtValidator {
        JwtValidator::new(
            "test-secret-that-is-at-least-32-characters-long".into(),
            3600,
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let validator = test_validator();

        let (token, exp) = validator
            .issue("65f0c0ffee", "asha@example.com", "Asha", UserRole::User)
            .unwrap();
        assert!(!token.is_empty());

        let claims = validator.verify(&token).unwrap();
        assert_eq!(claims.sub, "65f0c0ffee");
        assert_eq!(claims.email, "asha@example.com");
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn test_invalid_token() {
        assert!(test_validator().verify("invalid-token").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = test_validator();
        let other = JwtValidator::new(
            "different-secret-that-is-at-least-32-characters".into(),
            3600,
        )
        .unwrap();

        let (token, _) = issuer
            .issue("65f0c0ffee", "asha@example.com", "Asha", UserRole::Admin)
            .unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_secret_validation() {
        assert!(JwtValidator::new("short".into(), 3600).is_err());
        assert!(JwtValidator::new("".into(), 3600).is_err());
        assert!(JwtValidator::new("this-secret-is-at-least-32-chars-long".into(), 3600).is_ok());
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(
            extract_token_from_header(Some("Bearer abc123")),
            Some("abc123")
        );
        assert_eq!(extract_token_from_header(None), None);
        assert_eq!(extract_token_from_header(Some("")), None);
        assert_eq!(extract_token_from_header(Some("Bearer ")), None);
        assert_eq!(extract_token_from_header(Some("Basic abc123")), None);
    }
}
