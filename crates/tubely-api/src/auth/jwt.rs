//! HS256 access tokens.
//!
//! Tokens carry the user id in `sub` and must name the configured issuer.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tubely_core::AppError;
use uuid::Uuid;

use crate::auth::models::JwtClaims;

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Malformed authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Couldn't find bearer token".to_string()))?;

    Ok(token)
}

/// Signs and validates access tokens with a shared secret.
#[derive(Clone)]
pub struct JwtAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
}

impl JwtAuthenticator {
    pub fn new(secret: &str, issuer: impl Into<String>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
        }
    }

    /// Issue a token for `user_id` valid for `ttl`.
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate a token and return the user id it was issued to.
    pub fn validate(&self, token: &str) -> Result<Uuid, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let token_data = decode::<JwtClaims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!("JWT validation failed: {}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Token has expired".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AppError::Unauthorized("Invalid token issuer".to_string())
                }
                _ => AppError::Unauthorized("Couldn't validate JWT".to_string()),
            }
        })?;

        Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_issue_and_validate() {
        let auth = JwtAuthenticator::new(SECRET, "tubely-access");
        let user_id = Uuid::new_v4();
        let token = auth.issue(user_id, Duration::hours(1)).unwrap();
        assert_eq!(auth.validate(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = JwtAuthenticator::new(SECRET, "tubely-access");
        let token = auth.issue(Uuid::new_v4(), Duration::hours(-2)).unwrap();
        let err = auth.validate(&token).unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized: Token has expired");
    }

    #[test]
    fn test_wrong_secret_or_issuer_rejected() {
        let issuer = JwtAuthenticator::new(SECRET, "tubely-access");
        let token = issuer.issue(Uuid::new_v4(), Duration::hours(1)).unwrap();

        let other_secret = JwtAuthenticator::new("ffffffffffffffffffffffffffffffff", "tubely-access");
        assert!(other_secret.validate(&token).is_err());

        let other_issuer = JwtAuthenticator::new(SECRET, "someone-else");
        assert!(other_issuer.validate(&token).is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
