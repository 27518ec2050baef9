//! # JWT identity verifier
//!
//! HS256 implementation of `IdentityVerifier`, plus the matching issuer used
//! by the seed tool and tests to mint development tokens.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use domains::{IdentityVerifier, VerificationError, VerifiedToken};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Claims carried by identity tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Stable subject identifier.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// `issuer`, when given, must match the token's `iss` claim.
    pub fn new(secret: &[u8], issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedToken, VerificationError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => VerificationError::Expired,
            _ => VerificationError::Invalid(e.to_string()),
        })?;

        debug!(subject = %data.claims.sub, "token verified");
        Ok(VerifiedToken {
            subject_id: data.claims.sub,
            email: data.claims.email,
        })
    }
}

/// Signs identity tokens with the same secret the verifier checks.
pub struct TokenIssuer {
    key: EncodingKey,
    issuer: Option<String>,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], issuer: Option<&str>) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            issuer: issuer.map(str::to_owned),
        }
    }

    pub fn issue(&self, subject: &str, email: Option<&str>, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_owned(),
            email: email.map(str::to_owned),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[tokio::test]
    async fn issued_token_verifies() {
        let token = TokenIssuer::new(SECRET, Some("whiteboard"))
            .issue("u1", Some("u1@example.com"), Duration::hours(1))
            .unwrap();

        let verified = JwtIdentityVerifier::new(SECRET, Some("whiteboard"))
            .verify(&token)
            .await
            .unwrap();
        assert_eq!(verified.subject_id, "u1");
        assert_eq!(verified.email.as_deref(), Some("u1@example.com"));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let token = TokenIssuer::new(SECRET, None)
            .issue("u1", None, Duration::hours(-2))
            .unwrap();

        let err = JwtIdentityVerifier::new(SECRET, None).verify(&token).await.unwrap_err();
        assert_eq!(err, VerificationError::Expired);
    }

    #[tokio::test]
    async fn foreign_signature_and_issuer_are_rejected() {
        let forged = TokenIssuer::new(b"other-secret", None)
            .issue("u1", None, Duration::hours(1))
            .unwrap();
        let verifier = JwtIdentityVerifier::new(SECRET, None);
        assert!(matches!(verifier.verify(&forged).await, Err(VerificationError::Invalid(_))));

        let wrong_issuer = TokenIssuer::new(SECRET, Some("elsewhere"))
            .issue("u1", None, Duration::hours(1))
            .unwrap();
        let strict = JwtIdentityVerifier::new(SECRET, Some("whiteboard"));
        assert!(matches!(strict.verify(&wrong_issuer).await, Err(VerificationError::Invalid(_))));
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        let verifier = JwtIdentityVerifier::new(SECRET, None);
        assert!(matches!(verifier.verify("not-a-jwt").await, Err(VerificationError::Invalid(_))));
    }
}
