//! # Access Gate
//!
//! Resolves a bearer token to a [`CallerIdentity`]. The gate only signals
//! `Unauthenticated`; redirecting is left to the presentation layer.

use std::sync::Arc;

use domains::{
    CallerIdentity, DocumentStore, DomainError, IdentityVerifier, Result, UserProfile,
    USERS_COLLECTION,
};
use tracing::{debug, warn};

pub struct AccessGate {
    verifier: Arc<dyn IdentityVerifier>,
    /// When set, a profile record under `users/{subject}` is required.
    profiles: Option<Arc<dyn DocumentStore>>,
}

impl AccessGate {
    /// A gate that trusts the verifier alone.
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            verifier,
            profiles: None,
        }
    }

    /// Additionally require and load the caller's profile record.
    pub fn with_profiles(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.profiles = Some(store);
        self
    }

    /// Performs one verification call and at most one profile read. Never writes.
    pub async fn resolve(&self, token: Option<&str>) -> Result<CallerIdentity> {
        let token = match token.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Err(DomainError::Unauthenticated("missing token".into())),
        };

        let verified = self.verifier.verify(token).await.map_err(|e| {
            warn!(error = %e, "token verification failed");
            DomainError::Unauthenticated(e.to_string())
        })?;

        let Some(store) = &self.profiles else {
            debug!(subject = %verified.subject_id, "caller resolved");
            return Ok(CallerIdentity {
                subject_id: verified.subject_id,
                email: verified.email,
                display_name: None,
            });
        };

        let snapshot = store
            .get(USERS_COLLECTION, &verified.subject_id)
            .await
            .map_err(|e| {
                warn!(error = %e, subject = %verified.subject_id, "profile lookup failed");
                DomainError::Unauthenticated("profile unavailable".into())
            })?
            .ok_or_else(|| {
                warn!(subject = %verified.subject_id, "no profile record");
                DomainError::Unauthenticated("no profile record".into())
            })?;

        let profile: UserProfile = snapshot.decode().map_err(|e| {
            warn!(error = %e, "unreadable profile record");
            DomainError::Unauthenticated("unreadable profile".into())
        })?;

        debug!(subject = %verified.subject_id, "caller resolved with profile");
        Ok(CallerIdentity {
            subject_id: verified.subject_id,
            email: verified.email.or(profile.email),
            display_name: Some(profile.name),
        })
    }
}
