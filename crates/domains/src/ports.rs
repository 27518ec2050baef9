//! # Ports
//!
//! Any adapter must implement these traits to be wired into the binary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::document::{Document, Patch, Query, Snapshot};
use crate::errors::{StoreError, VerificationError};
use crate::models::VerifiedToken;

/// Collection-scoped document persistence.
///
/// Each call is atomic for the single document it touches; nothing spans
/// documents.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reserves a fresh, never reused document id.
    fn allocate_id(&self, collection: &str) -> String;

    /// Inserts a document under a freshly allocated id and returns the id.
    async fn add(&self, collection: &str, doc: Document) -> Result<String, StoreError>;

    /// Creates or replaces the document with the given id.
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Snapshot>, StoreError>;

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Snapshot>, StoreError>;

    /// Merges `patch` into an existing document. Fails with
    /// [`StoreError::Missing`] when the document does not exist.
    async fn update(&self, collection: &str, id: &str, patch: Patch) -> Result<(), StoreError>;

    /// Removes a document. Deleting a missing id is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Validates opaque bearer tokens issued by the identity provider.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedToken, VerificationError>;
}

/// Source of the current time for `createdAt`/`updatedAt`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
