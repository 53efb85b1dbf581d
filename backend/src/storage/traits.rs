//! # Storage Traits
//!
//! The owner-scoped store every entity collection is persisted through.
//! Every method takes the owning user id, so a record can never be read or
//! written through another user's session.

use anyhow::Result;
use async_trait::async_trait;
use shared::Record;

/// In-place edit applied to a stored record while it is locked for writing.
pub type RecordChange<'a, E> = Box<dyn FnOnce(&mut E) -> Result<()> + Send + 'a>;

#[async_trait]
pub trait EntityStore<E: Record>: Send + Sync {
    /// All records of `user_id`, newest first by recency, ties broken by
    /// creation time.
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<E>>;

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<E>>;

    async fn insert(&self, record: &E) -> Result<()>;

    /// Read, change and write back one record as a single step; concurrent
    /// updates of the same record never overwrite each other.
    /// Returns `None` when the owner has no such record. An error from
    /// `change` aborts without writing.
    async fn update_with<'a>(&'a self, user_id: &'a str, id: &'a str, change: RecordChange<'a, E>)
        -> Result<Option<E>>;

    /// Returns false when nothing was deleted.
    async fn delete(&self, user_id: &str, id: &str) -> Result<bool>;
}
