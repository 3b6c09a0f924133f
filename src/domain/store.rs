// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Persistent Store Seam
//!
//! Collection-level primitives that setup/teardown hooks run against.
//! The store is owned by the namespace and outlives any bundle mounted in
//! it; hook-created collections are only removed by an explicit teardown.

use async_trait::async_trait;
use thiserror::Error;

/// Store errors surfaced through hook execution
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Collection '{0}' already exists")]
    AlreadyExists(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Tenant persistent store, scoped to one namespace.
///
/// `drop_collection` is idempotent (drop-if-exists) so that teardown hooks
/// can be replayed safely.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Create a collection; errors if one with that name already exists.
    async fn create_collection(&self, name: &str) -> Result<(), StoreError>;

    /// Drop a collection if it exists; absent collections are a no-op.
    async fn drop_collection(&self, name: &str) -> Result<(), StoreError>;

    /// Whether a collection currently exists.
    async fn collection_exists(&self, name: &str) -> bool;

    /// All collection names, for the operator surface and tests.
    async fn list_collections(&self) -> Vec<String>;
}
