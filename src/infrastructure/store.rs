// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! In-Memory Persistent Store
//!
//! Collection-level store used for development and testing; a production
//! deployment plugs the real tenant storage engine in behind the same
//! `PersistentStore` seam.

use crate::domain::store::{PersistentStore, StoreError};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;

#[derive(Default)]
pub struct InMemoryStore {
    collections: DashMap<String, Vec<Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record into an existing collection (test/diagnostic aid).
    pub fn insert_record(&self, collection: &str, record: Value) -> Result<(), StoreError> {
        match self.collections.get_mut(collection) {
            Some(mut records) => {
                records.push(record);
                Ok(())
            }
            None => Err(StoreError::Backend(format!(
                "collection '{collection}' does not exist"
            ))),
        }
    }

    pub fn record_count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|records| records.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl PersistentStore for InMemoryStore {
    async fn create_collection(&self, name: &str) -> Result<(), StoreError> {
        match self.collections.entry(name.to_string()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Vec::new());
                Ok(())
            }
        }
    }

    async fn drop_collection(&self, name: &str) -> Result<(), StoreError> {
        // Drop-if-exists: absent collections are not an error.
        self.collections.remove(name);
        Ok(())
    }

    async fn collection_exists(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    async fn list_collections(&self) -> Vec<String> {
        self.collections.iter().map(|c| c.key().clone()).collect()
    }
}
