// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! In-Memory Mount Registry
//!
//! Concurrent map from mount path to active registry entry, backed by
//! `dashmap`. Single-node state per the system's scope; shard locking gives
//! linearizable `lookup`/`commit`/`remove` per key without a global lock,
//! so unrelated mounts stay fully concurrent.

use crate::domain::bundle::BundleDescriptor;
use crate::domain::mount::{MountPath, RegistryEntry};
use crate::domain::registry::MountRegistry;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct InMemoryMountRegistry {
    entries: DashMap<MountPath, RegistryEntry>,
}

impl InMemoryMountRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MountRegistry for InMemoryMountRegistry {
    fn lookup(&self, mount: &MountPath) -> Option<RegistryEntry> {
        self.entries.get(mount).map(|entry| entry.clone())
    }

    fn commit(
        &self,
        mount: &MountPath,
        descriptor: Arc<BundleDescriptor>,
    ) -> Option<Arc<BundleDescriptor>> {
        self.entries
            .insert(mount.clone(), RegistryEntry::new(mount.clone(), descriptor))
            .map(|previous| previous.descriptor)
    }

    fn remove(&self, mount: &MountPath) -> Option<Arc<BundleDescriptor>> {
        self.entries.remove(mount).map(|(_, entry)| entry.descriptor)
    }

    fn mounts(&self) -> Vec<MountPath> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }
}
