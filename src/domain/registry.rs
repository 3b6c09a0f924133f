// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Mount Registry Seam
//!
//! Per-namespace map from mount path to the active bundle descriptor; the
//! single source of truth for routing. Interface defined in the domain
//! layer, implemented in `crate::infrastructure::registry`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `MountRegistry` | `RegistryEntry` | `InMemoryMountRegistry` |
//!
//! All three operations are linearizable per mount path key: readers never
//! observe a half-updated entry, and between any two successful operations
//! on the same key exactly one descriptor is active (or none), and it is
//! exactly the value the most recent successful `commit`/`remove` set.

use crate::domain::bundle::BundleDescriptor;
use crate::domain::mount::{MountPath, RegistryEntry};
use std::sync::Arc;

/// Routing state for one namespace.
///
/// Mutations go exclusively through the lifecycle orchestrator; the request
/// dispatcher only ever calls `lookup`.
pub trait MountRegistry: Send + Sync {
    /// O(1) read of the active entry; safe under concurrent readers.
    fn lookup(&self, mount: &MountPath) -> Option<RegistryEntry>;

    /// Atomically install `descriptor` as active at `mount`, returning
    /// whatever was previously active.
    fn commit(
        &self,
        mount: &MountPath,
        descriptor: Arc<BundleDescriptor>,
    ) -> Option<Arc<BundleDescriptor>>;

    /// Atomically clear the entry at `mount`, returning the previously
    /// active descriptor.
    fn remove(&self, mount: &MountPath) -> Option<Arc<BundleDescriptor>>;

    /// All currently mounted paths (operator surface).
    fn mounts(&self) -> Vec<MountPath>;
}
