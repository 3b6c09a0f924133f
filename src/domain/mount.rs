// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Mount Point Domain Model
//!
//! Mount paths are the routing keys of the system: within one namespace at
//! most one bundle is active per mount path at any time. Paths are
//! normalized and validated at construction so that every `MountPath` in
//! circulation is a well-formed registry key.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Namespace handles, mount path value object, registry entry

use crate::domain::bundle::BundleDescriptor;
use crate::domain::registry::MountRegistry;
use crate::domain::store::PersistentStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Value Objects
// ============================================================================

/// Unique identifier for a namespace (a tenant "database")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceId(pub Uuid);

impl NamespaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NamespaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mount path validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MountPathError {
    #[error("Mount path must start with '/': {0}")]
    MissingLeadingSlash(String),

    #[error("Mount path contains an empty segment: {0}")]
    EmptySegment(String),

    #[error("Mount path segment '{0}' is reserved for system services")]
    ReservedSegment(String),

    #[error("Mount path segment '{0}' contains invalid characters")]
    InvalidSegment(String),

    #[error("Mount path must name at least one segment")]
    Empty,
}

/// A normalized mount path, unique as a key within one namespace's registry.
///
/// Normalization rules:
/// - must start with `/` and name at least one segment
/// - a single trailing `/` is stripped
/// - segments match `[a-zA-Z0-9][a-zA-Z0-9_.-]*`; `.` and `..` are rejected
/// - segments starting with `_` are reserved for the system and rejected
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MountPath(String);

impl MountPath {
    /// Parse and normalize a raw mount path string.
    pub fn parse(raw: &str) -> Result<Self, MountPathError> {
        let trimmed = raw.strip_suffix('/').unwrap_or(raw);
        if trimmed.is_empty() {
            return Err(MountPathError::Empty);
        }
        if !trimmed.starts_with('/') {
            return Err(MountPathError::MissingLeadingSlash(raw.to_string()));
        }
        for segment in trimmed[1..].split('/') {
            if segment.is_empty() {
                return Err(MountPathError::EmptySegment(raw.to_string()));
            }
            if segment == "." || segment == ".." || segment.starts_with('_') {
                return Err(MountPathError::ReservedSegment(segment.to_string()));
            }
            let mut chars = segment.chars();
            let head_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
            let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
            if !head_ok || !tail_ok {
                return Err(MountPathError::InvalidSegment(segment.to_string()));
            }
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MountPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MountPath {
    type Error = MountPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MountPath> for String {
    fn from(value: MountPath) -> Self {
        value.0
    }
}

// ============================================================================
// Registry Entry
// ============================================================================

/// The active deployment at one mount path.
///
/// Mutated only by the lifecycle orchestrator, and only via the registry's
/// atomic `commit`/`remove` operations.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub mount: MountPath,
    pub descriptor: Arc<BundleDescriptor>,
    pub activated_at: DateTime<Utc>,
}

impl RegistryEntry {
    pub fn new(mount: MountPath, descriptor: Arc<BundleDescriptor>) -> Self {
        Self {
            mount,
            descriptor,
            activated_at: Utc::now(),
        }
    }
}

// ============================================================================
// Namespace Handle
// ============================================================================

/// Handle to an isolated tenant context.
///
/// A namespace owns its mount registry and its persistent store; namespaces
/// never share mount state. Creation and destruction belong to an external
/// namespace manager; the lifecycle orchestrator only requires the handle
/// to stay valid for the duration of an operation.
#[derive(Clone)]
pub struct Namespace {
    id: NamespaceId,
    name: String,
    registry: Arc<dyn MountRegistry>,
    store: Arc<dyn PersistentStore>,
}

impl Namespace {
    pub fn new(
        name: impl Into<String>,
        registry: Arc<dyn MountRegistry>,
        store: Arc<dyn PersistentStore>,
    ) -> Self {
        Self {
            id: NamespaceId::new(),
            name: name.into(),
            registry,
            store,
        }
    }

    pub fn id(&self) -> NamespaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &Arc<dyn MountRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn PersistentStore> {
        &self.store
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}
