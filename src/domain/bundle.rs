// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Bundle Domain Model
//!
//! A bundle is a versioned, self-contained service package: a manifest, a
//! route table (the "controller"), and optional setup/teardown hooks. All
//! structural checking lives here so that a `BundleDescriptor` is immutable
//! and known-good by construction: a bundle that fails any check is never
//! staged into a registry and never has its hooks executed.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Manifest/route/hook parsing, validated bundle descriptor

use crate::domain::source::{BundleLocator, ResolutionError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// File every bundle must carry at its root.
pub const MANIFEST_FILE: &str = "manifest.json";

// ============================================================================
// Errors
// ============================================================================

/// Structural validation errors. Any of these means the candidate bundle
/// was rejected before any registry or store mutation.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Bundle has no {MANIFEST_FILE}")]
    MissingManifest,

    #[error("Manifest does not parse: {0}")]
    ManifestParse(String),

    #[error("Invalid bundle name '{0}': expected [a-z0-9][a-z0-9_-]*")]
    InvalidName(String),

    #[error("Bundle version must not be empty")]
    EmptyVersion,

    #[error("Entry point '{0}' is not present in the bundle")]
    MissingEntryPoint(String),

    #[error("Entry point '{file}' does not parse: {reason}")]
    EntryPointParse { file: String, reason: String },

    #[error("Route path '{0}' is not normalized (must start with '/')")]
    InvalidRoutePath(String),

    #[error("{kind} script '{file}' is not present in the bundle")]
    MissingScript { kind: HookKind, file: String },

    #[error("{kind} script '{file}' does not parse: {reason}")]
    ScriptParse {
        kind: HookKind,
        file: String,
        reason: String,
    },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

// ============================================================================
// Manifest
// ============================================================================

/// Script file references declared by a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teardown: Option<String>,
}

/// Parsed `manifest.json`.
///
/// ```json
/// {
///   "name": "itzpapalotl",
///   "version": "1.2.0",
///   "main": "index.json",
///   "scripts": { "setup": "scripts/setup.json", "teardown": "scripts/teardown.json" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    pub name: String,
    pub version: String,
    pub main: String,
    #[serde(default)]
    pub scripts: ScriptRefs,
}

impl BundleManifest {
    pub fn parse(bytes: &[u8]) -> Result<Self, BundleError> {
        let manifest: Self =
            serde_json::from_slice(bytes).map_err(|e| BundleError::ManifestParse(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), BundleError> {
        let mut chars = self.name.chars();
        let head_ok = chars.next().is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        let tail_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-'));
        if !head_ok || !tail_ok {
            return Err(BundleError::InvalidName(self.name.clone()));
        }
        if self.version.trim().is_empty() {
            return Err(BundleError::EmptyVersion);
        }
        Ok(())
    }
}

// ============================================================================
// Routes (the bundle "controller")
// ============================================================================

/// One route's canned response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub body: String,
}

fn default_status() -> u16 {
    200
}

/// The bundle's request handlers, keyed by path relative to the mount point.
///
/// Parsed once at validation time from the manifest's `main` file:
///
/// ```json
/// { "routes": { "/random": { "status": 200, "body": "{\"num\":4}" } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    routes: BTreeMap<String, RouteSpec>,
}

impl RouteTable {
    pub fn parse(file: &str, bytes: &[u8]) -> Result<Self, BundleError> {
        let table: Self = serde_json::from_slice(bytes).map_err(|e| BundleError::EntryPointParse {
            file: file.to_string(),
            reason: e.to_string(),
        })?;
        for path in table.routes.keys() {
            if !path.starts_with('/') {
                return Err(BundleError::InvalidRoutePath(path.clone()));
            }
        }
        Ok(table)
    }

    /// Look up the handler for a path relative to the mount point.
    pub fn resolve(&self, path: &str) -> Option<&RouteSpec> {
        let normalized = if path.is_empty() { "/" } else { path };
        self.routes.get(normalized)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

// ============================================================================
// Hooks
// ============================================================================

/// Which lifecycle hook a script implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    Setup,
    Teardown,
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::Teardown => write!(f, "teardown"),
        }
    }
}

/// One step of a hook program, scoped to the namespace's persistent store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum StoreDirective {
    /// Create a collection; fails if it already exists.
    CreateCollection { collection: String },
    /// Drop a collection if it exists (idempotent).
    DropCollection { collection: String },
}

impl std::fmt::Display for StoreDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateCollection { collection } => write!(f, "create-collection {collection}"),
            Self::DropCollection { collection } => write!(f, "drop-collection {collection}"),
        }
    }
}

/// A manifest-declared hook, resolved at validation time into a directly
/// invocable program; no name lookups happen during execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookRef {
    pub kind: HookKind,
    pub directives: Vec<StoreDirective>,
}

impl HookRef {
    pub fn parse(kind: HookKind, file: &str, bytes: &[u8]) -> Result<Self, BundleError> {
        let directives: Vec<StoreDirective> =
            serde_json::from_slice(bytes).map_err(|e| BundleError::ScriptParse {
                kind,
                file: file.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { kind, directives })
    }
}

// ============================================================================
// Descriptor
// ============================================================================

/// A validated, immutable bundle.
///
/// Exists only while staged by the orchestrator or as the active content of
/// some registry entry; superseded descriptors are discarded (their
/// persistent state is not; that ownership is decoupled by design).
#[derive(Debug, Clone)]
pub struct BundleDescriptor {
    pub locator: BundleLocator,
    pub manifest: BundleManifest,
    pub routes: RouteTable,
    pub setup: Option<HookRef>,
    pub teardown: Option<HookRef>,
    /// sha-256 over the raw bundle content.
    pub checksum: String,
}

impl BundleDescriptor {
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn version(&self) -> &str {
        &self.manifest.version
    }
}
