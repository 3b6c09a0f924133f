// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Bundle Sources
//!
//! Locators name where a bundle's raw content comes from (store reference,
//! git reference, or local path); resolvers turn a locator into that raw
//! content. The orchestrator is locator-agnostic; resolution failures are
//! normalized into validation failures before they reach a caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Locators
// ============================================================================

/// Where a bundle comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BundleLocator {
    /// Reference into the app store, by name
    Store { name: String },
    /// Git reference, `git:<repo>:<ref>`
    Git { repo: String, reference: String },
    /// Local filesystem directory
    Local { path: PathBuf },
}

impl BundleLocator {
    /// Parse an operator-supplied source string.
    ///
    /// `git:repo:ref` is a git reference; anything containing a path
    /// separator (or starting with `.`) is a local directory; everything
    /// else is a store reference by name.
    pub fn parse(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix("git:") {
            if let Some((repo, reference)) = rest.rsplit_once(':') {
                return Self::Git {
                    repo: repo.to_string(),
                    reference: reference.to_string(),
                };
            }
            return Self::Git {
                repo: rest.to_string(),
                reference: "HEAD".to_string(),
            };
        }
        if raw.contains('/') || raw.starts_with('.') {
            return Self::Local {
                path: PathBuf::from(raw),
            };
        }
        Self::Store {
            name: raw.to_string(),
        }
    }
}

impl std::fmt::Display for BundleLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store { name } => write!(f, "{name}"),
            Self::Git { repo, reference } => write!(f, "git:{repo}:{reference}"),
            Self::Local { path } => write!(f, "{}", path.display()),
        }
    }
}

// ============================================================================
// Raw Content
// ============================================================================

/// Unvalidated bundle content: relative file path -> bytes.
///
/// Paths use `/` separators regardless of the resolver's platform.
#[derive(Debug, Clone, Default)]
pub struct RawBundle {
    files: BTreeMap<String, Vec<u8>>,
}

impl RawBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    pub fn with_file(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn file(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Content handle: sha-256 over all files in path order.
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        for (path, bytes) in &self.files {
            hasher.update(path.as_bytes());
            hasher.update([0u8]);
            hasher.update((bytes.len() as u64).to_be_bytes());
            hasher.update(bytes);
        }
        hex::encode(hasher.finalize())
    }
}

// ============================================================================
// Resolver Seam
// ============================================================================

/// Resolution errors, surfaced to callers as `InvalidBundle`
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Bundle source not found: {0}")]
    NotFound(String),

    #[error("Unsupported bundle source: {0}")]
    UnsupportedSource(String),

    #[error("Failed to read bundle source {locator}: {reason}")]
    Io { locator: String, reason: String },
}

/// External collaborator producing a bundle's raw file contents.
///
/// Implementations: `LocalDirectoryResolver` (local paths),
/// `FixtureResolver` (in-memory, tests and embedding). Registry-store and
/// git fetchers plug in behind the same seam.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    async fn resolve(&self, locator: &BundleLocator) -> Result<RawBundle, ResolutionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_store_locator() {
        assert_eq!(
            BundleLocator::parse("itzpapalotl"),
            BundleLocator::Store {
                name: "itzpapalotl".to_string()
            }
        );
    }

    #[test]
    fn parses_git_locator() {
        assert_eq!(
            BundleLocator::parse("git:arangodb/itzpapalotl:v1.2.0"),
            BundleLocator::Git {
                repo: "arangodb/itzpapalotl".to_string(),
                reference: "v1.2.0".to_string(),
            }
        );
    }

    #[test]
    fn git_locator_defaults_reference() {
        assert_eq!(
            BundleLocator::parse("git:myrepo"),
            BundleLocator::Git {
                repo: "myrepo".to_string(),
                reference: "HEAD".to_string(),
            }
        );
    }

    #[test]
    fn parses_local_locator() {
        assert_eq!(
            BundleLocator::parse("./test-data/apps/itzpapalotl"),
            BundleLocator::Local {
                path: PathBuf::from("./test-data/apps/itzpapalotl")
            }
        );
    }

    #[test]
    fn checksum_is_content_sensitive() {
        let a = RawBundle::new().with_file("manifest.json", "{}");
        let b = RawBundle::new().with_file("manifest.json", "{ }");
        let a2 = RawBundle::new().with_file("manifest.json", "{}");
        assert_ne!(a.checksum(), b.checksum());
        assert_eq!(a.checksum(), a2.checksum());
    }

    #[test]
    fn checksum_is_path_sensitive() {
        let a = RawBundle::new().with_file("a", "x").with_file("b", "");
        let b = RawBundle::new().with_file("a", "").with_file("b", "x");
        assert_ne!(a.checksum(), b.checksum());
    }
}
