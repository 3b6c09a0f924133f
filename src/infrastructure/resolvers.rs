// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Source Resolvers
//!
//! Concrete `SourceResolver` implementations. `LocalDirectoryResolver`
//! reads a bundle straight off the filesystem; `FixtureResolver` serves
//! pre-registered bundles from memory and stands in for the external store
//! and git fetchers in tests and embedded setups.

use crate::domain::source::{BundleLocator, RawBundle, ResolutionError, SourceResolver};
use async_trait::async_trait;
use dashmap::DashMap;
use std::path::Path;
use walkdir::WalkDir;

// ============================================================================
// Local Directory Resolver
// ============================================================================

/// Resolves `Local` locators by walking the directory tree and collecting
/// every regular file, keyed by its `/`-separated relative path.
#[derive(Default)]
pub struct LocalDirectoryResolver;

impl LocalDirectoryResolver {
    pub fn new() -> Self {
        Self
    }

    fn read_directory(root: &Path) -> Result<RawBundle, ResolutionError> {
        let locator = root.display().to_string();
        if !root.is_dir() {
            return Err(ResolutionError::NotFound(locator));
        }
        let mut bundle = RawBundle::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|e| ResolutionError::Io {
                locator: locator.clone(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| ResolutionError::Io {
                    locator: locator.clone(),
                    reason: e.to_string(),
                })?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let bytes = std::fs::read(entry.path()).map_err(|e| ResolutionError::Io {
                locator: locator.clone(),
                reason: e.to_string(),
            })?;
            bundle.insert(key, bytes);
        }
        if bundle.is_empty() {
            return Err(ResolutionError::Io {
                locator,
                reason: "directory contains no files".to_string(),
            });
        }
        Ok(bundle)
    }
}

#[async_trait]
impl SourceResolver for LocalDirectoryResolver {
    async fn resolve(&self, locator: &BundleLocator) -> Result<RawBundle, ResolutionError> {
        match locator {
            BundleLocator::Local { path } => {
                let path = path.clone();
                // Bundle trees are small; reading synchronously on the
                // worker thread keeps the resolver dependency-free.
                tokio::task::spawn_blocking(move || Self::read_directory(&path))
                    .await
                    .map_err(|e| ResolutionError::Io {
                        locator: locator.to_string(),
                        reason: e.to_string(),
                    })?
            }
            other => Err(ResolutionError::UnsupportedSource(other.to_string())),
        }
    }
}

// ============================================================================
// Fixture Resolver
// ============================================================================

/// In-memory resolver keyed by the locator's display form.
#[derive(Default)]
pub struct FixtureResolver {
    bundles: DashMap<String, RawBundle>,
}

impl FixtureResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bundle under a locator.
    pub fn register(&self, locator: &BundleLocator, bundle: RawBundle) {
        self.bundles.insert(locator.to_string(), bundle);
    }
}

#[async_trait]
impl SourceResolver for FixtureResolver {
    async fn resolve(&self, locator: &BundleLocator) -> Result<RawBundle, ResolutionError> {
        self.bundles
            .get(&locator.to_string())
            .map(|bundle| bundle.clone())
            .ok_or_else(|| ResolutionError::NotFound(locator.to_string()))
    }
}
