// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Bundle Validator
//!
//! Turns raw bundle content into a validated, immutable descriptor, or a
//! structural error, with no observable side effect on any namespace or
//! registry. This isolation is the linchpin of every failure-safety
//! guarantee the orchestrator makes: a bundle that fails validation is
//! never staged and never has a hook executed.

use crate::domain::bundle::{
    BundleDescriptor, BundleError, BundleManifest, HookKind, HookRef, RouteTable, MANIFEST_FILE,
};
use crate::domain::source::{BundleLocator, RawBundle};
use tracing::debug;

#[derive(Default)]
pub struct BundleValidator;

impl BundleValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate raw content and stage a descriptor.
    ///
    /// Checks, in order: the manifest parses and carries a legal name and
    /// version; the `main` entry point is present and parses into a route
    /// table; every declared script resolves to a file in the bundle that
    /// parses into a hook program.
    pub fn validate(
        &self,
        locator: &BundleLocator,
        raw: &RawBundle,
    ) -> Result<BundleDescriptor, BundleError> {
        let manifest_bytes = raw.file(MANIFEST_FILE).ok_or(BundleError::MissingManifest)?;
        let manifest = BundleManifest::parse(manifest_bytes)?;

        let main_bytes = raw
            .file(&manifest.main)
            .ok_or_else(|| BundleError::MissingEntryPoint(manifest.main.clone()))?;
        let routes = RouteTable::parse(&manifest.main, main_bytes)?;

        let setup = Self::resolve_hook(raw, HookKind::Setup, manifest.scripts.setup.as_deref())?;
        let teardown =
            Self::resolve_hook(raw, HookKind::Teardown, manifest.scripts.teardown.as_deref())?;

        debug!(
            name = %manifest.name,
            version = %manifest.version,
            routes = routes.len(),
            "Bundle validated"
        );

        Ok(BundleDescriptor {
            locator: locator.clone(),
            manifest,
            routes,
            setup,
            teardown,
            checksum: raw.checksum(),
        })
    }

    fn resolve_hook(
        raw: &RawBundle,
        kind: HookKind,
        file: Option<&str>,
    ) -> Result<Option<HookRef>, BundleError> {
        let Some(file) = file else {
            return Ok(None);
        };
        let bytes = raw.file(file).ok_or_else(|| BundleError::MissingScript {
            kind,
            file: file.to_string(),
        })?;
        HookRef::parse(kind, file, bytes).map(Some)
    }
}
