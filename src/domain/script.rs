// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Script Executor Seam
//!
//! Runs a bundle's resolved setup/teardown hooks against a namespace's
//! persistent store. Hooks run to completion or fail; there is no mid-hook
//! cancellation. A hook failure is reported to the caller of the lifecycle
//! operation that triggered it, and never retroactively undoes a registry
//! swap that already happened.

use crate::domain::bundle::{HookKind, HookRef};
use crate::domain::mount::Namespace;
use crate::domain::store::StoreError;
use async_trait::async_trait;
use thiserror::Error;

/// Hook execution errors
#[derive(Debug, Error)]
pub enum HookError {
    #[error("{kind} hook failed at directive {index} ({directive}): {source}")]
    Directive {
        kind: HookKind,
        index: usize,
        directive: String,
        #[source]
        source: StoreError,
    },
}

/// Executes tenant-declared hook programs with permission to create/drop
/// collections scoped to the namespace.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    async fn run(&self, hook: &HookRef, namespace: &Namespace) -> Result<(), HookError>;
}
