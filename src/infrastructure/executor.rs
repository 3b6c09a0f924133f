// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Standard Script Executor
//!
//! Runs a resolved hook program directive-by-directive against the
//! namespace's persistent store. Directives execute in declared order and
//! the first failure aborts the hook; already-applied directives stay
//! applied (hooks are not transactions).

use crate::domain::bundle::{HookRef, StoreDirective};
use crate::domain::mount::Namespace;
use crate::domain::script::{HookError, ScriptExecutor};
use crate::domain::store::PersistentStore as _;
use async_trait::async_trait;
use tracing::debug;

#[derive(Default)]
pub struct StandardScriptExecutor;

impl StandardScriptExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScriptExecutor for StandardScriptExecutor {
    async fn run(&self, hook: &HookRef, namespace: &Namespace) -> Result<(), HookError> {
        for (index, directive) in hook.directives.iter().enumerate() {
            debug!(
                namespace = %namespace.id(),
                kind = %hook.kind,
                %directive,
                "Executing hook directive"
            );
            let result = match directive {
                StoreDirective::CreateCollection { collection } => {
                    namespace.store().create_collection(collection).await
                }
                StoreDirective::DropCollection { collection } => {
                    namespace.store().drop_collection(collection).await
                }
            };
            result.map_err(|source| HookError::Directive {
                kind: hook.kind,
                index,
                directive: directive.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}
