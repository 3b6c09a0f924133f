// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Lifecycle Orchestrator Application Service
//!
//! Drives install/uninstall/upgrade/replace as atomic state transitions
//! over a namespace's mount registry, coordinating:
//! - Domain layer: bundle validation, registry and executor seams
//! - Infrastructure layer: source resolvers, script executor
//! - Event bus: publishing `LifecycleEvent`s for observability
//!
//! Ordering rules, per operation:
//! - every candidate is resolved and validated before the registry or any
//!   persistent state is touched; a failing candidate leaves the mount
//!   byte-identical to before the call
//! - hook failures after the commit are surfaced but never auto-rolled
//!   back: validation-class errors mean "nothing changed", hook-class
//!   errors mean "mount changed, hook had trouble"
//! - lifecycle operations on the same (namespace, mount path) key are
//!   serialized by a per-key lock; registry readers are never blocked by
//!   hook execution

use crate::domain::bundle::{BundleDescriptor, BundleError};
use crate::domain::events::LifecycleEvent;
use crate::domain::mount::{MountPath, Namespace, NamespaceId};
use crate::domain::registry::MountRegistry as _;
use crate::domain::script::{HookError, ScriptExecutor};
use crate::domain::source::{BundleLocator, SourceResolver};
use crate::application::validator::BundleValidator;
use crate::infrastructure::event_bus::EventBus;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

// ============================================================================
// Errors
// ============================================================================

/// The operator-facing error taxonomy.
///
/// `InvalidBundle`, `MountConflict`, and `NotFound` always leave registry
/// state unchanged. `SetupFailed`/`TeardownFailed` mean the swap happened
/// (or, for teardown, went ahead) but a hook misbehaved. This is the
/// documented asymmetry, not an omission.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Invalid bundle: {0}")]
    InvalidBundle(#[from] BundleError),

    #[error("Mount point {0} already in use")]
    MountConflict(MountPath),

    #[error("No app installed at {0}")]
    NotFound(MountPath),

    #[error("App committed at {mount} but its setup hook failed: {source}")]
    SetupFailed {
        mount: MountPath,
        #[source]
        source: HookError,
    },

    #[error("Teardown hook of the app previously at {mount} failed: {source}")]
    TeardownFailed {
        mount: MountPath,
        #[source]
        source: HookError,
    },
}

// ============================================================================
// Service Trait
// ============================================================================

/// The four lifecycle operations; the complete per-mount state machine.
///
/// States per mount path are {absent, active(bundle)}; every operation
/// either re-enters active-with-new-bundle or moves to absent.
#[async_trait]
pub trait LifecycleService: Send + Sync {
    /// Deploy a bundle at a free mount point and run its setup hook.
    async fn install(
        &self,
        namespace: &Namespace,
        source: &BundleLocator,
        mount: &MountPath,
    ) -> Result<Arc<BundleDescriptor>, LifecycleError>;

    /// Detach the mount. Routing-level only: the removed bundle's teardown
    /// hook is not executed and its persistent state stays behind. With
    /// `force`, an absent mount is a successful no-op.
    async fn uninstall(
        &self,
        namespace: &Namespace,
        mount: &MountPath,
        force: bool,
    ) -> Result<Option<Arc<BundleDescriptor>>, LifecycleError>;

    /// In-place version bump preserving the app's persistent state: atomic
    /// swap, then the new bundle's setup hook. The old teardown never runs.
    async fn upgrade(
        &self,
        namespace: &Namespace,
        source: &BundleLocator,
        mount: &MountPath,
    ) -> Result<Arc<BundleDescriptor>, LifecycleError>;

    /// Full decommission-and-redeploy: old teardown, atomic swap, new
    /// setup. Destructive steps are strictly gated behind successful
    /// validation of the replacement.
    async fn replace(
        &self,
        namespace: &Namespace,
        source: &BundleLocator,
        mount: &MountPath,
    ) -> Result<Arc<BundleDescriptor>, LifecycleError>;
}

// ============================================================================
// Standard Implementation
// ============================================================================

pub struct StandardLifecycleService {
    resolver: Arc<dyn SourceResolver>,
    executor: Arc<dyn ScriptExecutor>,
    validator: BundleValidator,
    event_bus: Arc<EventBus>,
    // Serializes lifecycle operations per (namespace, mount path) key.
    // Never taken by registry readers, so lookups proceed during hooks.
    // Entries are retained for the process lifetime: one small mutex per
    // key ever operated on, bounded by the set of mounts.
    op_locks: DashMap<(NamespaceId, MountPath), Arc<Mutex<()>>>,
}

impl StandardLifecycleService {
    pub fn new(
        resolver: Arc<dyn SourceResolver>,
        executor: Arc<dyn ScriptExecutor>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            resolver,
            executor,
            validator: BundleValidator::new(),
            event_bus,
            op_locks: DashMap::new(),
        }
    }

    fn op_lock(&self, namespace: &Namespace, mount: &MountPath) -> Arc<Mutex<()>> {
        self.op_locks
            .entry((namespace.id(), mount.clone()))
            .or_default()
            .clone()
    }

    /// Resolve and validate a candidate. No registry access happens here:
    /// staging may run fully in parallel with traffic and with other
    /// mounts' lifecycle operations.
    async fn stage(
        &self,
        source: &BundleLocator,
    ) -> Result<Arc<BundleDescriptor>, LifecycleError> {
        let raw = self
            .resolver
            .resolve(source)
            .await
            .map_err(BundleError::from)?;
        let descriptor = self.validator.validate(source, &raw)?;
        debug!(source = %source, name = %descriptor.name(), "Candidate staged");
        Ok(Arc::new(descriptor))
    }

    async fn run_setup(
        &self,
        descriptor: &BundleDescriptor,
        namespace: &Namespace,
        mount: &MountPath,
    ) -> Result<(), LifecycleError> {
        let Some(hook) = &descriptor.setup else {
            return Ok(());
        };
        self.executor.run(hook, namespace).await.map_err(|source| {
            warn!(
                %mount,
                name = %descriptor.name(),
                error = %source,
                "Setup hook failed; the committed mount stays active"
            );
            LifecycleError::SetupFailed {
                mount: mount.clone(),
                source,
            }
        })
    }
}

#[async_trait]
impl LifecycleService for StandardLifecycleService {
    async fn install(
        &self,
        namespace: &Namespace,
        source: &BundleLocator,
        mount: &MountPath,
    ) -> Result<Arc<BundleDescriptor>, LifecycleError> {
        let candidate = self.stage(source).await?;

        let lock = self.op_lock(namespace, mount);
        let _guard = lock.lock().await;

        if namespace.registry().lookup(mount).is_some() {
            return Err(LifecycleError::MountConflict(mount.clone()));
        }
        let previous = namespace.registry().commit(mount, Arc::clone(&candidate));
        debug_assert!(previous.is_none(), "conflict check ran under the op lock");

        info!(
            namespace = %namespace.name(),
            %mount,
            name = %candidate.name(),
            version = %candidate.version(),
            "App installed"
        );
        self.event_bus.publish(LifecycleEvent::AppInstalled {
            namespace: namespace.id(),
            mount: mount.clone(),
            name: candidate.name().to_string(),
            version: candidate.version().to_string(),
            installed_at: Utc::now(),
        });

        self.run_setup(&candidate, namespace, mount).await?;
        Ok(candidate)
    }

    async fn uninstall(
        &self,
        namespace: &Namespace,
        mount: &MountPath,
        force: bool,
    ) -> Result<Option<Arc<BundleDescriptor>>, LifecycleError> {
        let lock = self.op_lock(namespace, mount);
        let _guard = lock.lock().await;

        match namespace.registry().remove(mount) {
            Some(descriptor) => {
                info!(
                    namespace = %namespace.name(),
                    %mount,
                    name = %descriptor.name(),
                    "App uninstalled"
                );
                self.event_bus.publish(LifecycleEvent::AppUninstalled {
                    namespace: namespace.id(),
                    mount: mount.clone(),
                    name: descriptor.name().to_string(),
                    version: descriptor.version().to_string(),
                    uninstalled_at: Utc::now(),
                });
                Ok(Some(descriptor))
            }
            None if force => {
                debug!(%mount, "Force uninstall on absent mount is a no-op");
                Ok(None)
            }
            None => Err(LifecycleError::NotFound(mount.clone())),
        }
    }

    async fn upgrade(
        &self,
        namespace: &Namespace,
        source: &BundleLocator,
        mount: &MountPath,
    ) -> Result<Arc<BundleDescriptor>, LifecycleError> {
        let candidate = self.stage(source).await?;

        let lock = self.op_lock(namespace, mount);
        let _guard = lock.lock().await;

        let Some(existing) = namespace.registry().lookup(mount) else {
            return Err(LifecycleError::NotFound(mount.clone()));
        };
        namespace.registry().commit(mount, Arc::clone(&candidate));

        info!(
            namespace = %namespace.name(),
            %mount,
            name = %candidate.name(),
            from = %existing.descriptor.version(),
            to = %candidate.version(),
            "App upgraded"
        );
        self.event_bus.publish(LifecycleEvent::AppUpgraded {
            namespace: namespace.id(),
            mount: mount.clone(),
            name: candidate.name().to_string(),
            version: candidate.version().to_string(),
            previous_version: existing.descriptor.version().to_string(),
            upgraded_at: Utc::now(),
        });

        // Only the new setup runs: upgrade is content replacement that
        // preserves previously created persistent state.
        self.run_setup(&candidate, namespace, mount).await?;
        Ok(candidate)
    }

    async fn replace(
        &self,
        namespace: &Namespace,
        source: &BundleLocator,
        mount: &MountPath,
    ) -> Result<Arc<BundleDescriptor>, LifecycleError> {
        let candidate = self.stage(source).await?;

        let lock = self.op_lock(namespace, mount);
        let _guard = lock.lock().await;

        let Some(existing) = namespace.registry().lookup(mount) else {
            return Err(LifecycleError::NotFound(mount.clone()));
        };

        // The candidate validated, so the destructive path is open. A
        // teardown failure is hook-class: it does not block the swap.
        let mut teardown_failure = None;
        if let Some(hook) = &existing.descriptor.teardown {
            if let Err(source) = self.executor.run(hook, namespace).await {
                warn!(
                    %mount,
                    name = %existing.descriptor.name(),
                    error = %source,
                    "Teardown hook of the replaced app failed; continuing with the swap"
                );
                teardown_failure = Some(source);
            }
        }

        namespace.registry().commit(mount, Arc::clone(&candidate));

        info!(
            namespace = %namespace.name(),
            %mount,
            old = %existing.descriptor.name(),
            new = %candidate.name(),
            "App replaced"
        );
        self.event_bus.publish(LifecycleEvent::AppReplaced {
            namespace: namespace.id(),
            mount: mount.clone(),
            name: candidate.name().to_string(),
            version: candidate.version().to_string(),
            previous_name: existing.descriptor.name().to_string(),
            previous_version: existing.descriptor.version().to_string(),
            replaced_at: Utc::now(),
        });

        self.run_setup(&candidate, namespace, mount).await?;

        if let Some(source) = teardown_failure {
            return Err(LifecycleError::TeardownFailed {
                mount: mount.clone(),
                source,
            });
        }
        Ok(candidate)
    }
}
