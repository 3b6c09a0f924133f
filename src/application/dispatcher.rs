// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Request Dispatcher Glue
//!
//! The HTTP front door converts an inbound request into a
//! `(mount path, remaining path)` routing key; this glue looks the mount up
//! in the namespace's registry and answers from the active bundle's route
//! table. An absent mount yields a not-found outcome for the front door to
//! render; the dispatcher never mutates any registry state.

use crate::domain::mount::{MountPath, Namespace};
use crate::domain::registry::MountRegistry as _;
use tracing::debug;

/// What the front door should send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleResponse {
    pub status: u16,
    pub body: String,
}

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No bundle is mounted at the path; render 404.
    Unmounted,
    /// The active bundle answered (including its own 404 for unknown routes).
    Response(BundleResponse),
}

impl DispatchOutcome {
    pub fn status(&self) -> u16 {
        match self {
            Self::Unmounted => 404,
            Self::Response(response) => response.status,
        }
    }
}

#[derive(Default)]
pub struct MountDispatcher;

impl MountDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Route a request to the bundle active at `mount`, if any.
    pub fn dispatch(
        &self,
        namespace: &Namespace,
        mount: &MountPath,
        remaining: &str,
    ) -> DispatchOutcome {
        let Some(entry) = namespace.registry().lookup(mount) else {
            debug!(namespace = %namespace.name(), %mount, "No app mounted");
            return DispatchOutcome::Unmounted;
        };
        match entry.descriptor.routes.resolve(remaining) {
            Some(route) => DispatchOutcome::Response(BundleResponse {
                status: route.status,
                body: route.body.clone(),
            }),
            None => DispatchOutcome::Response(BundleResponse {
                status: 404,
                body: format!(
                    "{{\"error\":\"unknown route '{remaining}' in app '{}'\"}}",
                    entry.descriptor.name()
                ),
            }),
        }
    }
}
