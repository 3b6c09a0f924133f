// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Lifecycle Domain Events
//!
//! Published on the event bus after every successful registry transition.
//! Events describe the swap itself; hook outcomes travel on the operation's
//! return value, not here.

use crate::domain::mount::{MountPath, NamespaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    AppInstalled {
        namespace: NamespaceId,
        mount: MountPath,
        name: String,
        version: String,
        installed_at: DateTime<Utc>,
    },
    AppUpgraded {
        namespace: NamespaceId,
        mount: MountPath,
        name: String,
        version: String,
        previous_version: String,
        upgraded_at: DateTime<Utc>,
    },
    AppReplaced {
        namespace: NamespaceId,
        mount: MountPath,
        name: String,
        version: String,
        previous_name: String,
        previous_version: String,
        replaced_at: DateTime<Utc>,
    },
    AppUninstalled {
        namespace: NamespaceId,
        mount: MountPath,
        name: String,
        version: String,
        uninstalled_at: DateTime<Utc>,
    },
}

impl LifecycleEvent {
    /// The mount path this event concerns.
    pub fn mount(&self) -> &MountPath {
        match self {
            Self::AppInstalled { mount, .. }
            | Self::AppUpgraded { mount, .. }
            | Self::AppReplaced { mount, .. }
            | Self::AppUninstalled { mount, .. } => mount,
        }
    }
}
