// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod validator;
pub mod lifecycle;
pub mod dispatcher;

// Re-export the operator-facing surface for convenience
pub use lifecycle::{LifecycleError, LifecycleService, StandardLifecycleService};
pub use validator::BundleValidator;
