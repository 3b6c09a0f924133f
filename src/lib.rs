// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0
//! Application lifecycle manager.
//!
//! Deploys, upgrades, replaces, and removes self-contained service bundles
//! ("apps") at named mount points inside isolated tenant namespaces, and
//! routes live traffic to the currently active bundle at each mount point.
//!
//! # Architecture
//!
//! - **domain:** value objects, aggregates, and trait seams
//! - **application:** validator, lifecycle orchestrator, dispatcher glue
//! - **infrastructure:** in-memory registry/store, resolvers, script
//!   executor, event bus

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
