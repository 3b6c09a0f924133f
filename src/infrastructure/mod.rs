// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod registry;
pub mod resolvers;
pub mod store;
pub mod executor;
pub mod event_bus;

pub use event_bus::{EventBus, EventBusError, EventReceiver};
