// Copyright (c) 2026 appmount contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod bundle;
pub mod mount;
pub mod registry;
pub mod source;
pub mod script;
pub mod store;
pub mod events;
