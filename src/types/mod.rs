// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource handles and readiness predicates.

pub mod readiness;
pub mod resource;

pub use readiness::ReadinessCondition;
pub use resource::{Kind, ResourceRef};
