// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, namespaces, manifests, readiness and deletes.

pub mod client;
pub mod cluster;
pub mod manifests;
pub mod namespaces;
pub mod resources;
pub mod wait;

pub use client::create_client;
pub use cluster::{ClusterApi, KubeCluster};
pub use manifests::{apply_manifest, load_manifest};
pub use namespaces::ensure_namespace_exists;
pub use resources::{delete_if_present, get_service};
pub use wait::wait_for_gate;
