// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The single seam through which the orchestrator talks to a cluster.

use super::{apply_manifest, delete_if_present, ensure_namespace_exists, get_service, wait_for_gate};
use crate::error::Result;
use crate::plan::{ManifestRef, ReadinessGate};
use crate::types::ResourceRef;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;
use kube::Client;
use std::time::Duration;
use tracing::debug;

/// Cluster operations a deploy or cleanup run is made of
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Create the namespace unless it already exists
    async fn ensure_namespace(&self, namespace: &str) -> Result<()>;

    /// Apply every document of the manifest into `namespace`
    async fn apply(&self, manifest: &ManifestRef, namespace: &str) -> Result<()>;

    /// Block until the gate is satisfied or its timeout elapses
    async fn wait_ready(&self, gate: &ReadinessGate) -> Result<()>;

    /// Delete a resource if present; returns whether it existed
    async fn delete(&self, resource: &ResourceRef) -> Result<bool>;

    async fn get_service(&self, namespace: &str, name: &str) -> Result<Option<Service>>;
}

/// `ClusterApi` backed by a kube client
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    poll_interval: Duration,
}

impl KubeCluster {
    pub fn new(client: Client, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn ensure_namespace(&self, namespace: &str) -> Result<()> {
        ensure_namespace_exists(&self.client, namespace).await
    }

    async fn apply(&self, manifest: &ManifestRef, namespace: &str) -> Result<()> {
        let count = apply_manifest(&self.client, &manifest.path, namespace).await?;
        debug!("Applied {} document(s) for {}", count, manifest.resource);
        Ok(())
    }

    async fn wait_ready(&self, gate: &ReadinessGate) -> Result<()> {
        wait_for_gate(&self.client, gate, self.poll_interval).await
    }

    async fn delete(&self, resource: &ResourceRef) -> Result<bool> {
        delete_if_present(&self.client, resource).await
    }

    async fn get_service(&self, namespace: &str, name: &str) -> Result<Option<Service>> {
        get_service(&self.client, namespace, name).await
    }
}
