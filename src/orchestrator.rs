// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deploy and cleanup runs.
//!
//! A deploy run stops at the first failing step. Resources applied before the
//! failure are left in place; `cleanup` removes them.

use crate::address::resolve_address;
use crate::error::Result;
use crate::kubernetes::ClusterApi;
use crate::plan::{Plan, Step};
use crate::report::{CleanupReport, DeploymentReport};
use crate::types::ResourceRef;
use tracing::{info, instrument};

pub struct Orchestrator<C> {
    cluster: C,
}

impl<C: ClusterApi> Orchestrator<C> {
    pub fn new(cluster: C) -> Self {
        Self { cluster }
    }

    /// Run every step of `plan` in order, then resolve the plan's service address
    #[instrument(skip(self, plan), fields(variant = %plan.variant, namespace = %plan.namespace))]
    pub async fn deploy(&self, plan: &Plan) -> Result<DeploymentReport> {
        plan.validate()?;

        info!("Deploying {} configuration", plan.variant);
        self.cluster.ensure_namespace(&plan.namespace).await?;

        let total = plan.steps().len();
        for (index, step) in plan.steps().iter().enumerate() {
            info!("[{}/{}] {}", index + 1, total, step);
            match step {
                Step::Apply(manifest) => self.cluster.apply(manifest, &plan.namespace).await?,
                Step::Wait(gate) => self.cluster.wait_ready(gate).await?,
            }
        }

        let service = self
            .cluster
            .get_service(&plan.namespace, &plan.service)
            .await?;
        let address = resolve_address(service.as_ref());
        info!("Service {} address: {}", plan.service, address);

        Ok(DeploymentReport {
            variant: plan.variant,
            namespace: plan.namespace.clone(),
            service: plan.service.clone(),
            address,
        })
    }

    /// Delete the namespace and every named resource; absent ones are skipped
    #[instrument(skip(self, targets))]
    pub async fn cleanup(&self, namespace: &str, targets: &[ResourceRef]) -> Result<CleanupReport> {
        let mut report = CleanupReport::default();

        let namespace_ref = ResourceRef::namespace(namespace);
        for resource in std::iter::once(&namespace_ref).chain(targets) {
            if self.cluster.delete(resource).await? {
                report.deleted.push(resource.clone());
            } else {
                report.absent.push(resource.clone());
            }
        }

        info!(
            "Cleanup finished: {} deleted, {} absent",
            report.deleted.len(),
            report.absent.len()
        );
        Ok(report)
    }
}
