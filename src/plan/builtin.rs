// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The baseline and optimized deployment plans shipped with the study manifests.

use super::{ManifestRef, Plan, ReadinessGate, Step, Variant};
use crate::config::Config;
use crate::constants::names;
use crate::constants::readiness::{
    BASELINE_AVAILABLE_TIMEOUT_SECS, OPTIMIZED_AVAILABLE_TIMEOUT_SECS, PVC_BOUND_TIMEOUT_SECS,
    REDIS_AVAILABLE_TIMEOUT_SECS, SCALER_READY_TIMEOUT_SECS,
};
use crate::error::Result;
use crate::types::{Kind, ReadinessCondition, ResourceRef};
use std::time::Duration;

/// Build the built-in plan for `variant`, with manifest paths under the configured directory
pub fn builtin_plan(variant: Variant, config: &Config) -> Result<Plan> {
    let plan = PlanBuilder::new(config);
    match variant {
        Variant::Baseline => baseline(plan),
        Variant::Optimized => optimized(plan),
    }
}

fn baseline(mut plan: PlanBuilder<'_>) -> Result<Plan> {
    let pvc = plan.resource(Kind::PersistentVolumeClaim, names::MODEL_CACHE_PVC);
    let service = plan.resource(Kind::Service, names::BASELINE_SERVICE);
    let deployment = plan.resource(Kind::Deployment, names::BASELINE_DEPLOYMENT);

    plan.apply(&pvc, "storage/model-cache-pvc.yaml", &[]);
    plan.wait(&pvc, ReadinessCondition::phase("Bound"), PVC_BOUND_TIMEOUT_SECS);
    plan.apply(&service, "baseline/service.yaml", &[]);
    plan.apply(&deployment, "baseline/deployment.yaml", &[&pvc]);
    plan.wait(
        &deployment,
        ReadinessCondition::condition("Available"),
        BASELINE_AVAILABLE_TIMEOUT_SECS,
    );

    plan.build(Variant::Baseline, names::BASELINE_SERVICE)
}

fn optimized(mut plan: PlanBuilder<'_>) -> Result<Plan> {
    let pvc = plan.resource(Kind::PersistentVolumeClaim, names::MODEL_CACHE_PVC);
    let redis = plan.resource(Kind::Deployment, names::REDIS);
    let service = plan.resource(Kind::Service, names::OPTIMIZED_SERVICE);
    let deployment = plan.resource(Kind::Deployment, names::OPTIMIZED_DEPLOYMENT);
    let scaler = plan.resource(Kind::ScaledObject, names::OPTIMIZED_SCALER);
    let destination_rule = plan.resource(Kind::DestinationRule, names::DESTINATION_RULE);
    let virtual_service = plan.resource(Kind::VirtualService, names::VIRTUAL_SERVICE);

    plan.apply(&pvc, "storage/model-cache-pvc.yaml", &[]);
    plan.wait(&pvc, ReadinessCondition::phase("Bound"), PVC_BOUND_TIMEOUT_SECS);

    plan.apply(&redis, "cache/redis.yaml", &[]);
    plan.wait(
        &redis,
        ReadinessCondition::condition("Available"),
        REDIS_AVAILABLE_TIMEOUT_SECS,
    );

    plan.apply(&service, "optimized/service.yaml", &[]);
    plan.apply(&deployment, "optimized/deployment.yaml", &[&pvc, &redis]);
    plan.wait(
        &deployment,
        ReadinessCondition::condition("Available"),
        OPTIMIZED_AVAILABLE_TIMEOUT_SECS,
    );

    plan.apply(&scaler, "autoscaling/keda-scaledobject.yaml", &[&deployment]);
    plan.wait(
        &scaler,
        ReadinessCondition::condition("Ready"),
        SCALER_READY_TIMEOUT_SECS,
    );

    plan.apply(&destination_rule, "mesh/destination-rule.yaml", &[&service]);
    plan.apply(&virtual_service, "mesh/virtual-service.yaml", &[&service]);

    plan.build(Variant::Optimized, names::OPTIMIZED_SERVICE)
}

/// Every resource any plan creates, for the cleanup run
pub fn cleanup_targets(namespace: &str) -> Vec<ResourceRef> {
    let r = |kind: Kind, name: &str| ResourceRef::namespaced(kind, namespace, name);
    vec![
        // baseline
        r(Kind::Deployment, names::BASELINE_DEPLOYMENT),
        r(Kind::Service, names::BASELINE_SERVICE),
        // optimized
        r(Kind::Deployment, names::OPTIMIZED_DEPLOYMENT),
        r(Kind::Service, names::OPTIMIZED_SERVICE),
        r(Kind::ScaledObject, names::OPTIMIZED_SCALER),
        // storage and cache
        r(Kind::PersistentVolumeClaim, names::MODEL_CACHE_PVC),
        r(Kind::Deployment, names::REDIS),
        r(Kind::Service, names::REDIS),
        // mesh
        r(Kind::DestinationRule, names::DESTINATION_RULE),
        r(Kind::VirtualService, names::VIRTUAL_SERVICE),
    ]
}

struct PlanBuilder<'a> {
    config: &'a Config,
    steps: Vec<Step>,
}

impl<'a> PlanBuilder<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            steps: Vec::new(),
        }
    }

    fn resource(&self, kind: Kind, name: &str) -> ResourceRef {
        ResourceRef::namespaced(kind, &self.config.namespace, name)
    }

    fn apply(&mut self, resource: &ResourceRef, path: &str, depends_on: &[&ResourceRef]) {
        let manifest = ManifestRef {
            resource: resource.clone(),
            path: self.config.manifest_dir.join(path),
            depends_on: depends_on.iter().map(|r| (*r).clone()).collect(),
        };
        self.steps.push(Step::Apply(manifest));
    }

    fn wait(&mut self, resource: &ResourceRef, condition: ReadinessCondition, timeout_secs: u64) {
        self.steps.push(Step::Wait(ReadinessGate::new(
            resource.clone(),
            condition,
            Duration::from_secs(timeout_secs),
        )));
    }

    fn build(self, variant: Variant, service: &str) -> Result<Plan> {
        Plan::new(variant, &self.config.namespace, service, self.steps)
    }
}
