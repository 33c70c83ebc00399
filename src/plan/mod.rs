// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deployment plans: an ordered list of apply and wait steps.
//!
//! A plan is validated when it is built, so a run can never apply a workload
//! before the resources it depends on, or wait on something it never applied.

pub mod builtin;
pub mod file;

pub use builtin::{builtin_plan, cleanup_targets};

use crate::error::{Result, RolloutError};
use crate::types::{ReadinessCondition, ResourceRef};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Which deployment flavour of the study a plan sets up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Baseline,
    Optimized,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Baseline => "baseline",
            Variant::Optimized => "optimized",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A manifest file and the primary resource it declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRef {
    pub resource: ResourceRef,
    pub path: PathBuf,
    /// Resources that must be applied before this manifest
    pub depends_on: Vec<ResourceRef>,
}

impl ManifestRef {
    pub fn new(resource: ResourceRef, path: impl Into<PathBuf>) -> Self {
        Self {
            resource,
            path: path.into(),
            depends_on: Vec::new(),
        }
    }

    pub fn after(mut self, dependency: ResourceRef) -> Self {
        self.depends_on.push(dependency);
        self
    }
}

/// Block until `resource` satisfies `condition`, or fail after `timeout`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessGate {
    pub resource: ResourceRef,
    pub condition: ReadinessCondition,
    pub timeout: Duration,
}

impl ReadinessGate {
    pub fn new(resource: ResourceRef, condition: ReadinessCondition, timeout: Duration) -> Self {
        Self {
            resource,
            condition,
            timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Apply(ManifestRef),
    Wait(ReadinessGate),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Apply(m) => write!(f, "apply {} from {}", m.resource, m.path.display()),
            Step::Wait(g) => write!(
                f,
                "wait for {} to satisfy {} (timeout {}s)",
                g.resource,
                g.condition,
                g.timeout.as_secs()
            ),
        }
    }
}

/// A validated, ordered deployment plan
#[derive(Debug, Clone)]
pub struct Plan {
    pub variant: Variant,
    pub namespace: String,
    /// Service whose address is resolved once every step succeeded
    pub service: String,
    steps: Vec<Step>,
}

impl Plan {
    pub fn new(
        variant: Variant,
        namespace: impl Into<String>,
        service: impl Into<String>,
        steps: Vec<Step>,
    ) -> Result<Self> {
        let plan = Self {
            variant,
            namespace: namespace.into(),
            service: service.into(),
            steps,
        };
        plan.validate()?;
        Ok(plan)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Check the ordering invariants of the step list
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(RolloutError::InvalidPlan("plan has no steps".to_string()));
        }

        let mut applied: HashSet<&ResourceRef> = HashSet::new();

        for (index, step) in self.steps.iter().enumerate() {
            let position = index + 1;
            match step {
                Step::Apply(manifest) => {
                    self.check_namespace(&manifest.resource, position)?;
                    if let Some(missing) = manifest.depends_on.iter().find(|d| !applied.contains(d)) {
                        return Err(RolloutError::InvalidPlan(format!(
                            "step {}: {} is applied before its dependency {}",
                            position, manifest.resource, missing
                        )));
                    }
                    applied.insert(&manifest.resource);
                }
                Step::Wait(gate) => {
                    if !applied.contains(&gate.resource) {
                        return Err(RolloutError::InvalidPlan(format!(
                            "step {}: waits on {} which no earlier step applies",
                            position, gate.resource
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn check_namespace(&self, resource: &ResourceRef, position: usize) -> Result<()> {
        match resource.namespace.as_deref() {
            Some(ns) if ns != self.namespace => Err(RolloutError::InvalidPlan(format!(
                "step {}: {} is outside the plan namespace {}",
                position, resource, self.namespace
            ))),
            None if resource.kind.is_namespaced() => Err(RolloutError::InvalidPlan(format!(
                "step {}: {} has no namespace",
                position, resource
            ))),
            _ => Ok(()),
        }
    }
}
