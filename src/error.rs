// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RolloutError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Namespace creation failed: {0}")]
    NamespaceError(String),

    #[error("Invalid manifest: {0}")]
    ManifestError(String),

    #[error("Failed to apply {resource}: {reason}")]
    ApplyError { resource: String, reason: String },

    #[error("Timed out after {}s waiting for {resource} to satisfy {condition}", .timeout.as_secs())]
    ReadinessTimeout {
        resource: String,
        condition: String,
        timeout: Duration,
    },

    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Invalid readiness condition: {0}")]
    InvalidCondition(String),
}

pub type Result<T> = std::result::Result<T, RolloutError>;
