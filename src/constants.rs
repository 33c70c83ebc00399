// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Field manager used for server-side apply
pub const FIELD_MANAGER: &str = "llm-rollout";

/// Namespace every study resource is deployed into unless overridden
pub const DEFAULT_NAMESPACE: &str = "llm-test";

/// Manifest directory, relative to the working directory
pub const DEFAULT_MANIFEST_DIR: &str = "manifests";

/// Readiness gate polling
pub mod readiness {
    /// Interval between status checks while a gate is pending
    pub const POLL_INTERVAL_SECS: u64 = 2;
    pub const PVC_BOUND_TIMEOUT_SECS: u64 = 300;
    pub const REDIS_AVAILABLE_TIMEOUT_SECS: u64 = 300;
    pub const BASELINE_AVAILABLE_TIMEOUT_SECS: u64 = 600;
    /// vLLM pulls model weights on first start, hence the longer window
    pub const OPTIMIZED_AVAILABLE_TIMEOUT_SECS: u64 = 900;
    pub const SCALER_READY_TIMEOUT_SECS: u64 = 120;
}

/// Service access
pub mod access {
    /// Port the LLM services listen on
    pub const SERVICE_PORT: u16 = 80;
    /// Local port suggested for port-forwarding
    pub const LOCAL_FORWARD_PORT: u16 = 8080;
    pub const PORT_FORWARD_VERB: &str = "kubectl port-forward";
}

/// Names of the resources the study manifests declare
pub mod names {
    pub const MODEL_CACHE_PVC: &str = "model-cache-pvc";
    pub const REDIS: &str = "redis-cache";
    pub const BASELINE_DEPLOYMENT: &str = "llm-baseline";
    pub const BASELINE_SERVICE: &str = "llm-baseline-service";
    pub const OPTIMIZED_DEPLOYMENT: &str = "llm-optimized";
    pub const OPTIMIZED_SERVICE: &str = "llm-optimized-service";
    pub const OPTIMIZED_SCALER: &str = "llm-optimized-scaler";
    pub const DESTINATION_RULE: &str = "llm-optimized-destination";
    pub const VIRTUAL_SERVICE: &str = "llm-optimized-routes";
}
