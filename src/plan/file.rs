// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom plans read from YAML.
//!
//! ```yaml
//! variant: optimized
//! service: llm-optimized-service
//! steps:
//!   - step: apply
//!     kind: PersistentVolumeClaim
//!     name: model-cache-pvc
//!     path: storage/model-cache-pvc.yaml
//!   - step: wait
//!     kind: PersistentVolumeClaim
//!     name: model-cache-pvc
//!     for: phase=Bound
//!     timeout_secs: 300
//! ```

use super::{ManifestRef, Plan, ReadinessGate, Step, Variant};
use crate::config::Config;
use crate::error::{Result, RolloutError};
use crate::types::{Kind, ReadinessCondition, ResourceRef};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanFile {
    variant: Variant,
    service: String,
    steps: Vec<StepSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
enum StepSpec {
    Apply {
        kind: Kind,
        name: String,
        path: PathBuf,
        #[serde(default)]
        depends_on: Vec<ResourceSpec>,
    },
    Wait {
        kind: Kind,
        name: String,
        #[serde(rename = "for")]
        condition: ReadinessCondition,
        timeout_secs: u64,
    },
}

#[derive(Debug, Deserialize)]
struct ResourceSpec {
    kind: Kind,
    name: String,
}

impl Plan {
    /// Read and validate a plan file
    pub fn load(path: &Path, config: &Config) -> Result<Plan> {
        debug!("Loading plan from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            RolloutError::InvalidPlan(format!("Failed to read plan {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content, config)
    }

    /// Parse a plan; namespaced resources land in the configured namespace and
    /// relative manifest paths are resolved against the manifest directory
    pub fn from_yaml(content: &str, config: &Config) -> Result<Plan> {
        let file: PlanFile = serde_yaml::from_str(content)
            .map_err(|e| RolloutError::InvalidPlan(format!("Failed to parse plan: {}", e)))?;

        let resource = |kind: Kind, name: String| {
            ResourceRef {
                kind,
                namespace: None,
                name,
            }
            .with_default_namespace(&config.namespace)
        };

        let steps = file
            .steps
            .into_iter()
            .map(|spec| match spec {
                StepSpec::Apply {
                    kind,
                    name,
                    path,
                    depends_on,
                } => Step::Apply(ManifestRef {
                    resource: resource(kind, name),
                    path: resolve_manifest_path(&config.manifest_dir, path),
                    depends_on: depends_on
                        .into_iter()
                        .map(|d| resource(d.kind, d.name))
                        .collect(),
                }),
                StepSpec::Wait {
                    kind,
                    name,
                    condition,
                    timeout_secs,
                } => Step::Wait(ReadinessGate::new(
                    resource(kind, name),
                    condition,
                    Duration::from_secs(timeout_secs),
                )),
            })
            .collect();

        Plan::new(file.variant, &config.namespace, file.service, steps)
    }
}

fn resolve_manifest_path(manifest_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        manifest_dir.join(path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASELINE_PLAN: &str = r#"
variant: baseline
service: llm-baseline-service
steps:
  - step: apply
    kind: PersistentVolumeClaim
    name: model-cache-pvc
    path: storage/model-cache-pvc.yaml
  - step: wait
    kind: PersistentVolumeClaim
    name: model-cache-pvc
    for: phase=Bound
    timeout_secs: 60
  - step: apply
    kind: Deployment
    name: llm-baseline
    path: /abs/deployment.yaml
    depends_on:
      - kind: PersistentVolumeClaim
        name: model-cache-pvc
"#;

    #[test]
    fn test_from_yaml() {
        let plan = Plan::from_yaml(BASELINE_PLAN, &Config::default()).unwrap();

        assert_eq!(plan.variant, Variant::Baseline);
        assert_eq!(plan.service, "llm-baseline-service");
        assert_eq!(plan.steps().len(), 3);

        let Step::Wait(gate) = &plan.steps()[1] else {
            panic!("second step should be a wait");
        };
        assert_eq!(gate.condition, ReadinessCondition::phase("Bound"));
        assert_eq!(gate.timeout, Duration::from_secs(60));
        assert_eq!(gate.resource.namespace.as_deref(), Some("llm-test"));
    }

    #[test]
    fn test_manifest_paths_resolved() {
        let plan = Plan::from_yaml(BASELINE_PLAN, &Config::default()).unwrap();

        let paths: Vec<&PathBuf> = plan
            .steps()
            .iter()
            .filter_map(|s| match s {
                Step::Apply(m) => Some(&m.path),
                Step::Wait(_) => None,
            })
            .collect();
        assert_eq!(paths[0], &PathBuf::from("manifests/storage/model-cache-pvc.yaml"));
        assert_eq!(paths[1], &PathBuf::from("/abs/deployment.yaml"));
    }

    #[test]
    fn test_from_yaml_rejects_bad_ordering() {
        let yaml = r#"
variant: baseline
service: llm-baseline-service
steps:
  - step: apply
    kind: Deployment
    name: llm-baseline
    path: baseline/deployment.yaml
    depends_on:
      - kind: PersistentVolumeClaim
        name: model-cache-pvc
"#;
        let err = Plan::from_yaml(yaml, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("before its dependency"));
    }

    #[test]
    fn test_from_yaml_rejects_bad_condition() {
        let yaml = r#"
variant: baseline
service: llm-baseline-service
steps:
  - step: apply
    kind: PersistentVolumeClaim
    name: model-cache-pvc
    path: storage/model-cache-pvc.yaml
  - step: wait
    kind: PersistentVolumeClaim
    name: model-cache-pvc
    for: Bound
    timeout_secs: 60
"#;
        assert!(matches!(
            Plan::from_yaml(yaml, &Config::default()),
            Err(RolloutError::InvalidPlan(_))
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BASELINE_PLAN.as_bytes()).unwrap();

        let plan = Plan::load(file.path(), &Config::default()).unwrap();
        assert_eq!(plan.variant, Variant::Baseline);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Plan::load(Path::new("/nonexistent/plan.yaml"), &Config::default());
        assert!(matches!(result, Err(RolloutError::InvalidPlan(_))));
    }
}
