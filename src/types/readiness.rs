// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Readiness predicates evaluated against a resource's `status`.

use crate::error::RolloutError;
use kube::api::DynamicObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// What a readiness gate waits for, written the way `kubectl wait --for` takes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReadinessCondition {
    /// `status.phase` equals the value, e.g. `phase=Bound`
    Phase(String),
    /// A `status.conditions[]` entry of this type has status `True`, e.g. `condition=Available`
    Condition(String),
}

impl ReadinessCondition {
    pub fn phase(phase: impl Into<String>) -> Self {
        ReadinessCondition::Phase(phase.into())
    }

    pub fn condition(condition_type: impl Into<String>) -> Self {
        ReadinessCondition::Condition(condition_type.into())
    }

    /// Check the condition against an object fetched from the cluster
    pub fn is_met(&self, obj: &DynamicObject) -> bool {
        self.is_met_on_status(obj.data.get("status"))
    }

    fn is_met_on_status(&self, status: Option<&Value>) -> bool {
        let Some(status) = status else {
            return false;
        };

        match self {
            ReadinessCondition::Phase(expected) => status
                .get("phase")
                .and_then(Value::as_str)
                .is_some_and(|phase| phase == expected),
            ReadinessCondition::Condition(condition_type) => status
                .get("conditions")
                .and_then(Value::as_array)
                .is_some_and(|conditions| {
                    conditions.iter().any(|c| {
                        let type_matches = c
                            .get("type")
                            .and_then(Value::as_str)
                            .is_some_and(|t| t.eq_ignore_ascii_case(condition_type));
                        let is_true = c.get("status").and_then(Value::as_str) == Some("True");
                        type_matches && is_true
                    })
                }),
        }
    }
}

impl fmt::Display for ReadinessCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessCondition::Phase(phase) => write!(f, "phase={}", phase),
            ReadinessCondition::Condition(condition_type) => write!(f, "condition={}", condition_type),
        }
    }
}

impl FromStr for ReadinessCondition {
    type Err = RolloutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, value)) = s.split_once('=') else {
            return Err(RolloutError::InvalidCondition(format!(
                "expected 'condition=<type>' or 'phase=<phase>', got '{}'",
                s
            )));
        };

        let value = value.trim();
        if value.is_empty() {
            return Err(RolloutError::InvalidCondition(format!("'{}' has an empty value", s)));
        }

        match key.trim() {
            "phase" => Ok(ReadinessCondition::phase(value)),
            "condition" => Ok(ReadinessCondition::condition(value)),
            other => Err(RolloutError::InvalidCondition(format!(
                "unknown condition key '{}' in '{}'",
                other, s
            ))),
        }
    }
}

impl TryFrom<String> for ReadinessCondition {
    type Error = RolloutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReadinessCondition> for String {
    fn from(condition: ReadinessCondition) -> Self {
        condition.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_object(value: Value) -> DynamicObject {
        serde_json::from_value(value).unwrap()
    }

    fn pvc(phase: &str) -> DynamicObject {
        make_object(json!({
            "apiVersion": "v1",
            "kind": "PersistentVolumeClaim",
            "metadata": { "name": "model-cache-pvc", "namespace": "llm-test" },
            "status": { "phase": phase }
        }))
    }

    fn deployment(conditions: Value) -> DynamicObject {
        make_object(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": "llm-baseline", "namespace": "llm-test" },
            "status": { "conditions": conditions }
        }))
    }

    #[test]
    fn test_phase_bound() {
        assert!(ReadinessCondition::phase("Bound").is_met(&pvc("Bound")));
    }

    #[test]
    fn test_phase_pending() {
        assert!(!ReadinessCondition::phase("Bound").is_met(&pvc("Pending")));
    }

    #[test]
    fn test_no_status() {
        let obj = make_object(json!({
            "apiVersion": "v1",
            "kind": "PersistentVolumeClaim",
            "metadata": { "name": "model-cache-pvc" }
        }));
        assert!(!ReadinessCondition::phase("Bound").is_met(&obj));
        assert!(!ReadinessCondition::condition("Available").is_met(&obj));
    }

    #[test]
    fn test_condition_available_case_insensitive() {
        let obj = deployment(json!([
            { "type": "Progressing", "status": "True" },
            { "type": "Available", "status": "True" }
        ]));
        assert!(ReadinessCondition::condition("available").is_met(&obj));
        assert!(ReadinessCondition::condition("Available").is_met(&obj));
    }

    #[test]
    fn test_condition_false_status() {
        let obj = deployment(json!([
            { "type": "Available", "status": "False", "reason": "MinimumReplicasUnavailable" }
        ]));
        assert!(!ReadinessCondition::condition("Available").is_met(&obj));
    }

    #[test]
    fn test_condition_missing_type() {
        let obj = deployment(json!([{ "type": "Progressing", "status": "True" }]));
        assert!(!ReadinessCondition::condition("Available").is_met(&obj));
    }

    #[test]
    fn test_scaled_object_ready() {
        let obj = make_object(json!({
            "apiVersion": "keda.sh/v1alpha1",
            "kind": "ScaledObject",
            "metadata": { "name": "llm-optimized-scaler" },
            "status": { "conditions": [
                { "type": "Ready", "status": "True" },
                { "type": "Active", "status": "False" }
            ]}
        }));
        assert!(ReadinessCondition::condition("Ready").is_met(&obj));
        assert!(!ReadinessCondition::condition("Active").is_met(&obj));
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "condition=Available".parse::<ReadinessCondition>().unwrap(),
            ReadinessCondition::condition("Available")
        );
        assert_eq!(
            "phase=Bound".parse::<ReadinessCondition>().unwrap(),
            ReadinessCondition::phase("Bound")
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("Available".parse::<ReadinessCondition>().is_err());
        assert!("condition=".parse::<ReadinessCondition>().is_err());
        assert!("delete=true".parse::<ReadinessCondition>().is_err());
    }

    #[test]
    fn test_display_matches_parse_input() {
        assert_eq!(ReadinessCondition::phase("Bound").to_string(), "phase=Bound");
        assert_eq!(
            ReadinessCondition::condition("Ready").to_string(),
            "condition=Ready"
        );
    }
}
