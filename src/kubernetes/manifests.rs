// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Manifest loading and server-side apply.
//!
//! Manifests are passed through as-is; only `apiVersion`, `kind` and
//! `metadata.name` are read to route each document to the right endpoint.

use crate::constants::FIELD_MANAGER;
use crate::error::{Result, RolloutError};
use crate::types::Kind;
use kube::{
    api::{DynamicObject, Patch, PatchParams},
    core::GroupVersionKind,
    discovery::{self, ApiResource, Scope},
    Api, Client,
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Read every YAML document in a manifest file, skipping empty ones
pub fn load_manifest(path: &Path) -> Result<Vec<DynamicObject>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        RolloutError::ManifestError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_documents(&content)
        .map_err(|e| RolloutError::ManifestError(format!("{}: {}", path.display(), e)))
}

fn parse_documents(content: &str) -> std::result::Result<Vec<DynamicObject>, String> {
    let mut objects = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let value = serde_json::Value::deserialize(document)
            .map_err(|e| format!("document {}: {}", index + 1, e))?;
        if value.is_null() {
            continue;
        }

        let obj: DynamicObject = serde_json::from_value(value)
            .map_err(|e| format!("document {}: {}", index + 1, e))?;
        if obj.types.is_none() {
            return Err(format!("document {} has no apiVersion/kind", index + 1));
        }
        if obj.metadata.name.as_deref().unwrap_or_default().is_empty() {
            return Err(format!("document {} has no metadata.name", index + 1));
        }
        objects.push(obj);
    }

    Ok(objects)
}

/// Split an apiVersion into (group, version)
fn parse_api_version(api_version: &str) -> (&str, &str) {
    api_version.split_once('/').unwrap_or(("", api_version))
}

/// Resolve where a document is served and whether it is namespaced.
/// Known kinds are resolved locally; anything else goes through discovery.
async fn resolve_api_resource(client: &Client, obj: &DynamicObject) -> Result<(ApiResource, bool)> {
    let types = obj
        .types
        .as_ref()
        .ok_or_else(|| RolloutError::ManifestError("document has no apiVersion/kind".to_string()))?;
    let (group, version) = parse_api_version(&types.api_version);

    if let Some(kind) = Kind::from_kind_str(&types.kind).filter(|k| k.group() == group) {
        return Ok((kind.api_resource_for_version(version), kind.is_namespaced()));
    }

    debug!("Discovering {} {}", types.api_version, types.kind);
    let gvk = GroupVersionKind::gvk(group, version, &types.kind);
    let (ar, caps) = discovery::pinned_kind(client, &gvk).await.map_err(|e| {
        RolloutError::ManifestError(format!(
            "{} {} is not served by the cluster: {}",
            types.api_version, types.kind, e
        ))
    })?;
    Ok((ar, caps.scope == Scope::Namespaced))
}

/// Apply every document of a manifest into `namespace`; returns the number applied
#[instrument(skip(client), fields(manifest = %path.display()))]
pub async fn apply_manifest(client: &Client, path: &Path, namespace: &str) -> Result<usize> {
    let objects = load_manifest(path)?;
    let count = objects.len();

    for obj in objects {
        apply_object(client, obj, namespace).await?;
    }

    Ok(count)
}

async fn apply_object(client: &Client, mut obj: DynamicObject, namespace: &str) -> Result<()> {
    let (ar, namespaced) = resolve_api_resource(client, &obj).await?;
    let name = obj.metadata.name.clone().unwrap_or_default();

    let api: Api<DynamicObject> = if namespaced {
        if let Some(declared) = obj.metadata.namespace.as_deref().filter(|ns| *ns != namespace) {
            debug!("Overriding namespace {} of {} {} with {}", declared, ar.kind, name, namespace);
        }
        obj.metadata.namespace = Some(namespace.to_string());
        Api::namespaced_with(client.clone(), namespace, &ar)
    } else {
        Api::all_with(client.clone(), &ar)
    };

    let pp = PatchParams::apply(FIELD_MANAGER).force();
    api.patch(&name, &pp, &Patch::Apply(&obj))
        .await
        .map_err(|e| RolloutError::ApplyError {
            resource: format!("{} {}", ar.kind, name),
            reason: e.to_string(),
        })?;

    info!("Applied {} {}", ar.kind, name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{object_json, status_json, MockService};
    use serde_json::json;
    use std::io::Write;

    const REDIS: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: redis-cache
spec:
  replicas: 1
---
apiVersion: v1
kind: Service
metadata:
  name: redis-cache
  namespace: somewhere-else
spec:
  ports:
    - port: 6379
"#;

    fn write_manifest(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_multiple_documents() {
        let objects = parse_documents(REDIS).unwrap();

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].types.as_ref().unwrap().kind, "Deployment");
        assert_eq!(objects[1].metadata.name.as_deref(), Some("redis-cache"));
    }

    #[test]
    fn test_parse_skips_empty_documents() {
        let content = format!("---\n{}\n---\n", REDIS);
        assert_eq!(parse_documents(&content).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_rejects_missing_kind() {
        let err = parse_documents("metadata:\n  name: orphan\n").unwrap_err();
        assert!(err.contains("document 1"));
    }

    #[test]
    fn test_parse_rejects_missing_name() {
        let err = parse_documents("apiVersion: v1\nkind: ConfigMap\nmetadata: {}\n").unwrap_err();
        assert!(err.contains("metadata.name"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_manifest(Path::new("/nonexistent/manifest.yaml"));
        assert!(matches!(result, Err(RolloutError::ManifestError(_))));
    }

    #[test]
    fn test_parse_api_version() {
        assert_eq!(parse_api_version("apps/v1"), ("apps", "v1"));
        assert_eq!(parse_api_version("v1"), ("", "v1"));
        assert_eq!(parse_api_version("keda.sh/v1alpha1"), ("keda.sh", "v1alpha1"));
    }

    #[tokio::test]
    async fn test_apply_every_document_into_namespace() {
        let deployment_path = "/apis/apps/v1/namespaces/llm-test/deployments/redis-cache";
        let service_path = "/api/v1/namespaces/llm-test/services/redis-cache";
        let mock = MockService::new()
            .on_patch(
                deployment_path,
                200,
                &object_json("apps/v1", "Deployment", "llm-test", "redis-cache", json!({})),
            )
            .on_patch(
                service_path,
                200,
                &object_json("v1", "Service", "llm-test", "redis-cache", json!({})),
            );
        let client = mock.clone().into_client();
        let file = write_manifest(REDIS);

        let applied = apply_manifest(&client, file.path(), "llm-test").await.unwrap();

        assert_eq!(applied, 2);
        assert_eq!(
            mock.requests(),
            vec![
                ("PATCH".to_string(), deployment_path.to_string()),
                ("PATCH".to_string(), service_path.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_rejection_stops_at_failing_document() {
        let mock = MockService::new().on_patch(
            "/apis/apps/v1/namespaces/llm-test/deployments/redis-cache",
            422,
            &status_json(422, "Invalid", "Deployment.apps \"redis-cache\" is invalid"),
        );
        let client = mock.clone().into_client();
        let file = write_manifest(REDIS);

        let err = apply_manifest(&client, file.path(), "llm-test").await.unwrap_err();

        assert!(matches!(err, RolloutError::ApplyError { .. }));
        assert_eq!(mock.count("PATCH"), 1);
    }

    #[tokio::test]
    async fn test_unknown_kind_without_discovery_fails() {
        let client = MockService::new().into_client();
        let file = write_manifest("apiVersion: example.com/v1\nkind: Widget\nmetadata:\n  name: w\n");

        let err = apply_manifest(&client, file.path(), "llm-test").await.unwrap_err();
        assert!(matches!(err, RolloutError::ManifestError(_)));
    }
}
