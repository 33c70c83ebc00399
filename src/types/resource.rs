// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed handles for the cluster resources the study manifests declare.

use kube::core::GroupVersionKind;
use kube::discovery::ApiResource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource kinds the orchestrator applies, waits on, or deletes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Namespace,
    PersistentVolumeClaim,
    ConfigMap,
    Service,
    Deployment,
    HorizontalPodAutoscaler,
    /// KEDA autoscaler (keda.sh)
    ScaledObject,
    /// Istio traffic policy (networking.istio.io)
    DestinationRule,
    /// Istio routing (networking.istio.io)
    VirtualService,
}

impl Kind {
    pub const ALL: [Kind; 9] = [
        Kind::Namespace,
        Kind::PersistentVolumeClaim,
        Kind::ConfigMap,
        Kind::Service,
        Kind::Deployment,
        Kind::HorizontalPodAutoscaler,
        Kind::ScaledObject,
        Kind::DestinationRule,
        Kind::VirtualService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Namespace => "Namespace",
            Kind::PersistentVolumeClaim => "PersistentVolumeClaim",
            Kind::ConfigMap => "ConfigMap",
            Kind::Service => "Service",
            Kind::Deployment => "Deployment",
            Kind::HorizontalPodAutoscaler => "HorizontalPodAutoscaler",
            Kind::ScaledObject => "ScaledObject",
            Kind::DestinationRule => "DestinationRule",
            Kind::VirtualService => "VirtualService",
        }
    }

    /// API group; empty for the core group
    pub fn group(&self) -> &'static str {
        match self {
            Kind::Namespace | Kind::PersistentVolumeClaim | Kind::ConfigMap | Kind::Service => "",
            Kind::Deployment => "apps",
            Kind::HorizontalPodAutoscaler => "autoscaling",
            Kind::ScaledObject => "keda.sh",
            Kind::DestinationRule | Kind::VirtualService => "networking.istio.io",
        }
    }

    /// Version used when the kind is addressed without a manifest at hand
    pub fn version(&self) -> &'static str {
        match self {
            Kind::HorizontalPodAutoscaler => "v2",
            Kind::ScaledObject => "v1alpha1",
            Kind::DestinationRule | Kind::VirtualService => "v1beta1",
            _ => "v1",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Kind::Namespace => "namespaces",
            Kind::PersistentVolumeClaim => "persistentvolumeclaims",
            Kind::ConfigMap => "configmaps",
            Kind::Service => "services",
            Kind::Deployment => "deployments",
            Kind::HorizontalPodAutoscaler => "horizontalpodautoscalers",
            Kind::ScaledObject => "scaledobjects",
            Kind::DestinationRule => "destinationrules",
            Kind::VirtualService => "virtualservices",
        }
    }

    pub fn is_namespaced(&self) -> bool {
        !matches!(self, Kind::Namespace)
    }

    /// Look up a kind by its manifest `kind` field
    pub fn from_kind_str(kind: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|k| k.as_str() == kind)
    }

    pub fn api_resource(&self) -> ApiResource {
        self.api_resource_for_version(self.version())
    }

    /// Build the ApiResource for a specific served version, e.g. the one a manifest names
    pub fn api_resource_for_version(&self, version: &str) -> ApiResource {
        let gvk = GroupVersionKind::gvk(self.group(), version, self.as_str());
        ApiResource::from_gvk_with_plural(&gvk, self.plural())
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a single named resource: kind, namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
}

impl ResourceRef {
    pub fn namespaced(kind: Kind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self {
            kind: Kind::Namespace,
            namespace: None,
            name: name.into(),
        }
    }

    /// Place a namespaced reference into `namespace` if it does not name one already
    pub fn with_default_namespace(mut self, namespace: &str) -> Self {
        if self.kind.is_namespaced() && self.namespace.is_none() {
            self.namespace = Some(namespace.to_string());
        }
        self
    }

    pub fn api_resource(&self) -> ApiResource {
        self.kind.api_resource()
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} {}/{}", self.kind, ns, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}
