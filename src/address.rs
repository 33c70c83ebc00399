// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Best-effort resolution of a service's reachable address.
//!
//! Resolvers are tried in order and the first one that yields an address wins:
//! load-balancer ingress, then cluster IP. When neither is populated the
//! caller falls back to port-forward instructions.

use crate::constants::access::SERVICE_PORT;
use k8s_openapi::api::core::v1::Service;
use std::fmt;

/// Where a deployed service can be reached, if anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceAddress {
    /// Externally routable load-balancer ingress (IP or hostname)
    LoadBalancer(String),
    /// Only reachable from inside the cluster network
    ClusterIp(String),
    Unresolved,
}

impl ServiceAddress {
    /// `http://<address>:80`, if an address was resolved
    pub fn url(&self) -> Option<String> {
        match self {
            ServiceAddress::LoadBalancer(addr) | ServiceAddress::ClusterIp(addr) => {
                Some(format!("http://{}:{}", addr, SERVICE_PORT))
            }
            ServiceAddress::Unresolved => None,
        }
    }

    /// Whether a port-forward is needed to reach the service from outside the cluster
    pub fn needs_port_forward(&self) -> bool {
        !matches!(self, ServiceAddress::LoadBalancer(_))
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceAddress::LoadBalancer(addr) => write!(f, "{} (load balancer)", addr),
            ServiceAddress::ClusterIp(addr) => write!(f, "{} (cluster-internal)", addr),
            ServiceAddress::Unresolved => f.write_str("unresolved"),
        }
    }
}

type Resolver = fn(&Service) -> Option<ServiceAddress>;

const RESOLVERS: [Resolver; 2] = [load_balancer_ingress, cluster_ip];

/// Resolve the address of `service`; a missing service resolves to `Unresolved`
pub fn resolve_address(service: Option<&Service>) -> ServiceAddress {
    service
        .and_then(|svc| RESOLVERS.iter().find_map(|resolve| resolve(svc)))
        .unwrap_or(ServiceAddress::Unresolved)
}

fn load_balancer_ingress(service: &Service) -> Option<ServiceAddress> {
    service
        .status
        .as_ref()
        .and_then(|s| s.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
        .and_then(|ingress| {
            ingress.iter().find_map(|i| {
                i.ip.as_deref()
                    .filter(|ip| !ip.is_empty())
                    .or_else(|| i.hostname.as_deref().filter(|h| !h.is_empty()))
            })
        })
        .map(|addr| ServiceAddress::LoadBalancer(addr.to_string()))
}

fn cluster_ip(service: &Service) -> Option<ServiceAddress> {
    service
        .spec
        .as_ref()
        .and_then(|s| s.cluster_ip.as_deref())
        .filter(|ip| !ip.is_empty() && *ip != "None")
        .map(|ip| ServiceAddress::ClusterIp(ip.to_string()))
}
