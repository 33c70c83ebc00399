// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Human-readable summaries printed at the end of a run.

use crate::address::ServiceAddress;
use crate::constants::access::{LOCAL_FORWARD_PORT, PORT_FORWARD_VERB, SERVICE_PORT};
use crate::plan::Variant;
use crate::types::ResourceRef;
use std::fmt;

/// `kubectl port-forward service/<service> 8080:80 -n <namespace>`
pub fn port_forward_command(service: &str, namespace: &str) -> String {
    format!(
        "{} service/{} {}:{} -n {}",
        PORT_FORWARD_VERB, service, LOCAL_FORWARD_PORT, SERVICE_PORT, namespace
    )
}

/// Outcome of a successful deploy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReport {
    pub variant: Variant,
    pub namespace: String,
    pub service: String,
    pub address: ServiceAddress,
}

impl DeploymentReport {
    /// Port-forward instructions, when the address is not externally routable
    pub fn port_forward_hint(&self) -> Option<String> {
        self.address
            .needs_port_forward()
            .then(|| port_forward_command(&self.service, &self.namespace))
    }

    /// URL the follow-up tools should target
    pub fn target_url(&self) -> String {
        self.address
            .url()
            .unwrap_or_else(|| format!("http://localhost:{}", LOCAL_FORWARD_PORT))
    }

    /// Load-test, metrics and benchmark invocations for this deployment
    pub fn next_steps(&self) -> Vec<String> {
        let url = self.target_url();
        let concurrency = match self.variant {
            Variant::Baseline => 10,
            Variant::Optimized => 20,
        };

        vec![
            format!(
                "python3 scripts/load-testing/{}-test.py --service-url {} --requests 100 --concurrency {}",
                self.variant, url, concurrency
            ),
            format!(
                "python3 scripts/load-testing/metrics-collector.py --config {} --service-url {} --output {}-metrics.json",
                self.variant, url, self.variant
            ),
            "python3 scripts/benchmarking/latency-throughput.py --output latency-throughput-curve.png --data-output latency-throughput-data.json".to_string(),
        ]
    }
}

impl fmt::Display for DeploymentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deployment of the {} configuration complete.", self.variant)?;
        writeln!(f, "Namespace: {}", self.namespace)?;
        writeln!(f, "Service:   {}", self.service)?;

        match self.address.url() {
            Some(url) => writeln!(f, "Service URL: {}", url)?,
            None => writeln!(
                f,
                "No load-balancer or cluster address found for {}.",
                self.service
            )?,
        }

        if let Some(hint) = self.port_forward_hint() {
            writeln!(f, "To reach the service from this machine, run:")?;
            writeln!(f, "  {}", hint)?;
        }

        writeln!(f)?;
        writeln!(f, "Next steps:")?;
        for step in self.next_steps() {
            writeln!(f, "  {}", step)?;
        }
        Ok(())
    }
}

/// Outcome of a cleanup run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: Vec<ResourceRef>,
    pub absent: Vec<ResourceRef>,
}

impl fmt::Display for CleanupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Cleanup complete: {} deleted, {} already absent.",
            self.deleted.len(),
            self.absent.len()
        )?;
        for resource in &self.deleted {
            writeln!(f, "  deleted {}", resource)?;
        }
        Ok(())
    }
}
