// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Readiness gates: poll a resource until its status satisfies a condition.

use super::resources::dynamic_api;
use crate::error::{Result, RolloutError};
use crate::plan::ReadinessGate;
use kube::Client;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

/// Block until the gate's condition holds; fails with `ReadinessTimeout` once the gate's timeout elapses
#[instrument(skip(client, gate), fields(resource = %gate.resource, condition = %gate.condition))]
pub async fn wait_for_gate(client: &Client, gate: &ReadinessGate, poll_interval: Duration) -> Result<()> {
    let api = dynamic_api(client, &gate.resource, &gate.resource.api_resource());
    let name = &gate.resource.name;

    info!(
        "Waiting up to {}s for {} to satisfy {}",
        gate.timeout.as_secs(),
        gate.resource,
        gate.condition
    );

    let poll = async {
        loop {
            match api.get_opt(name).await {
                Ok(Some(obj)) if gate.condition.is_met(&obj) => return Ok(()),
                Ok(Some(_)) => debug!("{} does not satisfy {} yet", gate.resource, gate.condition),
                Ok(None) => debug!("{} not found yet", gate.resource),
                // Client errors other than 404 will not clear up by retrying
                Err(kube::Error::Api(err)) if (400..500).contains(&err.code) => {
                    return Err(RolloutError::KubeError(kube::Error::Api(err)));
                }
                Err(e) => warn!(
                    "Error reading {}: {}, retrying in {}s",
                    gate.resource,
                    e,
                    poll_interval.as_secs()
                ),
            }
            sleep(poll_interval).await;
        }
    };

    timeout(gate.timeout, poll)
        .await
        .map_err(|_| RolloutError::ReadinessTimeout {
            resource: gate.resource.to_string(),
            condition: gate.condition.to_string(),
            timeout: gate.timeout,
        })??;

    info!("{} satisfies {}", gate.resource, gate.condition);
    Ok(())
}
