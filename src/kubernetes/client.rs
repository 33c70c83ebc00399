// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation

use crate::error::{Result, RolloutError};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Create a client from an explicit kubeconfig, or infer one from the environment
#[instrument]
pub async fn create_client(kubeconfig: Option<&Path>) -> Result<Client> {
    let client = match kubeconfig {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                RolloutError::KubeconfigError(format!(
                    "Failed to read kubeconfig {}: {}",
                    path.display(),
                    e
                ))
            })?;
            create_client_from_kubeconfig(&content).await?
        }
        None => {
            debug!("No kubeconfig given, inferring client configuration");
            Client::try_default().await.map_err(|e| {
                RolloutError::KubeconfigError(format!("Failed to infer config: {}", e))
            })?
        }
    };

    info!("Connected to Kubernetes cluster");
    Ok(client)
}

/// Create a Kubernetes client from a kubeconfig string
async fn create_client_from_kubeconfig(kubeconfig: &str) -> Result<Client> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| RolloutError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    let client_config =
        kube::Config::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
            .await
            .map_err(|e| {
                RolloutError::KubeconfigError(format!("Failed to create config: {}", e))
            })?;

    Client::try_from(client_config)
        .map_err(|e| RolloutError::KubeconfigError(format!("Failed to create client: {}", e)))
}
