// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{readiness::POLL_INTERVAL_SECS, DEFAULT_MANIFEST_DIR, DEFAULT_NAMESPACE};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Orchestrator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace all study resources are deployed into
    pub namespace: String,
    /// Directory that manifest paths in plans are resolved against
    pub manifest_dir: PathBuf,
    /// Explicit kubeconfig; when unset the client is inferred
    pub kubeconfig: Option<PathBuf>,
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            namespace: DEFAULT_NAMESPACE.to_string(),
            manifest_dir: PathBuf::from(DEFAULT_MANIFEST_DIR),
            kubeconfig: None,
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let namespace = lookup("LLM_ROLLOUT_NAMESPACE").unwrap_or(defaults.namespace);
        let manifest_dir = lookup("LLM_ROLLOUT_MANIFEST_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.manifest_dir);
        let kubeconfig = lookup("KUBECONFIG").map(PathBuf::from);

        let poll_interval = match lookup("LLM_ROLLOUT_POLL_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .with_context(|| format!("LLM_ROLLOUT_POLL_INTERVAL_SECS is not a number: {}", raw))?;
                Duration::from_secs(secs.max(1))
            }
            None => defaults.poll_interval,
        };

        Ok(Config {
            namespace,
            manifest_dir,
            kubeconfig,
            poll_interval,
        })
    }
}
