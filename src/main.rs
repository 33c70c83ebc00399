// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use llm_rollout::config::Config;
use llm_rollout::kubernetes::{create_client, KubeCluster};
use llm_rollout::orchestrator::Orchestrator;
use llm_rollout::plan::{builtin_plan, cleanup_targets, Plan, Variant};

#[derive(Parser)]
#[command(name = "llm-rollout")]
#[command(about = "Deploy and tear down the LLM serving study on Kubernetes")]
#[command(version)]
struct Cli {
    /// Target namespace (overrides LLM_ROLLOUT_NAMESPACE)
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Directory manifest paths are resolved against (overrides LLM_ROLLOUT_MANIFEST_DIR)
    #[arg(long, global = true)]
    manifest_dir: Option<PathBuf>,

    /// Kubeconfig to use instead of the inferred one
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a configuration, wait for it to become ready and print access instructions
    Deploy {
        #[arg(value_enum)]
        variant: Variant,

        /// Read the plan from a YAML file instead of the built-in one
        #[arg(long)]
        plan_file: Option<PathBuf>,
    },

    /// Print the validated steps of a plan without touching the cluster
    Plan {
        #[arg(value_enum)]
        variant: Variant,

        #[arg(long)]
        plan_file: Option<PathBuf>,
    },

    /// Delete the namespace and every study resource
    Cleanup,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(namespace) = cli.namespace {
        config.namespace = namespace;
    }
    if let Some(manifest_dir) = cli.manifest_dir {
        config.manifest_dir = manifest_dir;
    }
    if cli.kubeconfig.is_some() {
        config.kubeconfig = cli.kubeconfig;
    }
    info!(
        "Configuration loaded: namespace={}, manifest_dir={}",
        config.namespace,
        config.manifest_dir.display()
    );

    match cli.command {
        Commands::Deploy { variant, plan_file } => {
            let plan = load_plan(variant, plan_file.as_deref(), &config)?;
            let orchestrator = connect(&config).await?;
            let report = orchestrator.deploy(&plan).await?;
            print!("{}", report);
        }
        Commands::Plan { variant, plan_file } => {
            let plan = load_plan(variant, plan_file.as_deref(), &config)?;
            println!(
                "{} plan for namespace {} (service {}):",
                plan.variant, plan.namespace, plan.service
            );
            for (index, step) in plan.steps().iter().enumerate() {
                println!("  {}. {}", index + 1, step);
            }
        }
        Commands::Cleanup => {
            let orchestrator = connect(&config).await?;
            let targets = cleanup_targets(&config.namespace);
            let report = orchestrator.cleanup(&config.namespace, &targets).await?;
            print!("{}", report);
        }
    }

    Ok(())
}

fn load_plan(variant: Variant, plan_file: Option<&std::path::Path>, config: &Config) -> Result<Plan> {
    let plan = match plan_file {
        Some(path) => Plan::load(path, config)?,
        None => builtin_plan(variant, config)?,
    };
    if plan.variant != variant {
        anyhow::bail!(
            "plan file describes the {} configuration, not {}",
            plan.variant,
            variant
        );
    }
    Ok(plan)
}

async fn connect(config: &Config) -> Result<Orchestrator<KubeCluster>> {
    let client = create_client(config.kubeconfig.as_deref()).await?;
    Ok(Orchestrator::new(KubeCluster::new(client, config.poll_interval)))
}
