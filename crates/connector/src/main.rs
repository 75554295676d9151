// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `updctl`: maintenance CLI over the connector state.
//!
//! Drives the registration engine against a JSON registry file standing in
//! for the OS package registry, with a log-only transport. Useful for
//! inspecting and repairing device-local registration state.

use clap::Parser;
use tracing::error;

use updc::config::ConnectorConfig;
use updc::engine::{RegisterOutcome, RegistrationEngine};
use updc::error::ConnectorError;
use updc::protocol;
use updc::registry::FileRegistry;
use updc::selection::SelectionUi;
use updc::store::{FileStore, Store};
use updc::transport::LogTransport;

#[derive(Debug, Parser)]
#[command(name = "updctl", about = "Push distributor registration maintenance")]
struct Cli {
    #[command(flatten)]
    config: ConnectorConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Show instances, tokens, the selected distributor, and ack flags.
    Status,
    /// Register an instance, selecting a distributor if needed.
    Register {
        #[arg(long, default_value = protocol::INSTANCE_DEFAULT)]
        instance: String,
        /// Required distributor features (repeatable).
        #[arg(long = "feature")]
        features: Vec<String>,
        /// Free-form message for the distributor.
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Unregister an instance.
    Unregister {
        #[arg(long, default_value = protocol::INSTANCE_DEFAULT)]
        instance: String,
    },
    /// Print the token of a registered instance.
    Token {
        #[arg(long, default_value = protocol::INSTANCE_DEFAULT)]
        instance: String,
    },
    /// Persist a distributor choice (resume after a pending selection).
    Choose { distributor: String },
    /// Mark the selected distributor as acknowledged.
    Ack { distributor: String },
    /// Clear the selection only if no instances remain.
    DropDistributor,
    /// Unregister everything and wipe the selection.
    Reset,
    /// Let the "no distributor installed" notice show again.
    ClearNoDistributorAck,
}

/// Non-interactive selection UI: reports instead of prompting, leaving the
/// actual choice to a later `choose` invocation.
struct ReportingUi;

impl SelectionUi for ReportingUi {
    fn prompt_choice(&self, candidates: &[String]) -> Option<String> {
        println!("several distributors are installed, pick one with `updctl choose <id>`:");
        for candidate in candidates {
            println!("  {candidate}");
        }
        None
    }

    fn prompt_no_distributor(&self) -> bool {
        println!("no distributor is installed");
        false
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(cli) {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let store = FileStore::open(cli.config.state_file())?;
    let registry = FileRegistry::new(&cli.config.registry);
    let engine =
        RegistrationEngine::new(store, registry, LogTransport, cli.config.application.clone());

    match cli.command {
        Command::Status => status(&engine),
        Command::Register { instance, features, message } => {
            let features =
                if features.is_empty() { protocol::default_features() } else { features };
            match engine.register(&instance, &features, &message, &ReportingUi)? {
                RegisterOutcome::Registered { distributor, token } => {
                    println!("registered {instance} with {distributor} (token {token})");
                    Ok(())
                }
                RegisterOutcome::NoDistributor { .. } => {
                    Err(ConnectorError::NoDistributorAvailable.into())
                }
                RegisterOutcome::Dismissed => Ok(()),
            }
        }
        Command::Unregister { instance } => engine.unregister(&instance),
        Command::Token { instance } => {
            println!("{}", engine.token(&instance)?);
            Ok(())
        }
        Command::Choose { distributor } => engine.save_distributor(&distributor),
        Command::Ack { distributor } => engine.mark_acknowledged(&distributor),
        Command::DropDistributor => engine.safe_remove_distributor(),
        Command::Reset => engine.force_remove_distributor(),
        Command::ClearNoDistributorAck => engine.clear_no_distributor_ack(),
    }
}

fn status<S, R, T>(engine: &RegistrationEngine<S, R, T>) -> anyhow::Result<()>
where
    S: Store,
    R: updc::registry::Registry,
    T: updc::transport::Transport,
{
    let store = engine.store();
    match store.try_get_distributor()? {
        Some(distributor) => {
            let installed = engine.saved_distributor()?.is_some();
            let acked = store.distributor_ack()?;
            println!(
                "distributor: {distributor} (installed: {installed}, acknowledged: {acked})"
            );
        }
        None => println!("distributor: <none>"),
    }
    println!("no-distributor notice silenced: {}", store.no_distributor_ack()?);
    let instances = store.instances()?;
    if instances.is_empty() {
        println!("instances: <none>");
    } else {
        println!("instances:");
        for instance in instances {
            let token = store.try_get_token(&instance)?.unwrap_or_default();
            println!("  {instance}: {token}");
        }
    }
    Ok(())
}
