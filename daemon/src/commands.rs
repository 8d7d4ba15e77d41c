//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use ballot_crypto::{account_id_from_public_key, generate_keypair};
use ballot_ledger_rpc::{HttpLedgerRpc, LedgerRpc};
use ballot_rpc::{AppState, LedgerProposalStore, RpcServer, ServerMetrics, ShutdownController};
use ballot_simulation::SimulationClient;
use ballot_types::{ReturnValue, ScVal, SimulationResult};
use ballot_wallet_core::{
    encrypt_keystore, save_keystore, HttpProposalFeed, LocalSigner, ProposalFeed,
    SignerReadiness, VoteOrchestrator, VoteSession,
};
use serde_json::{json, Value};
use tracing::info;

use crate::config::BallotConfig;

fn ledger(config: &BallotConfig) -> anyhow::Result<Arc<dyn LedgerRpc>> {
    Ok(Arc::new(HttpLedgerRpc::new(config.rpc_url())?))
}

fn simulation_client(config: &BallotConfig) -> anyhow::Result<SimulationClient> {
    Ok(SimulationClient::new(ledger(config)?, config.network).with_fee(config.simulation_fee))
}

pub async fn serve(config: &BallotConfig) -> anyhow::Result<()> {
    let simulation = simulation_client(config)?;
    let store = LedgerProposalStore::new(simulation.clone(), config.contract()?)
        .with_max_proposals(config.max_proposals);
    let state = Arc::new(AppState {
        simulation,
        proposals: Arc::new(store),
        metrics: Arc::new(ServerMetrics::new()?),
    });

    let shutdown = Arc::new(ShutdownController::new());
    let server = RpcServer::new(config.listen_port, state);
    let rx = shutdown.subscribe();
    let signals = shutdown.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    info!(
        port = config.listen_port,
        network = %config.network.as_str(),
        contract = %config.contract_id,
        "starting ballot server"
    );
    server.start(rx).await?;
    Ok(())
}

/// Parse `kind:value` or a tagged JSON object into a contract value.
fn parse_arg(raw: &str) -> anyhow::Result<ScVal> {
    let tagged = if raw.trim_start().starts_with('{') {
        serde_json::from_str::<Value>(raw).with_context(|| format!("invalid JSON argument {raw:?}"))?
    } else {
        let (kind, value) = raw
            .split_once(':')
            .with_context(|| format!("argument {raw:?} is not kind:value"))?;
        let value = match kind {
            "void" => Value::Null,
            "bool" => Value::Bool(
                value
                    .parse()
                    .with_context(|| format!("bool argument {value:?} is not true/false"))?,
            ),
            _ => Value::String(value.to_string()),
        };
        json!({ "type": kind, "value": value })
    };
    Ok(ScVal::from_tagged(&tagged)?)
}

pub async fn simulate(config: &BallotConfig, function: &str, raw_args: &[String]) -> anyhow::Result<()> {
    let args = raw_args
        .iter()
        .map(|a| parse_arg(a))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let client = simulation_client(config)?;
    match client.simulate(&config.contract()?, function, args).await {
        SimulationResult::Success(success) => {
            let result = match success.return_value {
                ReturnValue::Value(value) => value.to_native(),
                ReturnValue::NoValue => Value::Null,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        SimulationResult::Error(failure) => {
            for event in &failure.events {
                eprintln!("event: {event}");
            }
            bail!("simulation failed: {}", failure.diagnostic)
        }
    }
}

pub async fn vote(
    config: &BallotConfig,
    proposal_id: u64,
    choice: bool,
    keystore: &Path,
    password: &str,
) -> anyhow::Result<()> {
    let signer = LocalSigner::from_keystore(keystore, password, config.network)
        .with_context(|| format!("failed to unlock {}", keystore.display()))?;
    let feed = HttpProposalFeed::new(config.proposals_url.clone())?;
    let orchestrator = VoteOrchestrator::new(ledger(config)?, Arc::new(signer), config.orchestrator_config()?)
        .with_proposal_feed(Arc::new(feed));
    let session = VoteSession::new(Arc::new(orchestrator), SignerReadiness::ready());
    session.connect(Duration::from_secs(5)).await?;

    match session.cast_vote(proposal_id, choice).await {
        Ok(receipt) => {
            println!("vote confirmed");
            println!("  proposal:    {}", receipt.proposal_id);
            println!("  choice:      {}", if receipt.choice { "yes" } else { "no" });
            println!("  voter:       {}", receipt.voter);
            println!("  transaction: {}", receipt.hash);
            println!("  ledger:      {}", receipt.ledger);
            if let Some(proposal) = receipt
                .refreshed
                .as_ref()
                .and_then(|list| list.iter().find(|p| p.id == proposal_id))
            {
                println!(
                    "  tally:       {} yes / {} no",
                    proposal.yes_votes, proposal.no_votes
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            bail!("{} ({:?}): {e}", e.kind(), e.retry_advice())
        }
    }
}

pub async fn proposals(config: &BallotConfig) -> anyhow::Result<()> {
    let feed = HttpProposalFeed::new(config.proposals_url.clone())?;
    let proposals = feed.fetch_proposals().await?;
    if proposals.is_empty() {
        println!("no proposals");
    }
    for p in proposals {
        println!(
            "#{:<4} {:<8} yes {:<6} no {:<6} {}",
            p.id,
            if p.is_active { "open" } else { "closed" },
            p.yes_votes,
            p.no_votes,
            p.title
        );
    }
    Ok(())
}

pub fn keygen(config: &BallotConfig, out: &Path, password: &str, force: bool) -> anyhow::Result<()> {
    if out.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", out.display());
    }
    if password.is_empty() {
        bail!("refusing to write a keystore with an empty password");
    }
    let keypair = generate_keypair();
    let account = account_id_from_public_key(&keypair.public);
    let keystore = encrypt_keystore(&keypair.private.0, account.clone(), password)?;
    save_keystore(&keystore, out)?;
    info!(path = %out.display(), network = %config.network.as_str(), "keystore written");
    println!("{account}");
    Ok(())
}
