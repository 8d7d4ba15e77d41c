//! `ballot`: serve the simulation API, or simulate and vote from the shell.

mod commands;
mod config;

use ballot_types::NetworkId;
use ballot_utils::{init_logging, LogFormat};
use clap::Parser;
use std::path::PathBuf;

use crate::config::BallotConfig;

#[derive(Parser)]
#[command(name = "ballot", about = "On-chain proposal voting client and API server")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "BALLOT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Network: "public", "testnet", "futurenet" or "standalone".
    #[arg(long, env = "BALLOT_NETWORK", global = true)]
    network: Option<NetworkId>,

    /// Ledger node JSON-RPC endpoint.
    #[arg(long, env = "BALLOT_RPC_URL", global = true)]
    rpc_url: Option<String>,

    /// Voting contract address.
    #[arg(long, env = "BALLOT_CONTRACT_ID", global = true)]
    contract: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BALLOT_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BALLOT_LOG_FORMAT", global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the HTTP API server.
    Serve {
        #[arg(long, env = "BALLOT_LISTEN_PORT")]
        port: Option<u16>,
    },

    /// Simulate a contract call and print its return value.
    Simulate {
        #[arg(long)]
        function: String,

        /// Argument as `kind:value` (e.g. `u64:1`, `bool:true`,
        /// `address:G...`) or a tagged JSON object. Repeatable, in order.
        #[arg(long = "arg")]
        args: Vec<String>,
    },

    /// Cast a vote signed with a local keystore.
    Vote {
        #[arg(long)]
        proposal: u64,

        #[arg(long, conflicts_with = "no", required_unless_present = "no")]
        yes: bool,

        #[arg(long)]
        no: bool,

        #[arg(long, env = "BALLOT_KEYSTORE")]
        keystore: PathBuf,

        #[arg(long, env = "BALLOT_KEY_PASSWORD", hide_env_values = true)]
        password: String,

        /// Proposal store endpoint to refresh after confirmation.
        #[arg(long, env = "BALLOT_PROPOSALS_URL")]
        proposals_url: Option<String>,
    },

    /// Print the proposal list from the proposal store.
    Proposals {
        #[arg(long, env = "BALLOT_PROPOSALS_URL")]
        url: Option<String>,
    },

    /// Generate a key and write it to an encrypted keystore file.
    Keygen {
        #[arg(long)]
        out: PathBuf,

        #[arg(long, env = "BALLOT_KEY_PASSWORD", hide_env_values = true)]
        password: String,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Layer CLI flags (and their env vars) over the file configuration.
    fn resolve_config(&self) -> anyhow::Result<BallotConfig> {
        let mut config = match &self.config {
            Some(path) => BallotConfig::from_toml_file(path)?,
            None => BallotConfig::default(),
        };
        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(url) = &self.rpc_url {
            config.rpc_url = Some(url.clone());
        }
        if let Some(contract) = &self.contract {
            config.contract_id = contract.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        match &self.command {
            Command::Serve { port: Some(port) } => config.listen_port = *port,
            Command::Vote {
                proposals_url: Some(url),
                ..
            }
            | Command::Proposals { url: Some(url) } => config.proposals_url = url.clone(),
            _ => {}
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(config.log_format, &config.log_level);
    tracing::debug!(network = %config.network.as_str(), rpc_url = %config.rpc_url(), "configuration resolved");

    match cli.command {
        Command::Serve { .. } => commands::serve(&config).await,
        Command::Simulate { function, args } => commands::simulate(&config, &function, &args).await,
        Command::Vote {
            proposal,
            yes,
            keystore,
            password,
            ..
        } => commands::vote(&config, proposal, yes, &keystore, &password).await,
        Command::Proposals { .. } => commands::proposals(&config).await,
        Command::Keygen {
            out,
            password,
            force,
        } => commands::keygen(&config, &out, &password, force),
    }
}
