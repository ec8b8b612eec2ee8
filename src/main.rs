//! Voote contract deployer.
//!
//! # Architecture Overview
//!
//! ```text
//!   .env ─┐
//!         ├──▶ config ──▶ ToolchainConfig ──┐
//!   deployer.toml                          │
//!                                          ▼
//!   artifacts/ ──▶ artifacts::ArtifactStore ──▶ deploy::Deployer ──▶ blockchain::BlockchainClient ──▶ RPC node
//!                                          │
//!                                          ▼
//!                                 deploy::report ──▶ stdout / stderr, exit code
//!                                          │
//!                                          ▼ (--verify)
//!                                 verify::VerificationClient ──▶ explorer API
//! ```

use alloy::primitives::{Address, Bytes};
use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Instrument;
use uuid::Uuid;

use voote_deployer::blockchain::Wallet;
use voote_deployer::config::loader::{load_env_file, load_file_config_or_default, resolve_config};
use voote_deployer::config::{ConfigError, ProcessEnv, ToolchainConfig};
use voote_deployer::deploy::{
    connect, report, run_deployment, DeployError, DeployOptions, DEFAULT_CONTRACT, EXIT_FAILURE,
    EXIT_SUCCESS,
};
use voote_deployer::observability::init_logging;
use voote_deployer::verify::{VerificationClient, VerificationRequest, VerificationStatus};

#[derive(Parser)]
#[command(name = "voote-deployer")]
#[command(about = "Deploy and verify the Voote contract", long_about = None)]
struct Cli {
    /// Config file (defaults to ./deployer.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Env file loaded before reading the environment (defaults to ./.env)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a compiled contract and wait for confirmation
    Deploy(DeployArgs),
    /// Verify the source of a deployed contract
    Verify(VerifyArgs),
    /// Print the deployer address for a network
    Address {
        #[arg(long)]
        network: Option<String>,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Contract name or fully qualified name (source:Name)
    #[arg(long, default_value = DEFAULT_CONTRACT)]
    contract: String,

    /// Network profile (defaults to the configured default network)
    #[arg(long)]
    network: Option<String>,

    /// Artifacts directory override
    #[arg(long)]
    artifacts: Option<PathBuf>,
}

impl TargetArgs {
    fn options(&self) -> DeployOptions {
        DeployOptions {
            contract: self.contract.clone(),
            network: self.network.clone(),
            artifacts: self.artifacts.clone(),
        }
    }
}

#[derive(Args)]
struct DeployArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Verify the source once the deployment is confirmed
    #[arg(long)]
    verify: bool,
}

#[derive(Args)]
struct VerifyArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Address of the deployed contract
    #[arg(long)]
    address: Address,

    /// ABI-encoded constructor arguments (hex)
    #[arg(long)]
    constructor_args: Option<Bytes>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let code = run(cli).await;
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

async fn run(cli: Cli) -> i32 {
    if let Err(e) = load_env_file(cli.env_file.as_deref()) {
        eprintln!("❌ {}", e);
        return EXIT_FAILURE;
    }

    let file = match load_file_config_or_default(cli.config.as_deref()) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("❌ {}", e);
            return EXIT_FAILURE;
        }
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| file.observability.log_level.clone());
    init_logging(&level);

    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("run", run_id = %run_id);

    async move {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "voote-deployer starting");
        let config = resolve_config(file, &ProcessEnv);

        match cli.command {
            Commands::Deploy(args) => deploy(config, args).await,
            Commands::Verify(args) => verify(config, args).await,
            Commands::Address { network } => address(config, network.as_deref()),
        }
    }
    .instrument(span)
    .await
}

async fn deploy(config: Result<ToolchainConfig, ConfigError>, args: DeployArgs) -> i32 {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let config = match config {
        Ok(config) => config,
        Err(e) => return report(&Err(DeployError::from(e)), &mut stdout, &mut stderr),
    };

    let result = run_deployment(&config, &args.target.options()).await;
    let code = report(&result, &mut stdout, &mut stderr);

    if let (Ok(outcome), true) = (&result, args.verify) {
        match verify_deployment(&config, &args.target, outcome.address, Bytes::new()).await {
            Ok(status) => tracing::info!(status = ?status, "Source verification finished"),
            Err(e) => tracing::warn!(error = %e, "Source verification failed"),
        }
    }

    code
}

async fn verify(config: Result<ToolchainConfig, ConfigError>, args: VerifyArgs) -> i32 {
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Verification failed: {}", e);
            return EXIT_FAILURE;
        }
    };

    let constructor_args = args.constructor_args.clone().unwrap_or_default();
    match verify_deployment(&config, &args.target, args.address, constructor_args).await {
        Ok(VerificationStatus::Verified) => {
            println!("✅ Contract verified: {}", args.address);
            EXIT_SUCCESS
        }
        Ok(VerificationStatus::AlreadyVerified) => {
            println!("✅ Contract already verified: {}", args.address);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Verification failed: {}", e);
            EXIT_FAILURE
        }
    }
}

fn address(config: Result<ToolchainConfig, ConfigError>, network: Option<&str>) -> i32 {
    let lookup = || -> Result<Address, Box<dyn Error>> {
        let config = config?;
        let profile = config.network(network)?;
        Ok(Wallet::from_profile(profile)?.address())
    };

    match lookup() {
        Ok(address) => {
            println!("{}", address);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            EXIT_FAILURE
        }
    }
}

async fn verify_deployment(
    config: &ToolchainConfig,
    target: &TargetArgs,
    address: Address,
    constructor_args: Bytes,
) -> Result<VerificationStatus, Box<dyn Error>> {
    let options = target.options();
    let profile = config.network(options.network.as_deref())?;

    let chain_id = match profile.chain_id {
        Some(chain_id) => chain_id,
        None => connect(profile).await?.get_chain_id().await?.0,
    };

    let store = options.artifact_store(config);
    let artifact = store.resolve(&options.contract)?;
    let build_info = store.build_info(&artifact)?;
    let request = VerificationRequest::new(address, &artifact, &build_info, constructor_args);

    let status = VerificationClient::new(&config.etherscan, chain_id)?
        .verify(&request)
        .await?;
    Ok(status)
}
