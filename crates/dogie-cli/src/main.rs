//! dogie: deploy, upload assets for, and mint the Dogie NFT contracts.
//!
//! Every subcommand exits with status 1 after logging the error that
//! stopped it.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use dogie_config::{DogieConfig, NetworkTable};
use dogie_contracts::Shutdown;

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "dogie", version, about = "Deploy and mint the Dogie NFT contracts")]
#[command(arg_required_else_help(true))]
struct Args {
    #[arg(long, global = true, env = "DOGIE_CONFIG")]
    /// Config file [default: ./dogie.toml]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    /// Network name or chain id [default: tool.network from config]
    network: Option<String>,

    #[arg(long, global = true, env = "RPC_URL")]
    /// JSON-RPC endpoint
    rpc_url: Option<String>,

    #[arg(long, global = true, env = "PRIVATE_KEY", hide_env_values = true)]
    /// Signing key; development networks fall back to the first local account
    private_key: Option<String>,

    #[arg(long, global = true, env = "DOGIE_ARTIFACTS_DIR")]
    /// Compiled contract artifacts
    artifacts_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    /// trace | debug | info | warn | error
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the configured networks
    Networks,

    /// Pin breed images and their metadata, then write the token URI list
    Upload {
        #[arg(long)]
        /// Image directory [default: tool.random_images_dir]
        images: Option<PathBuf>,

        #[arg(long)]
        /// Token URI list path [default: tool.token_uris_path]
        output: Option<PathBuf>,

        #[arg(long)]
        /// Pin into a local content-addressed directory instead of Pinata
        local_store: Option<PathBuf>,

        #[arg(long, env = "PINATA_API_KEY", hide_env_values = true)]
        pinata_api_key: Option<String>,

        #[arg(long, env = "PINATA_API_SECRET", hide_env_values = true)]
        pinata_api_secret: Option<String>,
    },

    /// Deploy a contract and record its address
    Deploy {
        #[arg(value_enum)]
        nft: Nft,
    },

    /// Mint a token
    Mint {
        #[command(subcommand)]
        target: MintTarget,
    },

    /// Decode the token URI of a dynamic SVG token
    Inspect {
        token_id: u64,

        #[arg(long, env = "DYNAMIC_SVG_NFT_ADDRESS")]
        address: Option<ethers::types::Address>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Nft {
    Basic,
    RandomIpfs,
    DynamicSvg,
}

#[derive(Subcommand)]
enum MintTarget {
    /// Mint a BasicNft
    Basic {
        #[arg(long, env = "BASIC_NFT_ADDRESS")]
        address: Option<ethers::types::Address>,
    },

    /// Pay the mint fee and wait for a random breed
    RandomIpfs {
        #[arg(long, env = "RANDOM_IPFS_NFT_ADDRESS")]
        address: Option<ethers::types::Address>,

        #[arg(long)]
        /// Payment in wei [default: the contract's mint fee]
        value: Option<String>,
    },

    /// Mint a DynamicSvgNft with a USD high-value threshold
    DynamicSvg {
        #[arg(long, env = "DYNAMIC_SVG_NFT_ADDRESS")]
        address: Option<ethers::types::Address>,

        #[arg(long, default_value = "2000", allow_hyphen_values = true)]
        /// Threshold in USD, e.g. 2000 or 1999.5
        high_value: String,
    },
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("dogie={level}").parse()?),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = DogieConfig::load(args.config.as_deref());
    let level = args
        .log_level
        .clone()
        .or_else(|| config.as_ref().ok().map(|c| c.tool.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    if let Err(e) = init_tracing(&level) {
        eprintln!("invalid log level {level:?}: {e}");
        return ExitCode::FAILURE;
    }

    let shutdown = Shutdown::new();
    let _ctrl_c = shutdown.trigger_on_ctrl_c();
    let mut cancelled = shutdown.subscribe();

    let result = match config {
        Ok(config) => {
            tokio::select! {
                result = run(args, config, shutdown) => result,
                _ = cancelled.recv() => Err(anyhow::anyhow!("interrupted")),
            }
        }
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: DogieConfig, shutdown: Shutdown) -> anyhow::Result<()> {
    let table = NetworkTable::from_config(&config)?;

    let command = match args.command {
        Command::Networks => {
            commands::networks::run(&table, &config.tool.network);
            return Ok(());
        }
        Command::Upload {
            images,
            output,
            local_store,
            pinata_api_key,
            pinata_api_secret,
        } => {
            let images = images.unwrap_or_else(|| config.tool.random_images_dir.clone());
            let output = output.unwrap_or_else(|| config.tool.token_uris_path.clone());
            let service = commands::upload::service(
                &config.tool.pinata_api_url,
                local_store,
                pinata_api_key,
                pinata_api_secret,
            )?;
            return commands::upload::run(service.as_ref(), &images, &output).await;
        }
        command => command,
    };

    let network_name = args.network.unwrap_or_else(|| config.tool.network.clone());
    let network = table.resolve(&network_name)?;
    info!(
        network = network.name(),
        chain_id = network.chain_id(),
        development = network.development,
        "network selected"
    );

    let ctx = Context {
        rpc_url: args.rpc_url.unwrap_or_else(|| config.tool.rpc_url.clone()),
        artifacts_dir: args
            .artifacts_dir
            .unwrap_or_else(|| config.tool.artifacts_dir.clone()),
        private_key: args.private_key,
        network,
        config,
        shutdown,
    };

    match command {
        Command::Deploy { nft } => match nft {
            Nft::Basic => commands::deploy::basic(&ctx).await,
            Nft::RandomIpfs => commands::deploy::random_ipfs(&ctx).await,
            Nft::DynamicSvg => commands::deploy::dynamic_svg(&ctx).await,
        },
        Command::Mint { target } => match target {
            MintTarget::Basic { address } => commands::mint::basic(&ctx, address).await,
            MintTarget::RandomIpfs { address, value } => {
                commands::mint::random_ipfs(&ctx, address, value.as_deref()).await
            }
            MintTarget::DynamicSvg {
                address,
                high_value,
            } => commands::mint::dynamic_svg(&ctx, address, &high_value).await,
        },
        Command::Inspect { token_id, address } => {
            commands::mint::inspect(&ctx, address, token_id).await
        }
        Command::Networks | Command::Upload { .. } => Ok(()),
    }
}
