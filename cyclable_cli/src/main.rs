use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{compute::ComputeArgs, pairs::PairsArgs};

mod compute;
mod file_utils;
mod pairs;
mod parsers;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Route between neighboring points and score the cycling network
    #[command(visible_alias = "c")]
    Compute {
        #[command(flatten)]
        args: ComputeArgs,
    },
    /// Print the pairs that would be routed
    Pairs {
        #[command(flatten)]
        args: PairsArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename(".env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Compute { args } => compute::run(args).await?,
        Commands::Pairs { args } => pairs::run(args)?,
    }

    Ok(())
}
