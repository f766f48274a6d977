use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "offload",
    about = "Offload message payloads to an object store and manage their references",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Payload storage settings file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the bucket directories
    #[arg(long, global = true, default_value = ".offload")]
    pub root: PathBuf,

    /// Bucket to store payloads in (overrides the settings file)
    #[arg(short, long, global = true)]
    pub bucket: Option<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the bucket directory under the root
    Init(InitArgs),
    /// Store a payload and print its reference
    Store(StoreArgs),
    /// Print the payload a reference points to
    Fetch(FetchArgs),
    /// Delete the payload a reference points to
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct InitArgs {}

#[derive(Args)]
pub struct StoreArgs {
    /// Object key to use instead of a generated one
    #[arg(short, long)]
    pub key: Option<String>,
    /// Read the payload from this file instead of stdin
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct FetchArgs {
    pub reference: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub reference: String,
}
