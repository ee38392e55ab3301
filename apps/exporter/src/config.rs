use anyhow::{Result, anyhow};
use clap::Parser;
use std::{env, path::PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.helius.xyz/v0";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

#[derive(Parser, Debug, Clone)]
#[command(about = "Export enhanced transaction history for a Solana address to JSON")]
pub struct Cli {
    /// Address whose transaction history is exported
    #[arg(long)]
    pub address: String,

    /// Max transactions to request (sent to the API as-is)
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    pub limit: i64,

    /// Only return transactions before this signature
    #[arg(long)]
    pub before: Option<String>,

    /// Only return transactions after this signature
    #[arg(long)]
    pub until: Option<String>,

    /// Directory for the export file (env OUTPUT_DIR, default ./output)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Enhanced API base URL (env HELIUS_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Re-export a saved API response (JSON array) instead of fetching
    #[arg(long)]
    pub from_file: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Query cursors for one fetch. Values are not validated locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub limit: i64,
    pub before: Option<String>,
    pub until: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            before: None,
            until: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub address: String,
    /// None only in replay mode
    pub api_key: Option<String>,
    pub api_url: String,
    pub fetch: FetchOptions,
    pub output_dir: PathBuf,
    pub from_file: Option<PathBuf>,
    pub verbose: bool,
}

pub fn load(cli: &Cli) -> Result<Config> {
    load_with(cli, |k| env::var(k).ok())
}

fn load_with(cli: &Cli, var: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let address = cli.address.trim().to_string();
    if address.is_empty() {
        return Err(anyhow!("--address is empty"));
    }

    let api_key = var("HELIUS_API_KEY").filter(|k| !k.trim().is_empty());

    // Replay mode never talks to the API
    if cli.from_file.is_none() && api_key.is_none() {
        return Err(anyhow!(
            "Missing HELIUS_API_KEY (set it in the environment or .env, or use --from-file)"
        ));
    }

    let api_url = cli
        .api_url
        .clone()
        .or_else(|| var("HELIUS_API_URL"))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let output_dir = cli
        .output_dir
        .clone()
        .or_else(|| var("OUTPUT_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    Ok(Config {
        address,
        api_key,
        api_url,
        fetch: FetchOptions {
            limit: cli.limit,
            before: cli.before.clone(),
            until: cli.until.clone(),
        },
        output_dir,
        from_file: cli.from_file.clone(),
        verbose: cli.verbose,
    })
}
