use anyhow::Result;
use clap::Parser;
use log::{error, info};

mod config;
mod export;
mod helius;
mod pipeline;
mod replay;

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

async fn run(cli: config::Cli) -> Result<()> {
    let cfg = config::load(&cli)?;

    info!("exporter starting:");
    info!("  address={}", cfg.address);
    info!(
        "  mode={}",
        if cfg.from_file.is_some() {
            "replay"
        } else {
            "fetch"
        }
    );
    info!("  api_url={}", cfg.api_url);
    info!("  api_key_set={}", cfg.api_key.is_some());
    info!(
        "  limit={} before={:?} until={:?}",
        cfg.fetch.limit, cfg.fetch.before, cfg.fetch.until
    );
    info!("  output_dir={}", cfg.output_dir.display());
    info!("  verbose={}", cfg.verbose);

    pipeline::run(&cfg).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = config::Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("export failed: {e:?}");
        std::process::exit(1);
    }
}
