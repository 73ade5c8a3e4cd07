use anyhow::anyhow;
use camino::Utf8PathBuf;
use clap::Parser;
use photomirror_cli::{commands, resolve, SyncArgs};
use photomirror_config::Settings;
use tracing_subscriber::EnvFilter;

/// Mirror a SmugMug account into a local directory tree.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long)]
    verbose: bool,
    #[command(flatten)]
    sync: SyncArgs,
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let settings = Settings::load(cli.sync.config.as_deref().map(|p| p.as_std_path()))?;
    let cwd = Utf8PathBuf::from_path_buf(std::env::current_dir()?)
        .map_err(|p| anyhow!("current directory {} is not valid UTF-8", p.display()))?;
    let cfg = resolve(cli.sync, settings, &cwd)?;
    tracing::debug!(dir = %cfg.dir, endpoint = %cfg.endpoint, "resolved configuration");

    commands::cmd_sync(cfg).await?;
    Ok(())
}
