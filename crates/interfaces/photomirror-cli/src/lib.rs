pub mod commands;

use anyhow::{anyhow, Result};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use clap::builder::BoolishValueParser;
use clap::Args;
use photomirror_config::{
    Settings, DEFAULT_DELETE, DEFAULT_DIR, DEFAULT_ENDPOINT, ENV_API_KEY, ENV_DELETE, ENV_DIR,
    ENV_DRY, ENV_EMAIL, ENV_ENDPOINT, ENV_PASSWORD,
};
use photomirror_pipeline::sync::Credentials;
use photomirror_pipeline::MirrorOptions;

/// Mirror options as given on the command line. Each value falls back to
/// its environment variable, then to the settings file.
#[derive(Args, Debug, Clone, Default)]
pub struct SyncArgs {
    /// SmugMug API key
    #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
    pub apikey: Option<String>,
    /// Account email address
    #[arg(long, env = ENV_EMAIL)]
    pub email: Option<String>,
    /// Account password
    #[arg(long, env = ENV_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,
    /// Local mirror root [default: current directory]
    #[arg(long, env = ENV_DIR)]
    pub dir: Option<Utf8PathBuf>,
    /// Report what would change without downloading or deleting
    #[arg(long, env = ENV_DRY, value_parser = BoolishValueParser::new())]
    pub dry: bool,
    /// Delete local files that are no longer on the server [default: true]
    #[arg(long, env = ENV_DELETE, value_parser = BoolishValueParser::new())]
    pub delete: Option<bool>,
    /// API endpoint
    #[arg(long, env = ENV_ENDPOINT)]
    pub endpoint: Option<String>,
    /// Settings file to use instead of the platform default
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,
}

/// Fully resolved settings for one mirror run.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub credentials: Credentials,
    pub dir: Utf8PathBuf,
    pub endpoint: String,
    pub options: MirrorOptions,
}

fn required(value: Option<String>, flag: &str, env: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("missing --{flag} (or {env} environment variable)"))
}

/// Relative paths are taken against `cwd`; `.` components are dropped.
pub fn absolutize(dir: &Utf8Path, cwd: &Utf8Path) -> Utf8PathBuf {
    if dir.is_absolute() {
        return dir.to_owned();
    }
    let mut out = cwd.to_owned();
    for c in dir.components() {
        if c != Utf8Component::CurDir {
            out.push(c.as_str());
        }
    }
    out
}

/// Merge flags (already carrying env fallbacks) with the settings file and
/// built-in defaults.
pub fn resolve(args: SyncArgs, settings: Settings, cwd: &Utf8Path) -> Result<ResolvedConfig> {
    let api_key = required(args.apikey.or(settings.api_key), "apikey", ENV_API_KEY)?;
    let email = required(args.email.or(settings.email), "email", ENV_EMAIL)?;
    let password = required(args.password.or(settings.password), "password", ENV_PASSWORD)?;

    let dir = args
        .dir
        .or_else(|| settings.dir.map(Utf8PathBuf::from))
        .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DIR));

    Ok(ResolvedConfig {
        credentials: Credentials {
            api_key,
            email,
            password,
        },
        dir: absolutize(&dir, cwd),
        endpoint: args
            .endpoint
            .or(settings.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        options: MirrorOptions {
            dry_run: args.dry,
            delete: args.delete.or(settings.delete).unwrap_or(DEFAULT_DELETE),
        },
    })
}
