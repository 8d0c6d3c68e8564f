//! CLI definitions and entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use authbridge_domain::{Config, HttpMethod};
use authbridge_infra::{
    config, token_store_from_config, ApiClientFactory, AuthApi, EndpointPaths, UnauthorizedHook,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::commands;

/// authbridge - JSON:API client with transparent token refresh
#[derive(Parser, Debug)]
#[command(name = "authbridge", version, about = "JSON:API client with transparent token refresh")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (JSON or TOML); defaults to environment, then probing
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log in and store the access token
    Login {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        password: String,
    },

    /// Show the current user
    Me,

    /// End the session and forget the access token
    Logout,

    /// Exchange the refresh cookie for a new access token
    Refresh,

    /// Send an arbitrary request
    Request {
        /// GET, POST, PUT, PATCH or DELETE
        method: HttpMethod,

        /// Path relative to the base URL, prefix included (e.g. /api/user/me)
        path: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,

        /// Which client preset to send the request with
        #[arg(long, value_enum, default_value_t = Preset::Authed)]
        preset: Preset,
    },
}

/// Client presets selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Bearer,
    Authed,
    Cookie,
}

/// Run the CLI
///
/// Returns whether the command succeeded.
pub async fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    let store = token_store_from_config(&config.session);
    let hook: UnauthorizedHook = Arc::new(|| tracing::warn!("session expired, log in again"));
    let factory = ApiClientFactory::from_config(&config, store, Some(hook))
        .await
        .context("failed to set up API client")?;
    let api = AuthApi::new(factory, EndpointPaths::from_config(&config.api));

    let succeeded = commands::execute(&api, cli.command).await?;
    if let Err(err) = api.factory().save_cookies().await {
        tracing::warn!(error = %err, "failed to save session cookies");
    }
    Ok(succeeded)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return config::load_from_file(Some(path)).context("failed to load config file");
    }

    match config::load() {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::debug!(error = %err, "no usable configuration found, using defaults");
            Ok(Config::default())
        }
    }
}
