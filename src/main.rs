use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod domain;
mod application;
mod infrastructure;
mod plugins;

use application::services::BotSession;
use domain::traits::Gateway;
use infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use infrastructure::config::Config;
use infrastructure::workspace::Workspace;
use plugins::{ConstructorRegistry, PluginManager};

#[derive(Parser)]
#[command(name = "warden-bot")]
#[command(about = "A plugin-driven chat bot with owner-controlled reload", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Workspace directory (defaults to the executable's directory)
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Remove generated files from the cleanup folders
    Clean,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let workspace = match cli.workspace {
        Some(root) => Workspace::new(root),
        None => Workspace::from_exe(),
    };

    match cli.command {
        Commands::Run => {
            run_bot(workspace, cli.token);
        }
        Commands::Clean => {
            clean(workspace);
        }
        Commands::Version => {
            println!("warden-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(workspace: Workspace, token_override: Option<String>) {
    let mut config = Config::load_or_report(workspace.config_file());
    if let Some(token) = token_override {
        config.connection.token = token;
    }

    tracing::info!("Starting {}", config.bot.name);
    if let Err(e) = workspace.ensure_tmp() {
        tracing::warn!("Could not create tmp directory: {}", e);
    }

    let plugins_root = workspace.plugins_root(&config.plugins.root);
    let cleanup_folders = config.cleanup.folders.clone();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let plugins = PluginManager::new(plugins_root, ConstructorRegistry::with_builtins());
        let token = config.token().map(str::to_string);
        match token {
            Some(token) => {
                let adapter = TelegramAdapter::new(token, config.connection.poll_timeout_secs);
                run_session(config, plugins, adapter).await;
            }
            None => {
                tracing::warn!("No token configured; starting console session");
                run_session(config, plugins, ConsoleAdapter::new()).await;
            }
        }
    });

    // Shutdown cleanup is guarded: failures are logged, never raised
    tracing::info!("Cleaning up generated files");
    match workspace.cleanup(&cleanup_folders) {
        Ok(removed) => tracing::info!("Cleanup complete; removed {} file(s)", removed),
        Err(e) => tracing::error!("Cleanup failed: {}", e),
    }
}

async fn run_session<G: Gateway + 'static>(config: Config, plugins: PluginManager, gateway: G) {
    let mut session = BotSession::new(config, plugins, gateway);
    match session.run().await {
        Ok(()) => {}
        Err(e) if e.is_auth() => {
            // Fatal: a rejected credential is never retried
            tracing::error!("Improper token has been passed: {}", e);
        }
        Err(e) => {
            tracing::error!("Session ended with error: {}", e);
        }
    }
}

fn clean(workspace: Workspace) {
    let config = Config::load_or_report(workspace.config_file());
    match workspace.cleanup(&config.cleanup.folders) {
        Ok(removed) => tracing::info!("Removed {} file(s)", removed),
        Err(e) => tracing::error!("Cleanup failed: {}", e),
    }
}

fn init_config() {
    let config = Config::default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => {
            println!("{}", json);
            eprintln!("Save this to config/config.json inside the workspace");
        }
        Err(e) => {
            eprintln!("Failed to generate config: {}", e);
        }
    }
}
