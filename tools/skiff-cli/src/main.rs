//! Skiff CLI - deploy tool for the worker scaffold.
//!
//! Commands:
//! - `skiff deploy` - Build the application and provision the workers
//! - `skiff build` - Run the application build step on its own
//! - `skiff package` - Plan the shared UI package build
//! - `skiff config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;
mod platform;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{BuildArgs, ConfigArgs, DeployArgs, PackageArgs};

/// Skiff CLI - deploy and manage the worker scaffold
#[derive(Parser)]
#[command(name = "skiff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the application build step
    Build(BuildArgs),

    /// Deploy the Api and App workers
    Deploy(DeployArgs),

    /// Plan the shared UI package build
    Package(PackageArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Build(args) => commands::build::run(args, &ctx).await,
        Commands::Deploy(args) => commands::deploy::run(args, &ctx).await,
        Commands::Package(args) => commands::package::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
