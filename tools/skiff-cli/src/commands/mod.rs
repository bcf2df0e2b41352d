//! CLI command implementations.

pub mod build;
pub mod config;
pub mod deploy;
pub mod package;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the build command.
#[derive(Args)]
pub struct BuildArgs {
    /// Override the configured build command (e.g. "pnpm -C apps/app build").
    #[arg(long)]
    pub command: Option<String>,
}

/// Arguments for the deploy command.
#[derive(Args)]
pub struct DeployArgs {
    /// Stage to deploy to (default: dev).
    #[arg(short, long)]
    pub stage: Option<String>,

    /// Skip the application build step.
    #[arg(long)]
    pub no_build: bool,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run (don't actually deploy).
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the package command.
#[derive(Args)]
pub struct PackageArgs {
    /// Bundle policy to plan with (default: from config).
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Clear the output directory.
    #[arg(long)]
    pub clean: bool,
}

/// Bundle policy selection on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// One output module per entry, dependencies external.
    Unbundle,
    /// Inline the configured no_external dependencies.
    Inline,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
