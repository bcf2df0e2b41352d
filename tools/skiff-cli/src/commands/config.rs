//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.info("");
    ctx.output.info("[app]");
    ctx.output.kv("name", &ctx.config.app.name);
    ctx.output.kv("platform_command", &ctx.config.app.platform_command);

    ctx.output.info("");
    ctx.output.info("[build]");
    ctx.output.kv("command", &ctx.config.build.command);
    ctx.output.kv("args", &ctx.config.build.args.join(" "));

    ctx.output.info("");
    ctx.output.info("[package]");
    ctx.output.kv("entries", &ctx.config.package.entries.join(", "));
    ctx.output.kv("out_dir", &ctx.config.package.out_dir);
    ctx.output.kv("bundle", &ctx.config.package.bundle);

    for (section, worker) in [
        ("[workers.api]", &ctx.config.workers.api),
        ("[workers.app]", &ctx.config.workers.app),
    ] {
        ctx.output.info("");
        ctx.output.info(section);
        ctx.output.kv("handler", &worker.handler);
        ctx.output.kv("url", &worker.url.to_string());
        for (key, value) in &worker.environment {
            ctx.output.kv(key, &format!("{:?}", value));
        }
    }

    ctx.output.info("");
    ctx.output.info("[dev]");
    ctx.output.kv("port", &ctx.config.dev.port.to_string());

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let path = ctx.cwd.join("skiff.toml");

    if path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    let name = ctx
        .cwd
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("hfjp");

    std::fs::write(&path, generate_default_config(name))?;

    ctx.output
        .success(&format!("Created {}", path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    let problems = ctx.config.problems();

    if problems.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for problem in &problems {
        ctx.output.warn(problem);
    }
    bail!("{} configuration problem(s) found", problems.len());
}
