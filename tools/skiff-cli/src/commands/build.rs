//! Run the application build step on its own.

use anyhow::{bail, Result};
use skiff_core::BuildRunner;

use super::BuildArgs;
use crate::context::Context;
use crate::platform::ProcessBuildRunner;

/// Run the build command.
pub async fn run(args: BuildArgs, ctx: &Context) -> Result<()> {
    let (command, command_args) = match args.command {
        Some(ref line) => {
            let mut parts = line.split_whitespace().map(String::from);
            let Some(command) = parts.next() else {
                bail!("--command is empty");
            };
            (command, parts.collect())
        }
        None => (
            ctx.config.build.command.clone(),
            ctx.config.build.args.clone(),
        ),
    };

    ctx.output.header("Building application");
    ctx.output
        .debug(&format!("{} {}", command, command_args.join(" ")));

    let mut runner = ProcessBuildRunner::new(command, command_args, ctx.cwd.clone());
    runner.run()?;

    ctx.output.success("Build completed");

    Ok(())
}
