//! Plan the shared UI package build.

use anyhow::{Context as _, Result};
use skiff_build::BundlePolicy;

use super::{PackageArgs, PolicyArg};
use crate::context::Context;

/// Run the package command.
pub async fn run(args: PackageArgs, ctx: &Context) -> Result<()> {
    let mut build = ctx.config.package_build();
    build.out_dir = ctx.resolve_path(&ctx.config.package.out_dir);

    if let Some(policy) = args.policy {
        build.policy = match policy {
            PolicyArg::Unbundle => BundlePolicy::Unbundle {
                treeshake: ctx.config.package.treeshake,
            },
            PolicyArg::Inline => BundlePolicy::InlineDependencies {
                no_external: ctx.config.package.no_external.clone(),
            },
        };
    }

    let plan = build.plan()?;

    if args.clean {
        build
            .clean_out_dir()
            .with_context(|| format!("Failed to clear {}", build.out_dir.display()))?;
        ctx.output.debug(&format!("Cleared {}", build.out_dir.display()));
    }

    if ctx.output.is_json() {
        ctx.output.json(&plan);
        return Ok(());
    }

    ctx.output.header("UI package build plan");
    ctx.output.kv("Out dir", &plan.out_dir.display().to_string());
    ctx.output.kv("Format", &build.format.to_string());
    ctx.output.kv("Target", &build.target);
    ctx.output.kv("Policy", &build.policy.to_string());

    for artifact in &plan.artifacts {
        ctx.output.list_item(&format!(
            "{} -> {}",
            artifact.entry,
            artifact.module.display()
        ));
        if let Some(ref dts) = artifact.declarations {
            ctx.output.debug(&format!("  types: {}", dts.display()));
        }
    }

    if !plan.inlined.is_empty() {
        ctx.output.kv("Inlined", &plan.inlined.join(", "));
    }

    ctx.output.success(&format!(
        "{} artifacts planned from {} entries",
        plan.artifacts.len(),
        build.entries().len()
    ));

    Ok(())
}
