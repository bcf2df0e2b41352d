//! Deploy the Api and App workers.

use anyhow::Result;
use chrono::Utc;
use dialoguer::Confirm;
use skiff_core::{BuildRunner, DeployError, DeployOutputs, Deployment, Removal, Stage};

use super::DeployArgs;
use crate::context::Context;
use crate::platform::{PlatformProvisioner, ProcessBuildRunner};

/// Build runner substituted in with `--no-build`.
struct SkipBuild;

impl BuildRunner for SkipBuild {
    fn run(&mut self) -> Result<(), DeployError> {
        Ok(())
    }
}

/// Run the deploy command.
pub async fn run(args: DeployArgs, ctx: &Context) -> Result<()> {
    let stage = Stage::resolve(args.stage.as_deref());
    let policy = stage.policy();
    let deployment = Deployment::new(stage.clone(), ctx.config.worker_specs());

    ctx.output
        .header(&format!("Deploying {} to {}", ctx.config.app.name, stage));
    ctx.output.kv("Stage", stage.name());
    ctx.output.kv("Removal", &policy.removal.to_string());
    ctx.output.kv("Protected", &policy.protect.to_string());

    if args.dry_run {
        ctx.output.step(1, 2, "Dry run - skipping application build");
        ctx.output.step(2, 2, "Dry run - skipping provisioning");
        for spec in deployment.workers() {
            ctx.output
                .list_item(&format!("Would provision '{}' from {}", spec.name, spec.handler));
        }
        ctx.output.success("Dry run completed successfully");
        return Ok(());
    }

    if !args.yes {
        ctx.output.info("");
        let confirmed = Confirm::new()
            .with_prompt(format!("Deploy to {}?", stage))
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Deployment cancelled");
            return Ok(());
        }
    }

    let mut provisioner = PlatformProvisioner::new(
        ctx.config.app.platform_command.as_str(),
        ctx.config.app.name.as_str(),
        stage.name(),
        ctx.cwd.clone(),
        ctx.output.clone(),
    );
    provisioner.check()?;

    if args.no_build {
        ctx.output.info("Skipping build (--no-build)");
    } else {
        ctx.output.info("Building application");
    }

    let mut build: Box<dyn BuildRunner> = if args.no_build {
        Box::new(SkipBuild)
    } else {
        Box::new(ProcessBuildRunner::new(
            ctx.config.build.command.clone(),
            ctx.config.build.args.clone(),
            ctx.cwd.clone(),
        ))
    };

    let outputs = deployment.run(build.as_mut(), &mut provisioner)?;

    ctx.output.success("Deployment successful!");
    for output in outputs.iter() {
        ctx.output.kv(&output.name, &output.url);
    }
    if ctx.output.is_json() {
        ctx.output.json(&outputs);
    }

    save_deployment_record(&deployment, &outputs, ctx)?;

    Ok(())
}

#[derive(serde::Serialize, serde::Deserialize)]
struct DeploymentRecord {
    app: String,
    stage: String,
    timestamp: String,
    removal: Removal,
    protect: bool,
    outputs: DeployOutputs,
}

fn save_deployment_record(
    deployment: &Deployment,
    outputs: &DeployOutputs,
    ctx: &Context,
) -> Result<()> {
    // One instant for both the record and its filename.
    let now = Utc::now();

    let record = DeploymentRecord {
        app: ctx.config.app.name.clone(),
        stage: deployment.stage().name().to_string(),
        timestamp: now.to_rfc3339(),
        removal: deployment.policy().removal,
        protect: deployment.policy().protect,
        outputs: outputs.clone(),
    };

    let deployments_dir = ctx.deployments_dir()?;
    let filename = format!("{}-{}.json", record.stage, now.format("%Y%m%d%H%M%S"));
    let path = deployments_dir.join(&filename);

    let json = serde_json::to_string_pretty(&record)?;
    std::fs::write(&path, json)?;

    ctx.output
        .debug(&format!("Saved deployment record: {}", path.display()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    use crate::config::CliConfig;
    use crate::context::Context;
    use crate::output::Output;

    #[test]
    fn test_record_filename_matches_record_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            config: CliConfig::default(),
            output: Output::new(false, false),
            cwd: dir.path().to_path_buf(),
        };
        let deployment = Deployment::new(Stage::resolve(None), ctx.config.worker_specs());

        save_deployment_record(&deployment, &DeployOutputs::default(), &ctx).unwrap();

        let deployments = dir.path().join(".skiff").join("deployments");
        let entry = std::fs::read_dir(&deployments)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        let filename = entry.file_name().into_string().unwrap();
        let record: DeploymentRecord =
            serde_json::from_str(&std::fs::read_to_string(entry.path()).unwrap()).unwrap();

        let stamp = DateTime::parse_from_rfc3339(&record.timestamp)
            .unwrap()
            .format("%Y%m%d%H%M%S")
            .to_string();
        assert_eq!(filename, format!("dev-{}.json", stamp));
        assert_eq!(record.stage, "dev");
    }
}
