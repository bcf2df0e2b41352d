//! Process-backed build and provisioning adapters.
//!
//! `ProcessBuildRunner` runs the configured application build command with
//! inherited stdio so the build tool's own diagnostics stream through.
//! `PlatformProvisioner` shells out to the platform CLI once per worker and
//! scrapes the deployed URL from its stdout.

use std::path::PathBuf;
use std::process::Command;

use skiff_core::{BuildRunner, DeployError, ProvisionedWorker, Provisioner, WorkerSpec};

use crate::output::Output;

/// Runs the external application build command.
pub struct ProcessBuildRunner {
    command: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl ProcessBuildRunner {
    pub fn new(command: impl Into<String>, args: Vec<String>, cwd: PathBuf) -> Self {
        Self {
            command: command.into(),
            args,
            cwd,
        }
    }
}

impl BuildRunner for ProcessBuildRunner {
    fn run(&mut self) -> Result<(), DeployError> {
        let status = Command::new(&self.command)
            .args(&self.args)
            .current_dir(&self.cwd)
            .status()
            .map_err(|e| DeployError::BuildFailed(format!("`{}`: {}", self.command, e)))?;

        if !status.success() {
            return Err(DeployError::BuildFailed(format!(
                "`{} {}` exited with {}",
                self.command,
                self.args.join(" "),
                status
            )));
        }

        Ok(())
    }
}

/// Provisions workers by shelling out to the platform CLI.
pub struct PlatformProvisioner {
    command: String,
    app_name: String,
    stage: String,
    cwd: PathBuf,
    output: Output,
}

impl PlatformProvisioner {
    pub fn new(
        command: impl Into<String>,
        app_name: impl Into<String>,
        stage: impl Into<String>,
        cwd: PathBuf,
        output: Output,
    ) -> Self {
        Self {
            command: command.into(),
            app_name: app_name.into(),
            stage: stage.into(),
            cwd,
            output,
        }
    }

    /// Check that the platform CLI is installed.
    pub fn check(&self) -> Result<(), DeployError> {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .map(|_| ())
            .map_err(|_| DeployError::PlatformMissing(self.command.clone()))
    }

    /// Platform resource name for a worker, e.g. `hfjp-dev-api`.
    fn resource_name(&self, worker: &str) -> String {
        format!("{}-{}-{}", self.app_name, self.stage, worker.to_lowercase())
    }
}

impl Provisioner for PlatformProvisioner {
    fn provision(
        &mut self,
        spec: &WorkerSpec,
        environment: &[(String, String)],
    ) -> Result<ProvisionedWorker, DeployError> {
        self.output
            .info(&format!("Provisioning worker '{}'", spec.name));

        let mut args = vec![
            "deploy".to_string(),
            spec.handler.clone(),
            "--name".to_string(),
            self.resource_name(&spec.name),
        ];
        if spec.url {
            args.push("--url".to_string());
        }
        for (key, value) in environment {
            args.push("--var".to_string());
            args.push(format!("{}={}", key, value));
        }

        self.output
            .debug(&format!("{} {}", self.command, args.join(" ")));

        let spinner = self.output.spinner("Provisioning...");

        let result = Command::new(&self.command)
            .args(&args)
            .current_dir(&self.cwd)
            .output();

        spinner.finish_and_clear();

        let output = result.map_err(|e| DeployError::ProvisionFailed {
            worker: spec.name.clone(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(DeployError::ProvisionFailed {
                worker: spec.name.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        self.output.debug(&stdout);

        let url = extract_deployed_url(&stdout);
        if let Some(ref url) = url {
            self.output.kv("URL", url);
        }

        Ok(ProvisionedWorker {
            name: spec.name.clone(),
            url,
        })
    }
}

/// Extract the first https URL from the platform CLI output.
fn extract_deployed_url(output: &str) -> Option<String> {
    for line in output.lines() {
        if let Some(start) = line.find("https://") {
            let url_part = &line[start..];
            let end = url_part
                .find(|c: char| c.is_whitespace())
                .unwrap_or(url_part.len());
            return Some(url_part[..end].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_url_from_deploy_output() {
        let stdout = "Uploaded hfjp-dev-api\nDeployed to https://hfjp-dev-api.workers.dev (1.2s)\n";

        assert_eq!(
            extract_deployed_url(stdout),
            Some("https://hfjp-dev-api.workers.dev".to_string())
        );
    }

    #[test]
    fn test_extract_url_none_without_url() {
        assert_eq!(extract_deployed_url("Uploaded. No routes.\n"), None);
    }

    #[test]
    fn test_resource_name_includes_app_and_stage() {
        let provisioner = PlatformProvisioner::new(
            "wrangler",
            "hfjp",
            "production",
            PathBuf::from("."),
            Output::new(false, false),
        );

        assert_eq!(provisioner.resource_name("Api"), "hfjp-production-api");
    }
}
