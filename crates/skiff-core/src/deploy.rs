//! The deploy orchestrator: one ordered pass from build to outputs.
//!
//! A deployment is a plain sequential procedure. The external application
//! build runs first and any failure there is fatal; workers are then
//! provisioned in declaration order, with environment values that reference
//! another worker's URL resolved just before provisioning (provision, then
//! configure the next - never lazy). There is no retry and no rollback at
//! this layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DeployError;
use crate::stage::{LifecyclePolicy, Stage};
use crate::worker::{EnvValue, ProvisionedWorker, WorkerSpec};

/// Runs the external application build step.
pub trait BuildRunner {
    /// Run the build. An `Err` aborts the deployment before any
    /// provisioning happens.
    fn run(&mut self) -> Result<(), DeployError>;
}

/// Provisions workers on the target platform.
///
/// `environment` is the fully resolved variable set for the worker; all
/// URL references have already been substituted.
pub trait Provisioner {
    fn provision(
        &mut self,
        spec: &WorkerSpec,
        environment: &[(String, String)],
    ) -> Result<ProvisionedWorker, DeployError>;
}

/// One named output of a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployOutput {
    pub name: String,
    pub url: String,
}

/// Named URL outputs of a successful deployment, in deploy order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployOutputs(Vec<DeployOutput>);

impl DeployOutputs {
    /// Look up an output by name (e.g. `apiUrl`).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.url.as_str())
    }

    /// Iterate outputs in deploy order.
    pub fn iter(&self) -> impl Iterator<Item = &DeployOutput> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, name: String, url: String) {
        self.0.push(DeployOutput { name, url });
    }
}

/// A deployment: a stage, its derived policy, and workers in deploy order.
#[derive(Debug, Clone)]
pub struct Deployment {
    stage: Stage,
    policy: LifecyclePolicy,
    workers: Vec<WorkerSpec>,
}

impl Deployment {
    /// Create a deployment for `stage` with `workers` in deploy order.
    pub fn new(stage: Stage, workers: Vec<WorkerSpec>) -> Self {
        let policy = stage.policy();
        Self {
            stage,
            policy,
            workers,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn policy(&self) -> LifecyclePolicy {
        self.policy
    }

    pub fn workers(&self) -> &[WorkerSpec] {
        &self.workers
    }

    /// Execute the deployment.
    ///
    /// Runs the build, then provisions each worker in order, resolving
    /// environment references as URLs become known. Returns one output per
    /// worker that requested a public URL, named `<name>Url` with the
    /// worker name lowercased.
    pub fn run(
        &self,
        build: &mut dyn BuildRunner,
        provisioner: &mut dyn Provisioner,
    ) -> Result<DeployOutputs, DeployError> {
        build.run()?;

        let mut provisioned: HashMap<String, ProvisionedWorker> = HashMap::new();
        let mut outputs = DeployOutputs::default();

        for spec in &self.workers {
            let environment = resolve_environment(spec, &provisioned)?;
            let worker = provisioner.provision(spec, &environment)?;

            if spec.url {
                let url = worker
                    .url
                    .clone()
                    .ok_or_else(|| DeployError::MissingUrl(spec.name.clone()))?;
                outputs.push(output_name(&spec.name), url);
            }

            provisioned.insert(spec.name.clone(), worker);
        }

        Ok(outputs)
    }
}

/// Output key for a worker, e.g. `Api` -> `apiUrl`.
fn output_name(worker: &str) -> String {
    format!("{}Url", worker.to_lowercase())
}

fn resolve_environment(
    spec: &WorkerSpec,
    provisioned: &HashMap<String, ProvisionedWorker>,
) -> Result<Vec<(String, String)>, DeployError> {
    spec.environment
        .iter()
        .map(|(key, value)| {
            let resolved = match value {
                EnvValue::Literal(s) => s.clone(),
                EnvValue::WorkerUrl(name) => {
                    let worker =
                        provisioned
                            .get(name)
                            .ok_or_else(|| DeployError::UnknownWorker {
                                worker: spec.name.clone(),
                                dependency: name.clone(),
                            })?;
                    worker
                        .url
                        .clone()
                        .ok_or_else(|| DeployError::MissingUrl(name.clone()))?
                }
            };
            Ok((key.clone(), resolved))
        })
        .collect()
}
