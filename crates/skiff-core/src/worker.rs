//! Worker definitions and environment wiring.

use serde::{Deserialize, Serialize};

/// A value placed into a worker's runtime environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvValue {
    /// A plain string, known before deployment.
    Literal(String),
    /// The public URL of another worker, known only once that worker has
    /// been provisioned. Induces a deploy-order dependency.
    WorkerUrl(String),
}

impl EnvValue {
    /// Create a literal value.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Create a value resolved from another worker's public URL.
    pub fn worker_url(worker: impl Into<String>) -> Self {
        Self::WorkerUrl(worker.into())
    }
}

/// Specification for a deployable worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSpec {
    /// Unique name for this worker.
    pub name: String,
    /// Handler entry-point path.
    pub handler: String,
    /// Whether to request a public URL from the platform.
    #[serde(default)]
    pub url: bool,
    /// Environment variables, in declaration order.
    #[serde(default)]
    pub environment: Vec<(String, EnvValue)>,
}

impl WorkerSpec {
    /// Create a new worker spec.
    pub fn new(name: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler: handler.into(),
            url: false,
            environment: Vec::new(),
        }
    }

    /// Request a public URL for this worker.
    pub fn with_url(mut self) -> Self {
        self.url = true;
        self
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: EnvValue) -> Self {
        self.environment.push((key.into(), value));
        self
    }

    /// Names of workers whose URLs this spec's environment references.
    pub fn depends_on(&self) -> Vec<&str> {
        self.environment
            .iter()
            .filter_map(|(_, value)| match value {
                EnvValue::WorkerUrl(name) => Some(name.as_str()),
                EnvValue::Literal(_) => None,
            })
            .collect()
    }
}

/// A worker the platform has accepted, with its resolved URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedWorker {
    /// Worker name, matching the spec it was provisioned from.
    pub name: String,
    /// Public URL, present when the spec requested one.
    pub url: Option<String>,
}
