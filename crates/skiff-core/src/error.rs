//! Error types for deployment runs.

use thiserror::Error;

/// Errors that can occur while running a deployment.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The external application build failed; nothing gets provisioned.
    #[error("application build failed: {0}")]
    BuildFailed(String),

    /// The platform CLI is not installed or not on the PATH.
    #[error("platform CLI `{0}` not found")]
    PlatformMissing(String),

    /// The platform rejected a worker.
    #[error("provisioning worker '{worker}' failed: {message}")]
    ProvisionFailed { worker: String, message: String },

    /// A worker's environment references a worker that is not provisioned
    /// before it in deploy order.
    #[error("worker '{worker}' references unprovisioned worker '{dependency}'")]
    UnknownWorker { worker: String, dependency: String },

    /// A worker was expected to have a public URL but the platform did not
    /// report one.
    #[error("worker '{0}' has no public URL")]
    MissingUrl(String),
}
