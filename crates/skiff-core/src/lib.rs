//! Core abstractions for the skiff deploy scaffold.
//!
//! This crate provides the fundamental types:
//! - `Stage` / `LifecyclePolicy` - environment-driven resource lifecycle
//! - `WorkerSpec` / `ProvisionedWorker` - deployable worker units
//! - `Deployment` - the ordered build-and-provision orchestrator
//! - `DeployError` - failure taxonomy for a deployment run

mod deploy;
mod error;
mod stage;
mod worker;

pub use deploy::*;
pub use error::*;
pub use stage::*;
pub use worker::*;
