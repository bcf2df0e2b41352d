//! UI package build descriptor and output planning.
//!
//! A `PackageBuild` declares which source files are the public entry
//! points of the shared UI package and how they are emitted. `plan()`
//! derives the output artifacts deterministically from the entry set -
//! one module per entry, no cross-entry bundling under the unbundle
//! policy.

mod descriptor;
mod plan;

pub use descriptor::*;
pub use plan::*;
