//! Deployment stages and the lifecycle policy derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named deployment environment.
///
/// Stages are open-ended: any name is a valid stage. `production` is the
/// only distinguished value, and a stage is immutable for the duration of
/// a deployment run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stage(String);

impl Stage {
    /// The stage name that switches on production lifecycle policy.
    pub const PRODUCTION: &'static str = "production";

    /// The stage used when none is given.
    pub const DEFAULT: &'static str = "dev";

    /// Create a stage from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Resolve a stage from an optional input, falling back to `dev`.
    pub fn resolve(input: Option<&str>) -> Self {
        Self(input.unwrap_or(Self::DEFAULT).to_string())
    }

    /// The stage name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether this is the production stage.
    pub fn is_production(&self) -> bool {
        self.0 == Self::PRODUCTION
    }

    /// Derive the resource lifecycle policy for this stage.
    ///
    /// Production retains and protects resources; every other stage removes
    /// them on teardown and leaves them unprotected.
    pub fn policy(&self) -> LifecyclePolicy {
        if self.is_production() {
            LifecyclePolicy {
                removal: Removal::Retain,
                protect: true,
            }
        } else {
            LifecyclePolicy {
                removal: Removal::Remove,
                protect: false,
            }
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happens to provisioned resources on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Removal {
    /// Resources are kept when the deployment is torn down.
    Retain,
    /// Resources are deleted when the deployment is torn down.
    Remove,
}

impl fmt::Display for Removal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retain => f.write_str("retain"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// Resource lifecycle policy for one deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecyclePolicy {
    /// Teardown behavior for provisioned resources.
    pub removal: Removal,
    /// Whether resources are protected from accidental deletion.
    pub protect: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_policy_retains_and_protects() {
        let policy = Stage::new("production").policy();

        assert_eq!(policy.removal, Removal::Retain);
        assert!(policy.protect);
    }

    #[test]
    fn test_non_production_policy_removes_unprotected() {
        for name in ["dev", "staging", "prod", "Production", ""] {
            let policy = Stage::new(name).policy();

            assert_eq!(policy.removal, Removal::Remove, "stage {:?}", name);
            assert!(!policy.protect, "stage {:?}", name);
        }
    }

    #[test]
    fn test_resolve_defaults_to_dev() {
        assert_eq!(Stage::resolve(None).name(), "dev");
        assert_eq!(Stage::resolve(None).policy(), Stage::default().policy());
    }

    #[test]
    fn test_resolve_uses_given_stage() {
        let stage = Stage::resolve(Some("production"));

        assert_eq!(stage.name(), "production");
        assert!(stage.is_production());
    }
}
