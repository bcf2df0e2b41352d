//! Build descriptor for the shared UI package.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Module format for emitted artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// ES modules (`.mjs`).
    #[default]
    Esm,
    /// CommonJS (`.cjs`).
    Cjs,
}

impl ModuleFormat {
    /// File extension for modules of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Esm => "mjs",
            Self::Cjs => "cjs",
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Esm => f.write_str("esm"),
            Self::Cjs => f.write_str("cjs"),
        }
    }
}

/// How entries relate to their dependencies in the output.
///
/// The package's two historical configurations conflicted on this, so the
/// choice is explicit for the caller rather than a hidden default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BundlePolicy {
    /// One output module per entry, dependencies left external.
    Unbundle {
        /// Drop unreferenced exports while emitting.
        #[serde(default = "default_true")]
        treeshake: bool,
    },
    /// Named dependencies are inlined into the output modules.
    InlineDependencies {
        /// Dependencies to inline instead of leaving external.
        no_external: Vec<String>,
    },
}

fn default_true() -> bool {
    true
}

impl Default for BundlePolicy {
    fn default() -> Self {
        Self::Unbundle { treeshake: true }
    }
}

impl fmt::Display for BundlePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbundle { treeshake: true } => f.write_str("unbundle (treeshaken)"),
            Self::Unbundle { treeshake: false } => f.write_str("unbundle"),
            Self::InlineDependencies { no_external } => {
                write!(f, "inline [{}]", no_external.join(", "))
            }
        }
    }
}

/// Build descriptor for the UI package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageBuild {
    /// Public entry points, in declaration order, de-duplicated.
    entries: Vec<String>,
    /// Output module format.
    #[serde(default)]
    pub format: ModuleFormat,
    /// Language target passed through to the emitter.
    #[serde(default = "default_target")]
    pub target: String,
    /// Output directory.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// Emit type declaration files.
    #[serde(default = "default_true")]
    pub dts: bool,
    /// Emit source maps.
    #[serde(default = "default_true")]
    pub sourcemap: bool,
    /// Clear prior output before each build.
    #[serde(default = "default_true")]
    pub clean: bool,
    /// Dependency handling policy.
    #[serde(default)]
    pub policy: BundlePolicy,
}

fn default_target() -> String {
    "esnext".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for PackageBuild {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            format: ModuleFormat::Esm,
            target: default_target(),
            out_dir: default_out_dir(),
            dts: true,
            sourcemap: true,
            clean: true,
            policy: BundlePolicy::default(),
        }
    }
}

impl PackageBuild {
    /// Create a descriptor emitting into `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            ..Self::default()
        }
    }

    /// Add an entry point. Duplicates are ignored; order is preserved.
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        let entry = entry.into();
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
        self
    }

    /// Add several entry points.
    pub fn with_entries<I, S>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        entries.into_iter().fold(self, |b, e| b.with_entry(e))
    }

    /// Set the dependency handling policy.
    pub fn with_policy(mut self, policy: BundlePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The entry set, in declaration order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_deduplicate_preserving_order() {
        let build = PackageBuild::new("dist")
            .with_entry("src/components/ui/button.tsx")
            .with_entry("src/lib/utils.ts")
            .with_entry("src/components/ui/button.tsx");

        assert_eq!(
            build.entries(),
            ["src/components/ui/button.tsx", "src/lib/utils.ts"]
        );
    }

    #[test]
    fn test_defaults_match_declared_descriptor() {
        let build = PackageBuild::default();

        assert_eq!(build.format, ModuleFormat::Esm);
        assert_eq!(build.target, "esnext");
        assert_eq!(build.out_dir, PathBuf::from("dist"));
        assert!(build.dts);
        assert!(build.sourcemap);
        assert!(build.clean);
        assert_eq!(build.policy, BundlePolicy::Unbundle { treeshake: true });
    }
}
