//! Deterministic output planning for the UI package build.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::descriptor::{BundlePolicy, PackageBuild};

/// Errors in deriving a build plan from the descriptor.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The entry set is empty; there is nothing to emit.
    #[error("entry set is empty")]
    NoEntries,

    /// Two entries would emit the same output module.
    #[error("entries '{first}' and '{second}' collide on output name '{name}'")]
    OutputCollision {
        first: String,
        second: String,
        name: String,
    },
}

/// The files one entry point emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    /// Source entry this artifact is derived from.
    pub entry: String,
    /// Emitted module file.
    pub module: PathBuf,
    /// Emitted type declaration file, when `dts` is set.
    pub declarations: Option<PathBuf>,
    /// Emitted source map, when `sourcemap` is set.
    pub source_map: Option<PathBuf>,
}

/// A resolved build plan: exactly one artifact per entry, in entry order.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    /// Output directory the artifacts land in.
    pub out_dir: PathBuf,
    /// Whether prior output is cleared before emitting.
    pub clean: bool,
    /// Artifacts, one per entry.
    pub artifacts: Vec<OutputArtifact>,
    /// Dependencies inlined into the outputs (inline policy only).
    pub inlined: Vec<String>,
}

impl PackageBuild {
    /// Derive the build plan from the entry set.
    ///
    /// The plan is a pure function of the descriptor - it never touches the
    /// filesystem, so two identical descriptors always plan identically.
    pub fn plan(&self) -> Result<BuildPlan, PlanError> {
        if self.entries().is_empty() {
            return Err(PlanError::NoEntries);
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut artifacts = Vec::with_capacity(self.entries().len());

        for entry in self.entries() {
            let name = output_stem(entry);
            if let Some(first) = seen.insert(name.clone(), entry) {
                return Err(PlanError::OutputCollision {
                    first: first.to_string(),
                    second: entry.clone(),
                    name,
                });
            }

            let module = self
                .out_dir
                .join(format!("{}.{}", name, self.format.extension()));
            artifacts.push(OutputArtifact {
                entry: entry.clone(),
                declarations: self.dts.then(|| self.out_dir.join(format!("{name}.d.ts"))),
                source_map: self
                    .sourcemap
                    .then(|| module.with_extension(format!("{}.map", self.format.extension()))),
                module,
            });
        }

        let inlined = match &self.policy {
            BundlePolicy::Unbundle { .. } => Vec::new(),
            BundlePolicy::InlineDependencies { no_external } => no_external.clone(),
        };

        Ok(BuildPlan {
            out_dir: self.out_dir.clone(),
            clean: self.clean,
            artifacts,
            inlined,
        })
    }

    /// Clear prior output, honoring the `clean` flag.
    ///
    /// Recreates the output directory empty. A missing directory is not an
    /// error.
    pub fn clean_out_dir(&self) -> io::Result<()> {
        if !self.clean {
            return Ok(());
        }
        if self.out_dir.exists() {
            std::fs::remove_dir_all(&self.out_dir)?;
        }
        std::fs::create_dir_all(&self.out_dir)
    }
}

/// Output name for an entry: its file stem, extension stripped.
fn output_stem(entry: &str) -> String {
    Path::new(entry)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(entry)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ModuleFormat;

    fn ui_package() -> PackageBuild {
        PackageBuild::new("dist")
            .with_entry("src/components/ui/button.tsx")
            .with_entry("src/lib/utils.ts")
    }

    #[test]
    fn test_one_artifact_per_entry_in_order() {
        let plan = ui_package().plan().unwrap();

        assert_eq!(plan.artifacts.len(), 2);
        assert_eq!(plan.artifacts[0].entry, "src/components/ui/button.tsx");
        assert_eq!(plan.artifacts[0].module, PathBuf::from("dist/button.mjs"));
        assert_eq!(plan.artifacts[1].module, PathBuf::from("dist/utils.mjs"));
    }

    #[test]
    fn test_dts_and_sourcemap_paths() {
        let plan = ui_package().plan().unwrap();

        assert_eq!(
            plan.artifacts[0].declarations,
            Some(PathBuf::from("dist/button.d.ts"))
        );
        assert_eq!(
            plan.artifacts[0].source_map,
            Some(PathBuf::from("dist/button.mjs.map"))
        );
    }

    #[test]
    fn test_disabled_dts_and_sourcemap_omit_files() {
        let mut build = ui_package();
        build.dts = false;
        build.sourcemap = false;

        let plan = build.plan().unwrap();

        assert!(plan.artifacts.iter().all(|a| a.declarations.is_none()));
        assert!(plan.artifacts.iter().all(|a| a.source_map.is_none()));
    }

    #[test]
    fn test_cjs_format_extension() {
        let mut build = ui_package();
        build.format = ModuleFormat::Cjs;

        let plan = build.plan().unwrap();

        assert_eq!(plan.artifacts[1].module, PathBuf::from("dist/utils.cjs"));
        assert_eq!(
            plan.artifacts[1].source_map,
            Some(PathBuf::from("dist/utils.cjs.map"))
        );
    }

    #[test]
    fn test_empty_entry_set_rejected() {
        let err = PackageBuild::new("dist").plan().unwrap_err();

        assert!(matches!(err, PlanError::NoEntries));
    }

    #[test]
    fn test_colliding_output_names_rejected() {
        let err = PackageBuild::new("dist")
            .with_entry("src/a/index.ts")
            .with_entry("src/b/index.ts")
            .plan()
            .unwrap_err();

        assert!(matches!(
            err,
            PlanError::OutputCollision { ref name, .. } if name == "index"
        ));
    }

    #[test]
    fn test_inline_policy_records_inlined_deps() {
        let plan = ui_package()
            .with_policy(BundlePolicy::InlineDependencies {
                no_external: vec!["clsx".to_string(), "tailwind-merge".to_string()],
            })
            .plan()
            .unwrap();

        assert_eq!(plan.inlined, ["clsx", "tailwind-merge"]);
        // Still one artifact per entry; the policy only affects inlining.
        assert_eq!(plan.artifacts.len(), 2);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let a = ui_package().plan().unwrap();
        let b = ui_package().plan().unwrap();

        assert_eq!(a.artifacts, b.artifacts);
    }

    #[test]
    fn test_clean_out_dir_clears_prior_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("stale.mjs"), "old").unwrap();

        let build = PackageBuild::new(&out).with_entry("src/lib/utils.ts");
        build.clean_out_dir().unwrap();

        assert!(out.exists());
        assert!(!out.join("stale.mjs").exists());
    }

    #[test]
    fn test_clean_disabled_keeps_prior_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("stale.mjs"), "old").unwrap();

        let mut build = PackageBuild::new(&out).with_entry("src/lib/utils.ts");
        build.clean = false;
        build.clean_out_dir().unwrap();

        assert!(out.join("stale.mjs").exists());
    }
}
