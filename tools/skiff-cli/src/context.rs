//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::config::CliConfig;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd)?.unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    /// Find a config file walking up the directory tree.
    ///
    /// The nearest config file wins; a malformed one is an error, not a
    /// reason to keep walking.
    fn find_config(start: &Path) -> Result<Option<CliConfig>> {
        let config_names = ["skiff.toml", ".skiff.toml", "skiff.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    return CliConfig::load(&config_path.to_string_lossy()).map(Some);
                }
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Get the directory deployment records are written to.
    pub fn deployments_dir(&self) -> Result<PathBuf> {
        let deployments = self.cwd.join(".skiff").join("deployments");
        std::fs::create_dir_all(&deployments)?;
        Ok(deployments)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("skiff.toml"),
            "[app]\nname = \"upstream\"\n",
        )
        .unwrap();
        let child = dir.path().join("apps").join("app");
        std::fs::create_dir_all(&child).unwrap();

        let config = Context::find_config(&child).unwrap().unwrap();

        assert_eq!(config.app.name, "upstream");
    }

    #[test]
    fn test_find_config_prefers_nearest_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("skiff.toml"), "[app]\nname = \"outer\"\n").unwrap();
        let child = dir.path().join("packages").join("ui");
        std::fs::create_dir_all(&child).unwrap();
        std::fs::write(child.join("skiff.toml"), "[app]\nname = \"inner\"\n").unwrap();

        let config = Context::find_config(&child).unwrap().unwrap();

        assert_eq!(config.app.name, "inner");
    }

    #[test]
    fn test_find_config_none_without_config_file() {
        let dir = tempfile::tempdir().unwrap();

        assert!(Context::find_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_find_config_surfaces_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("skiff.toml"), "[app\nname =").unwrap();

        assert!(Context::find_config(dir.path()).is_err());
    }
}
