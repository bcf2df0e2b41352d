//! CLI configuration.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skiff_build::{BundlePolicy, ModuleFormat, PackageBuild};
use skiff_core::{EnvValue, WorkerSpec};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Application-level settings.
    #[serde(default)]
    pub app: AppConfig,

    /// External application build step.
    #[serde(default)]
    pub build: BuildConfig,

    /// Shared UI package build.
    #[serde(default)]
    pub package: PackageConfig,

    /// Worker definitions.
    #[serde(default)]
    pub workers: WorkersConfig,

    /// Local development settings.
    #[serde(default)]
    pub dev: DevConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Worker specs in deploy order: Api first, then App.
    pub fn worker_specs(&self) -> Vec<WorkerSpec> {
        vec![
            self.workers.api.to_spec("Api"),
            self.workers.app.to_spec("App"),
        ]
    }

    /// Build descriptor for the shared UI package.
    pub fn package_build(&self) -> PackageBuild {
        let mut build = PackageBuild::new(&self.package.out_dir)
            .with_entries(self.package.entries.iter().cloned())
            .with_policy(self.package.policy());
        build.format = self.package.format;
        build.target = self.package.target.clone();
        build.dts = self.package.dts;
        build.sourcemap = self.package.sourcemap;
        build.clean = self.package.clean;
        build
    }

    /// Collect configuration problems. Empty means valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.app.name.is_empty() {
            problems.push("app.name is empty".to_string());
        }
        if self.build.command.is_empty() {
            problems.push("build.command is empty".to_string());
        }

        for (section, worker) in [("workers.api", &self.workers.api), ("workers.app", &self.workers.app)] {
            if worker.handler.is_empty() {
                problems.push(format!("{}.handler is empty", section));
            }
            for (key, value) in &worker.environment {
                if let EnvVar::FromWorkerUrl { from_worker_url } = value {
                    if from_worker_url != "Api" && from_worker_url != "App" {
                        problems.push(format!(
                            "{}.environment.{} references unknown worker '{}'",
                            section, key, from_worker_url
                        ));
                    }
                }
            }
        }

        problems
    }
}

/// Application-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name; prefixes platform resource names.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Platform CLI used to provision workers.
    #[serde(default = "default_platform_command")]
    pub platform_command: String,
}

fn default_app_name() -> String {
    "hfjp".to_string()
}

fn default_platform_command() -> String {
    "wrangler".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            platform_command: default_platform_command(),
        }
    }
}

/// External application build step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Command to run.
    #[serde(default = "default_build_command")]
    pub command: String,

    /// Arguments passed to the command.
    #[serde(default = "default_build_args")]
    pub args: Vec<String>,
}

fn default_build_command() -> String {
    "pnpm".to_string()
}

fn default_build_args() -> Vec<String> {
    ["-C", "apps/app", "build"].map(String::from).to_vec()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: default_build_command(),
            args: default_build_args(),
        }
    }
}

/// Shared UI package build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Public entry points, in order.
    #[serde(default = "default_entries")]
    pub entries: Vec<String>,

    /// Output module format.
    #[serde(default)]
    pub format: ModuleFormat,

    /// Language target.
    #[serde(default = "default_target")]
    pub target: String,

    /// Output directory.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Emit type declarations.
    #[serde(default = "default_true")]
    pub dts: bool,

    /// Emit source maps.
    #[serde(default = "default_true")]
    pub sourcemap: bool,

    /// Clear prior output before each build.
    #[serde(default = "default_true")]
    pub clean: bool,

    /// Dependency policy: `unbundle` or `inline`.
    #[serde(default = "default_bundle")]
    pub bundle: String,

    /// Tree-shake outputs (unbundle policy).
    #[serde(default = "default_true")]
    pub treeshake: bool,

    /// Dependencies to inline (inline policy).
    #[serde(default)]
    pub no_external: Vec<String>,
}

fn default_entries() -> Vec<String> {
    vec![
        "src/components/ui/button.tsx".to_string(),
        "src/lib/utils.ts".to_string(),
    ]
}

fn default_target() -> String {
    "esnext".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_bundle() -> String {
    "unbundle".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            entries: default_entries(),
            format: ModuleFormat::Esm,
            target: default_target(),
            out_dir: default_out_dir(),
            dts: true,
            sourcemap: true,
            clean: true,
            bundle: default_bundle(),
            treeshake: true,
            no_external: Vec::new(),
        }
    }
}

impl PackageConfig {
    /// The bundle policy this config selects.
    pub fn policy(&self) -> BundlePolicy {
        if self.bundle == "inline" {
            BundlePolicy::InlineDependencies {
                no_external: self.no_external.clone(),
            }
        } else {
            BundlePolicy::Unbundle {
                treeshake: self.treeshake,
            }
        }
    }
}

/// Worker definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkersConfig {
    /// The Api worker.
    #[serde(default = "default_api_worker")]
    pub api: WorkerConfig,

    /// The App worker.
    #[serde(default = "default_app_worker")]
    pub app: WorkerConfig,
}

fn default_api_worker() -> WorkerConfig {
    WorkerConfig {
        handler: "workloads/api".to_string(),
        url: true,
        environment: BTreeMap::new(),
    }
}

fn default_app_worker() -> WorkerConfig {
    let mut environment = BTreeMap::new();
    environment.insert(
        "API_URL".to_string(),
        EnvVar::FromWorkerUrl {
            from_worker_url: "Api".to_string(),
        },
    );
    WorkerConfig {
        handler: "apps/app/dist/server/index.js".to_string(),
        url: true,
        environment,
    }
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            api: default_api_worker(),
            app: default_app_worker(),
        }
    }
}

/// A single worker definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Handler entry-point path.
    pub handler: String,

    /// Request a public URL.
    #[serde(default = "default_true")]
    pub url: bool,

    /// Environment variables.
    #[serde(default)]
    pub environment: BTreeMap<String, EnvVar>,
}

impl WorkerConfig {
    /// Convert to a core worker spec under `name`.
    fn to_spec(&self, name: &str) -> WorkerSpec {
        let mut spec = WorkerSpec::new(name, &self.handler);
        if self.url {
            spec = spec.with_url();
        }
        for (key, value) in &self.environment {
            let env_value = match value {
                EnvVar::Literal(s) => EnvValue::literal(s),
                EnvVar::FromWorkerUrl { from_worker_url } => {
                    EnvValue::worker_url(from_worker_url)
                }
            };
            spec = spec.with_env(key, env_value);
        }
        spec
    }
}

/// An environment variable value in the config file.
///
/// Either a plain string, or `{ from_worker_url = "Api" }` to wire in a
/// worker's deploy-time URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvVar {
    Literal(String),
    FromWorkerUrl { from_worker_url: String },
}

/// Local development settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevConfig {
    /// Port the app dev server listens on.
    #[serde(default = "default_dev_port")]
    pub port: u16,
}

fn default_dev_port() -> u16 {
    3001
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            port: default_dev_port(),
        }
    }
}

/// Generate a default skiff.toml config file.
pub fn generate_default_config(name: &str) -> String {
    format!(
        r#"# Skiff deployment configuration

[app]
name = "{name}"
platform_command = "wrangler"

[build]
command = "pnpm"
args = ["-C", "apps/app", "build"]

[package]
entries = ["src/components/ui/button.tsx", "src/lib/utils.ts"]
format = "esm"
out_dir = "dist"
dts = true
sourcemap = true
clean = true
# "unbundle" (one module per entry) or "inline" (inline no_external deps)
bundle = "unbundle"
treeshake = true
# no_external = ["clsx", "tailwind-merge"]

[workers.api]
handler = "workloads/api"
url = true

[workers.app]
handler = "apps/app/dist/server/index.js"
url = true

[workers.app.environment]
API_URL = {{ from_worker_url = "Api" }}

[dev]
port = 3001
"#,
        name = name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = CliConfig::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: CliConfig = toml::from_str(&toml).unwrap();

        assert_eq!(parsed.app.name, "hfjp");
        assert_eq!(parsed.workers.app.environment, config.workers.app.environment);
    }

    #[test]
    fn test_generated_config_parses() {
        let parsed: CliConfig = toml::from_str(&generate_default_config("hfjp")).unwrap();

        assert_eq!(parsed.app.name, "hfjp");
        assert_eq!(parsed.dev.port, 3001);
        assert_eq!(parsed.package.entries.len(), 2);
        assert!(parsed.problems().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skiff.toml");

        let config = CliConfig::default();
        config.save(path.to_str().unwrap()).unwrap();
        let loaded = CliConfig::load(path.to_str().unwrap()).unwrap();

        assert_eq!(loaded.app.name, config.app.name);
        assert_eq!(loaded.workers.app.environment, config.workers.app.environment);
        assert_eq!(loaded.package.entries, config.package.entries);
    }

    #[test]
    fn test_env_var_forms_parse() {
        let config: CliConfig = toml::from_str(
            r#"
            [workers.app]
            handler = "dist/server/index.js"

            [workers.app.environment]
            API_URL = { from_worker_url = "Api" }
            LOG_LEVEL = "info"
            "#,
        )
        .unwrap();

        let env = &config.workers.app.environment;
        assert_eq!(
            env.get("API_URL"),
            Some(&EnvVar::FromWorkerUrl {
                from_worker_url: "Api".to_string()
            })
        );
        assert_eq!(env.get("LOG_LEVEL"), Some(&EnvVar::Literal("info".to_string())));
    }

    #[test]
    fn test_worker_specs_wire_api_url_into_app() {
        let specs = CliConfig::default().worker_specs();

        assert_eq!(specs[0].name, "Api");
        assert!(specs[0].url);
        assert_eq!(specs[1].name, "App");
        assert_eq!(specs[1].depends_on(), vec!["Api"]);
    }

    #[test]
    fn test_package_build_uses_selected_policy() {
        let mut config = CliConfig::default();
        config.package.bundle = "inline".to_string();
        config.package.no_external = vec!["clsx".to_string()];

        let build = config.package_build();

        assert_eq!(
            build.policy,
            BundlePolicy::InlineDependencies {
                no_external: vec!["clsx".to_string()]
            }
        );
    }

    #[test]
    fn test_problems_flag_unknown_worker_reference() {
        let mut config = CliConfig::default();
        config.workers.app.environment.insert(
            "OTHER_URL".to_string(),
            EnvVar::FromWorkerUrl {
                from_worker_url: "Gateway".to_string(),
            },
        );

        let problems = config.problems();

        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("Gateway"));
    }
}
