//! Configuration file support for berth.
//!
//! Toolchain definitions and the runtime environment are read from two
//! locations:
//! - Global: `~/.berth/toolchains.toml` - User-wide defaults
//! - Project: `.berth/toolchains.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::alias::AliasTemplates;
use crate::core::descriptor::ToolchainSpec;
use crate::core::distribution::DistributionRef;
use crate::core::role::ToolRole;

/// Suite used for toolchains that do not name one.
pub const DEFAULT_SUITE: &str = "berth";

/// berth configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Register the built-in `native` toolchain (default: true)
    pub builtin: Option<bool>,

    /// Runtime used to run launcher entry points
    pub runtime: RuntimeConfig,

    /// Pre-built standalones answering introspection queries
    pub standalone: StandaloneConfig,

    /// Bootstrap toolchain settings
    pub bootstrap: BootstrapConfig,

    /// Distribution layouts, keyed by unqualified name
    pub distributions: BTreeMap<String, DistributionConfig>,

    /// Toolchain definitions
    #[serde(rename = "toolchain")]
    pub toolchains: Vec<ToolchainConfig>,
}

/// Runtime settings for command dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Path to the `java` launcher
    pub java: Option<PathBuf>,

    /// Environment variable holding the coverage configuration
    pub coverage_env: Option<String>,

    /// What dispatched aliases run (`runtime` or `resolved`)
    pub dispatch: Option<String>,
}

/// Standalone settings for tier-1 resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StandaloneConfig {
    /// Launcher binary inside `<home>/bin/` (default: `lli`)
    pub binary: Option<String>,

    /// Home of the JVM standalone
    pub jvm: Option<PathBuf>,

    /// Home of the native standalone
    pub native: Option<PathBuf>,

    /// Default execution mode (`jvm` or `native`)
    pub mode: Option<String>,

    /// Fall back to the bootstrap toolchain when the standalone is unavailable
    pub allow_bootstrap: Option<bool>,
}

/// Bootstrap toolchain settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Environment variable naming a bootstrap standalone
    pub standalone_env: Option<String>,
}

/// Layout of one distribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    /// Classpath entries contributed by the distribution
    pub classpath: Vec<PathBuf>,

    /// Build output directory
    pub output: Option<PathBuf>,
}

impl DistributionConfig {
    /// Merge another layout into this one (other takes precedence per field).
    pub fn merge(&mut self, other: DistributionConfig) {
        if !other.classpath.is_empty() {
            self.classpath = other.classpath;
        }
        if other.output.is_some() {
            self.output = other.output;
        }
    }
}

/// A toolchain definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Unique toolchain name
    pub name: String,

    /// Owning suite
    #[serde(default)]
    pub suite: Option<String>,

    /// Distributions holding the launchers
    #[serde(default)]
    pub distributions: Vec<String>,

    /// Distribution holding the bootstrap toolchain
    #[serde(default)]
    pub bootstrap: Option<String>,

    /// Flags passed to a standalone before introspection queries
    #[serde(default)]
    pub select_flags: Vec<String>,

    /// Main entry per role
    #[serde(default)]
    pub tools: IndexMap<ToolRole, String>,

    /// Alias template override, replacing the defaults entirely
    #[serde(default)]
    pub aliases: Option<IndexMap<ToolRole, Vec<String>>>,
}

impl ToolchainConfig {
    /// Convert into a registration spec, resolving distribution outputs.
    pub fn to_spec(&self, config: &Config) -> ToolchainSpec {
        let suite = self.suite.as_deref().unwrap_or(DEFAULT_SUITE);
        let mut spec = ToolchainSpec::new(&self.name, suite).select_flags(self.select_flags.clone());

        for dist in &self.distributions {
            spec = spec.distribution(dist);
        }

        if let Some(ref bootstrap) = self.bootstrap {
            spec = spec.bootstrap(bootstrap);
        }
        if let Some(output) = config.distribution_output(&spec.bootstrap) {
            spec = spec.bootstrap_output(output);
        }

        for (role, main) in &self.tools {
            spec = spec.tool(*role, main.clone());
        }

        if let Some(ref aliases) = self.aliases {
            let mut templates = AliasTemplates::new();
            for (role, names) in aliases {
                templates.insert(*role, names.clone());
            }
            spec = spec.alias_templates(templates);
        }

        spec
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.builtin.is_some() {
            self.builtin = other.builtin;
        }

        if other.runtime.java.is_some() {
            self.runtime.java = other.runtime.java;
        }
        if other.runtime.coverage_env.is_some() {
            self.runtime.coverage_env = other.runtime.coverage_env;
        }
        if other.runtime.dispatch.is_some() {
            self.runtime.dispatch = other.runtime.dispatch;
        }

        if other.standalone.binary.is_some() {
            self.standalone.binary = other.standalone.binary;
        }
        if other.standalone.jvm.is_some() {
            self.standalone.jvm = other.standalone.jvm;
        }
        if other.standalone.native.is_some() {
            self.standalone.native = other.standalone.native;
        }
        if other.standalone.mode.is_some() {
            self.standalone.mode = other.standalone.mode;
        }
        if other.standalone.allow_bootstrap.is_some() {
            self.standalone.allow_bootstrap = other.standalone.allow_bootstrap;
        }

        if other.bootstrap.standalone_env.is_some() {
            self.bootstrap.standalone_env = other.bootstrap.standalone_env;
        }

        for (name, dist) in other.distributions {
            self.distributions.entry(name).or_default().merge(dist);
        }

        // A toolchain redefined by the overriding config replaces the old one.
        for toolchain in other.toolchains {
            let before = self.toolchains.len();
            self.toolchains.retain(|t| t.name != toolchain.name);
            if self.toolchains.len() != before {
                tracing::warn!(
                    "toolchain `{}` is redefined; the later definition replaces the earlier one",
                    toolchain.name
                );
            }
            self.toolchains.push(toolchain);
        }
    }

    /// Whether the built-in toolchain should be registered.
    pub fn builtin_enabled(&self) -> bool {
        self.builtin.unwrap_or(true)
    }

    /// Look up a distribution's layout by reference.
    pub fn distribution(&self, dist: &DistributionRef) -> Option<&DistributionConfig> {
        self.distributions.get(dist.name())
    }

    /// Output directory of a distribution, if configured.
    pub fn distribution_output(&self, dist: &DistributionRef) -> Option<PathBuf> {
        self.distribution(dist).and_then(|d| d.output.clone())
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.berth/toolchains.toml)
/// 2. Global config (~/.berth/toolchains.toml)
/// 3. Defaults
///
/// Missing files are skipped; unreadable or malformed files are errors.
pub fn load_config(global_path: &Path, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    if global_path.is_file() {
        config.merge(Config::load(global_path)?);
    }

    if project_path.is_file() {
        config.merge(Config::load(project_path)?);
    }

    Ok(config)
}
