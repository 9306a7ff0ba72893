//! Global context for berth operations.
//!
//! Provides centralized access to paths, the host platform, the process
//! environment and the coverage slot shared with spawned tools. The context
//! is created once at startup and passed by reference to every registration
//! and lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::core::platform::Platform;

/// Default environment variable pointing at a bootstrap standalone.
pub const DEFAULT_BOOTSTRAP_ENV: &str = "SULONG_BOOTSTRAP_STANDALONE";

/// Coverage configuration handed to spawned tools.
///
/// Written at most once per dispatch, right before the spawn.
#[derive(Debug, Clone, Default)]
pub struct CoverageState {
    value: Arc<Mutex<Option<String>>>,
}

impl CoverageState {
    /// Store a coverage setting.
    pub fn set(&self, value: impl Into<String>) {
        if let Ok(mut slot) = self.value.lock() {
            *slot = Some(value.into());
        }
    }

    /// Current coverage setting.
    pub fn get(&self) -> Option<String> {
        self.value.lock().ok().and_then(|slot| slot.clone())
    }
}

/// Global context containing paths, platform and environment access.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global berth data (~/.berth/)
    home: PathBuf,

    /// Platform executable naming conventions
    platform: Platform,

    /// Environment variable naming the bootstrap standalone
    bootstrap_env: String,

    /// In-process environment overrides; `None` masks a variable
    env_overrides: HashMap<String, Option<String>>,

    /// Coverage slot shared with spawned tools
    coverage: CoverageState,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = BaseDirs::new()
            .map(|b| b.home_dir().join(".berth"))
            .unwrap_or_else(|| PathBuf::from(".berth"));

        Ok(GlobalContext {
            cwd,
            home,
            platform: Platform::host(),
            bootstrap_env: DEFAULT_BOOTSTRAP_ENV.to_string(),
            env_overrides: HashMap::new(),
            coverage: CoverageState::default(),
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a different home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Use a different platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Override an environment variable for this context only.
    ///
    /// `None` makes the variable appear unset.
    pub fn with_env(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.env_overrides.insert(key.into(), value.map(Into::into));
        self
    }

    /// Use a different bootstrap standalone variable.
    pub fn with_bootstrap_env(mut self, name: impl Into<String>) -> Self {
        self.bootstrap_env = name.into();
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the berth home directory (~/.berth/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Name of the bootstrap standalone variable.
    pub fn bootstrap_env(&self) -> &str {
        &self.bootstrap_env
    }

    /// Read an environment variable, honoring overrides. Never cached.
    pub fn env_var(&self, key: &str) -> Option<String> {
        match self.env_overrides.get(key) {
            Some(value) => value.clone(),
            None => std::env::var(key).ok(),
        }
    }

    /// The coverage slot.
    pub fn coverage(&self) -> &CoverageState {
        &self.coverage
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("toolchains.toml")
    }

    /// Get the project-local berth directory.
    pub fn project_berth_dir(&self) -> PathBuf {
        self.cwd.join(".berth")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.project_berth_dir().join("toolchains.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .unwrap()
            .with_home(tmp.path().join("home"));

        assert_eq!(ctx.config_path(), tmp.path().join("home").join("toolchains.toml"));
        assert_eq!(
            ctx.project_config_path(),
            tmp.path().join(".berth").join("toolchains.toml")
        );
    }

    #[test]
    fn test_env_overrides() {
        let ctx = GlobalContext::new()
            .unwrap()
            .with_env("BERTH_TEST_SET", Some("value"))
            .with_env("PATH", None::<String>);

        assert_eq!(ctx.env_var("BERTH_TEST_SET").as_deref(), Some("value"));
        assert_eq!(ctx.env_var("PATH"), None);
    }

    #[test]
    fn test_coverage_is_shared_between_clones() {
        let ctx = GlobalContext::new().unwrap();
        let clone = ctx.clone();
        assert_eq!(ctx.coverage().get(), None);

        clone.coverage().set("destfile=jacoco.exec");
        assert_eq!(ctx.coverage().get().as_deref(), Some("destfile=jacoco.exec"));
    }
}
