//! Command implementations

pub mod completions;
pub mod dispatch;
pub mod toolchain;

use std::path::PathBuf;

use anyhow::{Context, Result};

use berth::core::registry::ToolchainRegistry;
use berth::ops::builtin::load_registry;
use berth::ops::resolve::{
    ExecutionMode, FallbackPolicy, StandaloneKind, StandaloneLocator, ToolResolver,
};
use berth::util::config::{load_config, Config};
use berth::util::process::ProcessRunner;
use berth::util::GlobalContext;

use crate::cli::Cli;

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub use_standalone: Option<String>,
    pub allow_bootstrap: bool,
    pub dispatch: Option<String>,
}

impl GlobalOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        GlobalOptions {
            config: cli.config.clone(),
            use_standalone: cli.use_standalone.clone(),
            allow_bootstrap: cli.allow_bootstrap,
            dispatch: cli.dispatch.clone(),
        }
    }
}

/// Context, configuration and registry for one invocation.
pub struct Session {
    pub ctx: GlobalContext,
    pub config: Config,
    pub registry: ToolchainRegistry,
    pub options: GlobalOptions,
}

impl Session {
    /// Load configuration and register every toolchain.
    pub fn load(options: GlobalOptions) -> Result<Self> {
        let mut ctx = GlobalContext::new().context("failed to create global context")?;

        let project_config = options
            .config
            .clone()
            .unwrap_or_else(|| ctx.project_config_path());
        if options.config.is_some() && !project_config.is_file() {
            anyhow::bail!("config file not found: {}", project_config.display());
        }

        let config = load_config(&ctx.config_path(), &project_config)?;
        if let Some(ref name) = config.bootstrap.standalone_env {
            ctx = ctx.with_bootstrap_env(name);
        }

        let registry = load_registry(&config, &ctx)?;

        Ok(Session {
            ctx,
            config,
            registry,
            options,
        })
    }

    /// Execution mode: `--use-standalone` wins over `standalone.mode`.
    pub fn mode(&self) -> Result<ExecutionMode> {
        let selected = self
            .options
            .use_standalone
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.config.standalone.mode.as_deref().filter(|m| !m.is_empty()));

        match selected {
            Some(mode) => {
                let kind = mode.parse::<StandaloneKind>().map_err(|e| anyhow::anyhow!(e))?;
                Ok(ExecutionMode::Standalone(kind))
            }
            None => Ok(ExecutionMode::Bootstrap),
        }
    }

    /// Fallback policy: `--allow-bootstrap` or `standalone.allow_bootstrap`.
    pub fn fallback(&self) -> FallbackPolicy {
        if self.options.allow_bootstrap || self.config.standalone.allow_bootstrap.unwrap_or(false) {
            FallbackPolicy::AllowBootstrap
        } else {
            FallbackPolicy::Fatal
        }
    }

    /// A resolver configured from flags and config.
    pub fn resolver<'a>(&'a self, runner: &'a dyn ProcessRunner) -> Result<ToolResolver<'a>> {
        Ok(ToolResolver::new(&self.ctx, runner)
            .with_mode(self.mode()?)
            .with_fallback(self.fallback())
            .with_standalones(StandaloneLocator::from_config(&self.config.standalone)))
    }
}
