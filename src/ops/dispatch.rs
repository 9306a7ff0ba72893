//! Command dispatch: `<name>-toolchain <alias> [args...]`.
//!
//! The invoked alias is routed to its role through the descriptor's path map.
//! By default the role's main entry runs on the JVM with the toolchain's
//! distributions on the classpath. Alternatively the resolved tool binary is
//! executed directly. Either way remaining arguments are forwarded unmodified
//! and the child's exit status is propagated.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Result};

use crate::core::descriptor::ToolchainDescriptor;
use crate::core::errors::ToolchainError;
use crate::core::role::ToolRole;
use crate::ops::resolve::ToolResolver;
use crate::util::config::Config;
use crate::util::context::GlobalContext;
use crate::util::process::{find_executable, ProcessBuilder, ProcessRunner};

/// System property carrying the invoked alias to the launcher.
pub const EXECUTABLE_NAME_PROPERTY: &str = "org.graalvm.launcher.executablename";

/// Default environment variable holding the coverage configuration.
pub const DEFAULT_COVERAGE_ENV: &str = "JACOCO";

/// JVM invocation for launcher main entries.
#[derive(Debug, Clone, Default)]
pub struct RuntimeInvocation {
    java: Option<PathBuf>,
    classpath: BTreeMap<String, Vec<PathBuf>>,
}

impl RuntimeInvocation {
    /// An invocation with nothing configured.
    pub fn new() -> Self {
        RuntimeInvocation::default()
    }

    /// Build from the `[runtime]` and `[distributions]` config sections.
    pub fn from_config(config: &Config) -> Self {
        RuntimeInvocation {
            java: config.runtime.java.clone(),
            classpath: config
                .distributions
                .iter()
                .map(|(name, dist)| (name.clone(), dist.classpath.clone()))
                .collect(),
        }
    }

    /// Use a specific `java` launcher.
    pub fn with_java(mut self, java: impl Into<PathBuf>) -> Self {
        self.java = Some(java.into());
        self
    }

    /// Set the classpath entries of a distribution.
    pub fn with_classpath<I, P>(mut self, distribution: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.classpath.insert(
            distribution.to_string(),
            entries.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Locate `java`: configured path, then `$JAVA_HOME/bin`, then `PATH`.
    pub fn java(&self, ctx: &GlobalContext) -> Result<PathBuf> {
        if let Some(ref java) = self.java {
            return Ok(java.clone());
        }

        if let Some(home) = ctx.env_var("JAVA_HOME").filter(|h| !h.is_empty()) {
            return Ok(PathBuf::from(home)
                .join("bin")
                .join(ctx.platform().exe("java")));
        }

        find_executable("java").ok_or_else(|| {
            anyhow::anyhow!(
                "could not find `java`\n\
                 help: set `runtime.java` in the config or the JAVA_HOME environment variable"
            )
        })
    }

    /// Classpath of the descriptor's distributions, joined for the platform.
    pub fn classpath(&self, desc: &ToolchainDescriptor, ctx: &GlobalContext) -> Result<String> {
        let mut entries = Vec::new();
        for dist in desc.distributions() {
            match self.classpath.get(dist.name()) {
                Some(paths) if !paths.is_empty() => entries.extend(paths.iter().cloned()),
                _ => bail!(
                    "distribution {} of the {} toolchain has no classpath configured\n\
                     help: set `distributions.{}.classpath` in the config",
                    dist,
                    desc.name(),
                    dist.name()
                ),
            }
        }
        Ok(ctx.platform().join_path_list(&entries))
    }

    /// The full JVM command running `role`'s main entry.
    pub fn command(
        &self,
        desc: &ToolchainDescriptor,
        role: ToolRole,
        alias: &str,
        args: &[String],
        ctx: &GlobalContext,
    ) -> Result<ProcessBuilder> {
        let main = desc.main_entry(role)?;
        Ok(ProcessBuilder::new(self.java(ctx)?)
            .arg("-cp")
            .arg(self.classpath(desc, ctx)?)
            .arg(format!("-D{}={}", EXECUTABLE_NAME_PROPERTY, alias))
            .arg(main)
            .args(args))
    }
}

/// What a dispatched alias runs.
pub enum DispatchTarget<'a> {
    /// The role's main entry on the JVM.
    Runtime(RuntimeInvocation),
    /// The tool binary found by the resolver.
    Resolved(ToolResolver<'a>),
}

/// Names a dispatch target on the command line or in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchKind {
    #[default]
    Runtime,
    Resolved,
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchKind::Runtime => f.write_str("runtime"),
            DispatchKind::Resolved => f.write_str("resolved"),
        }
    }
}

impl FromStr for DispatchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "runtime" => Ok(DispatchKind::Runtime),
            "resolved" => Ok(DispatchKind::Resolved),
            _ => Err(format!(
                "unknown dispatch target '{}'; expected 'runtime' or 'resolved'",
                s
            )),
        }
    }
}

/// Routes aliases of a toolchain to spawned processes.
pub struct CommandDispatcher<'a> {
    ctx: &'a GlobalContext,
    runner: &'a dyn ProcessRunner,
    target: DispatchTarget<'a>,
    coverage_env: String,
}

impl<'a> CommandDispatcher<'a> {
    pub fn new(
        ctx: &'a GlobalContext,
        runner: &'a dyn ProcessRunner,
        target: DispatchTarget<'a>,
    ) -> Self {
        CommandDispatcher {
            ctx,
            runner,
            target,
            coverage_env: DEFAULT_COVERAGE_ENV.to_string(),
        }
    }

    /// Read the coverage configuration from a different variable.
    pub fn with_coverage_env(mut self, name: impl Into<String>) -> Self {
        self.coverage_env = name.into();
        self
    }

    /// Role an alias dispatches to.
    pub fn route(&self, desc: &ToolchainDescriptor, alias: &str) -> Result<ToolRole, ToolchainError> {
        desc.role_for_alias(alias)
            .ok_or_else(|| ToolchainError::UnknownAlias {
                toolchain: desc.name().to_string(),
                alias: alias.to_string(),
                valid: desc.supported_aliases(),
            })
    }

    /// Build the process for `argv` (`<alias> [args...]`) without running it.
    pub fn command(&self, desc: &ToolchainDescriptor, argv: &[String]) -> Result<ProcessBuilder> {
        let Some((alias, args)) = argv.split_first() else {
            return Err(ToolchainError::UnknownAlias {
                toolchain: desc.name().to_string(),
                alias: String::new(),
                valid: desc.supported_aliases(),
            }
            .into());
        };

        let role = self.route(desc, alias)?;
        tracing::debug!("{} {} -> {}", desc.command_name(), alias, role);

        match &self.target {
            DispatchTarget::Runtime(runtime) => runtime.command(desc, role, alias, args, self.ctx),
            DispatchTarget::Resolved(resolver) => {
                let path = resolver.resolve(desc, role)?;
                Ok(ProcessBuilder::new(path).args(args))
            }
        }
    }

    /// Run `argv` and return the child's exit code.
    ///
    /// A child killed by a signal reports exit code 1.
    pub fn dispatch(&self, desc: &ToolchainDescriptor, argv: &[String]) -> Result<i32> {
        let mut cmd = self.command(desc, argv)?;

        if let Some(coverage) = self.ctx.env_var(&self.coverage_env) {
            self.ctx.coverage().set(coverage);
        }
        if let Some(coverage) = self.ctx.coverage().get() {
            cmd = cmd.env(&self.coverage_env, coverage);
        }

        let code = self.runner.run(&cmd)?;
        Ok(code.unwrap_or(1))
    }
}
