//! Tool path resolution.
//!
//! Resolution runs in two tiers:
//!
//! 1. **Introspection.** When a standalone is explicitly selected, it is asked
//!    for the tool path with `--print-toolchain-api-tool <TOOL>`.
//! 2. **Bootstrap.** Otherwise, or when tier 1 is unavailable and the
//!    fallback policy allows it, the path is computed inside the bootstrap
//!    toolchain: `<root>/bin/<canonical alias>` for main roles and
//!    `<root>/bin/<tool>` for binary utilities.
//!
//! Each tier reports an explicit [`Resolution`]; nothing is cached.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;

use crate::core::descriptor::ToolchainDescriptor;
use crate::core::errors::ToolchainError;
use crate::core::platform::Platform;
use crate::core::role::ToolRequest;
use crate::util::config::StandaloneConfig;
use crate::util::context::GlobalContext;
use crate::util::process::{ExitCheck, ProcessBuilder, ProcessRunner};

/// Flag asking a standalone for a toolchain tool path.
pub const INTROSPECTION_FLAG: &str = "--print-toolchain-api-tool";

/// Default launcher binary inside a standalone's `bin/`.
pub const DEFAULT_STANDALONE_BINARY: &str = "lli";

/// Flavor of a pre-built standalone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandaloneKind {
    Jvm,
    Native,
}

impl StandaloneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandaloneKind::Jvm => "jvm",
            StandaloneKind::Native => "native",
        }
    }
}

impl fmt::Display for StandaloneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StandaloneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jvm" => Ok(StandaloneKind::Jvm),
            "native" => Ok(StandaloneKind::Native),
            _ => Err(format!(
                "unknown standalone type '{}'; expected 'jvm' or 'native'",
                s
            )),
        }
    }
}

/// How tools are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// No standalone selected: always use the bootstrap toolchain.
    #[default]
    Bootstrap,
    /// Ask the selected standalone first.
    Standalone(StandaloneKind),
}

/// Whether an unavailable standalone may fall back to the bootstrap toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// An unavailable standalone is a fatal error.
    #[default]
    Fatal,
    /// Fall back to the bootstrap toolchain.
    AllowBootstrap,
}

/// Why a tier produced no path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    /// No home is configured for the selected standalone.
    NotConfigured { kind: StandaloneKind },
    /// The standalone's launcher does not exist yet.
    NotBuilt { kind: StandaloneKind, path: PathBuf },
    /// The standalone answered with nothing but whitespace.
    EmptyOutput {
        kind: StandaloneKind,
        standalone: PathBuf,
    },
    /// The query exited non-zero and exit checking was disabled.
    ProbeFailed {
        kind: StandaloneKind,
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl NotFoundReason {
    /// Turn the reason into the fatal error reported for `request`.
    pub fn into_error(self, request: ToolRequest) -> ToolchainError {
        let tool = request.query_name();
        match self {
            NotFoundReason::NotConfigured { kind } => ToolchainError::StandaloneNotConfigured {
                mode: kind.to_string(),
                tool,
            },
            NotFoundReason::NotBuilt { kind, path } => ToolchainError::StandaloneNotBuilt {
                mode: kind.to_string(),
                tool,
                path,
            },
            NotFoundReason::EmptyOutput { kind, standalone } => {
                ToolchainError::EmptyIntrospection {
                    mode: kind.to_string(),
                    tool,
                    standalone,
                }
            }
            NotFoundReason::ProbeFailed {
                command,
                code,
                stderr,
                ..
            } => ToolchainError::ProcessFailed {
                command,
                code,
                stderr,
            },
        }
    }
}

/// Outcome of one resolution tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(PathBuf),
    NotFound(NotFoundReason),
}

/// Finds the launcher binary of a standalone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandaloneLocator {
    binary: String,
    jvm: Option<PathBuf>,
    native: Option<PathBuf>,
}

impl StandaloneLocator {
    /// A locator with no standalones configured.
    pub fn new() -> Self {
        StandaloneLocator {
            binary: DEFAULT_STANDALONE_BINARY.to_string(),
            jvm: None,
            native: None,
        }
    }

    /// Build a locator from the `[standalone]` config section.
    pub fn from_config(config: &StandaloneConfig) -> Self {
        StandaloneLocator {
            binary: config
                .binary
                .clone()
                .unwrap_or_else(|| DEFAULT_STANDALONE_BINARY.to_string()),
            jvm: config.jvm.clone(),
            native: config.native.clone(),
        }
    }

    /// Set the home of a standalone.
    pub fn with_home(mut self, kind: StandaloneKind, home: impl Into<PathBuf>) -> Self {
        match kind {
            StandaloneKind::Jvm => self.jvm = Some(home.into()),
            StandaloneKind::Native => self.native = Some(home.into()),
        }
        self
    }

    /// Home directory of a standalone, if configured.
    pub fn home(&self, kind: StandaloneKind) -> Option<&Path> {
        match kind {
            StandaloneKind::Jvm => self.jvm.as_deref(),
            StandaloneKind::Native => self.native.as_deref(),
        }
    }

    /// Path of the standalone launcher, or why it is unavailable.
    pub fn locate(&self, kind: StandaloneKind, platform: Platform) -> Resolution {
        let Some(home) = self.home(kind) else {
            return Resolution::NotFound(NotFoundReason::NotConfigured { kind });
        };

        let path = home.join("bin").join(platform.exe(&self.binary));
        if path.is_file() {
            Resolution::Resolved(path)
        } else {
            Resolution::NotFound(NotFoundReason::NotBuilt { kind, path })
        }
    }
}

impl Default for StandaloneLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves tool requests to paths.
pub struct ToolResolver<'a> {
    ctx: &'a GlobalContext,
    runner: &'a dyn ProcessRunner,
    mode: ExecutionMode,
    fallback: FallbackPolicy,
    standalones: StandaloneLocator,
    exit_check: ExitCheck,
}

impl<'a> ToolResolver<'a> {
    /// Create a resolver in bootstrap mode.
    pub fn new(ctx: &'a GlobalContext, runner: &'a dyn ProcessRunner) -> Self {
        ToolResolver {
            ctx,
            runner,
            mode: ExecutionMode::default(),
            fallback: FallbackPolicy::default(),
            standalones: StandaloneLocator::new(),
            exit_check: ExitCheck::default(),
        }
    }

    /// Select the execution mode.
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Select the fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Use these standalone locations.
    pub fn with_standalones(mut self, standalones: StandaloneLocator) -> Self {
        self.standalones = standalones;
        self
    }

    /// Choose how a failing introspection query is treated.
    pub fn with_exit_check(mut self, exit_check: ExitCheck) -> Self {
        self.exit_check = exit_check;
        self
    }

    /// The selected execution mode.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Resolve a tool of `desc` to a path.
    pub fn resolve(
        &self,
        desc: &ToolchainDescriptor,
        request: impl Into<ToolRequest>,
    ) -> Result<PathBuf> {
        let request = request.into();
        if let ToolRequest::Role(role) = request {
            if !desc.supports(role) {
                return Err(desc.unsupported(role).into());
            }
        }

        let kind = match self.mode {
            ExecutionMode::Bootstrap => return self.bootstrap_path(desc, request),
            ExecutionMode::Standalone(kind) => kind,
        };

        match self.introspect(desc, request, kind)? {
            Resolution::Resolved(path) => Ok(path),
            Resolution::NotFound(reason) => match self.fallback {
                FallbackPolicy::AllowBootstrap => {
                    tracing::debug!(
                        "{} standalone unavailable for {} ({:?}), using bootstrap toolchain",
                        kind,
                        request,
                        reason
                    );
                    self.bootstrap_path(desc, request)
                }
                FallbackPolicy::Fatal => Err(reason.into_error(request).into()),
            },
        }
    }

    /// Tier 1: ask the selected standalone.
    pub fn introspect(
        &self,
        desc: &ToolchainDescriptor,
        request: ToolRequest,
        kind: StandaloneKind,
    ) -> Result<Resolution> {
        let standalone = match self.standalones.locate(kind, self.ctx.platform()) {
            Resolution::Resolved(path) => path,
            not_found => return Ok(not_found),
        };

        let cmd = ProcessBuilder::new(&standalone)
            .args(desc.select_flags())
            .arg(INTROSPECTION_FLAG)
            .arg(request.query_name());

        let output = self.runner.capture_checked(&cmd, self.exit_check)?;
        if !output.success() {
            return Ok(Resolution::NotFound(NotFoundReason::ProbeFailed {
                kind,
                command: cmd.display_command(),
                code: output.code,
                stderr: output.stderr,
            }));
        }

        let path = output.stdout.trim();
        if path.is_empty() {
            return Ok(Resolution::NotFound(NotFoundReason::EmptyOutput { kind, standalone }));
        }

        tracing::debug!("{} standalone resolved {} to {}", kind, request, path);
        Ok(Resolution::Resolved(PathBuf::from(path)))
    }

    /// Tier 2: compute the path inside the bootstrap toolchain.
    pub fn bootstrap_path(&self, desc: &ToolchainDescriptor, request: ToolRequest) -> Result<PathBuf> {
        let platform = self.ctx.platform();
        let bin = desc.bootstrap_root(self.ctx)?.join("bin");

        match request {
            ToolRequest::Role(role) => {
                let primary = desc.primary_alias(role)?;
                // Only main-role binaries get the script-launcher fallback.
                Ok(platform.bootstrap_executable(bin.join(primary)))
            }
            ToolRequest::Binutil(tool) => Ok(bin.join(platform.cmd(tool.as_str()))),
        }
    }
}
