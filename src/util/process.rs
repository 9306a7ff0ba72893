//! Subprocess execution utilities.
//!
//! Commands are described with [`ProcessBuilder`] and executed through a
//! [`ProcessRunner`], so resolution and dispatch can be tested against a
//! recording runner instead of real processes. Every spawn blocks until the
//! child exits; there is no timeout.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::core::errors::ToolchainError;

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get an environment variable set on this builder.
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(|s| s.as_str())
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        cmd
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Result of a captured process run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code, `None` if killed by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// What to do when a spawned process exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitCheck {
    /// Treat a non-zero exit as a fatal error.
    #[default]
    Fatal,
    /// Hand the non-zero result back to the caller.
    Ignore,
}

/// Executes processes described by a [`ProcessBuilder`].
pub trait ProcessRunner {
    /// Run with stdout/stderr captured.
    fn capture(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput>;

    /// Run with stdio inherited; returns the exit code.
    fn run(&self, cmd: &ProcessBuilder) -> Result<Option<i32>>;

    /// Run captured, failing on a non-zero exit when `check` is [`ExitCheck::Fatal`].
    fn capture_checked(&self, cmd: &ProcessBuilder, check: ExitCheck) -> Result<ProcessOutput> {
        let output = self.capture(cmd)?;
        if check == ExitCheck::Fatal && !output.success() {
            return Err(ToolchainError::ProcessFailed {
                command: cmd.display_command(),
                code: output.code,
                stderr: output.stderr,
            }
            .into());
        }
        Ok(output)
    }
}

/// Runs real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn capture(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        tracing::debug!("running `{}`", cmd.display_command());

        let output = cmd
            .build_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to spawn `{}`", cmd.get_program().display()))?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run(&self, cmd: &ProcessBuilder) -> Result<Option<i32>> {
        tracing::debug!("running `{}`", cmd.display_command());

        let status = cmd
            .build_command()
            .status()
            .with_context(|| format!("failed to execute `{}`", cmd.get_program().display()))?;
        Ok(status.code())
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockExecutor, MockProcessOutput};

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("lli").args(["--print-toolchain-api-tool", "CC"]);
        assert_eq!(pb.display_command(), "lli --print-toolchain-api-tool CC");
    }

    #[test]
    fn test_env_is_recorded() {
        let pb = ProcessBuilder::new("java").env("JACOCO", "append");
        assert_eq!(pb.get_env("JACOCO"), Some("append"));
        assert_eq!(pb.get_env("PATH"), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_system_runner_capture() {
        let output = SystemRunner
            .capture(&ProcessBuilder::new("echo").arg("hello"))
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn test_capture_checked_fatal() {
        let exec = MockExecutor::new();
        exec.expect_prefix("lli", MockProcessOutput::failure(2, "boom"));

        let cmd = ProcessBuilder::new("lli").arg("--version");
        let err = exec.capture_checked(&cmd, ExitCheck::Fatal).unwrap_err();
        let err = err.downcast::<ToolchainError>().unwrap();
        assert!(matches!(err, ToolchainError::ProcessFailed { code: Some(2), .. }));

        let output = exec.capture_checked(&cmd, ExitCheck::Ignore).unwrap();
        assert_eq!(output.code, Some(2));
    }
}
