//! Toolchain error types and diagnostics.
//!
//! Every error carries enough context (toolchain, role, owning distribution,
//! or the set of valid alternatives) to be actionable on its own.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::role::ToolRole;
use crate::util::diagnostic::Diagnostic;

/// Error raised by registration, resolution, or dispatch.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ToolchainError {
    #[error("toolchain `{name}` registered twice")]
    #[diagnostic(code(berth::config::duplicate_toolchain))]
    DuplicateToolchain { name: String },

    #[error("toolchain `{name}` does not exist (known toolchains: {})", .known.join(", "))]
    #[diagnostic(code(berth::config::unknown_toolchain))]
    UnknownToolchain { name: String, known: Vec<String> },

    #[error("invalid toolchain name `{name}`: {reason}")]
    #[diagnostic(code(berth::config::invalid_name))]
    InvalidName { name: String, reason: String },

    #[error("the {toolchain} toolchain is not owned by any distribution")]
    #[diagnostic(code(berth::config::missing_distribution))]
    MissingDistribution { toolchain: String },

    #[error("the {toolchain} toolchain (defined by {distribution}) does not support tool '{tool}' (supported: {})", role_list(.supported))]
    #[diagnostic(code(berth::config::unsupported_tool))]
    UnsupportedTool {
        toolchain: String,
        distribution: String,
        tool: String,
        supported: Vec<ToolRole>,
    },

    #[error("the {toolchain} toolchain has no command `{alias}`")]
    #[diagnostic(code(berth::config::unknown_alias))]
    UnknownAlias {
        toolchain: String,
        alias: String,
        valid: Vec<String>,
    },

    #[error("alias `{alias}` of the {toolchain} toolchain is claimed by both {first} and {second}")]
    #[diagnostic(code(berth::config::duplicate_alias))]
    DuplicateAlias {
        toolchain: String,
        alias: String,
        first: ToolRole,
        second: ToolRole,
    },

    #[error("the {toolchain} toolchain maps {role} to a main entry but has no aliases for it")]
    #[diagnostic(code(berth::config::missing_aliases))]
    MissingAliases { toolchain: String, role: ToolRole },

    #[error("could not query toolchain tool {tool} from the {mode} standalone: no standalone configured")]
    #[diagnostic(
        code(berth::resolve::standalone_not_configured),
        help("Set `standalone.{mode}` in .berth/toolchains.toml, or pass --allow-bootstrap")
    )]
    StandaloneNotConfigured { mode: String, tool: String },

    #[error("could not query toolchain tool {tool} from the standalone. Maybe the standalone isn't built yet?")]
    #[diagnostic(
        code(berth::resolve::standalone_not_built),
        help("Build the {mode} standalone first, or pass --allow-bootstrap")
    )]
    StandaloneNotBuilt {
        mode: String,
        tool: String,
        path: PathBuf,
    },

    #[error("the {mode} standalone returned no path for toolchain tool {tool}")]
    #[diagnostic(code(berth::resolve::empty_introspection))]
    EmptyIntrospection {
        mode: String,
        tool: String,
        standalone: PathBuf,
    },

    #[error("`{command}` failed with exit code {code:?}")]
    #[diagnostic(code(berth::exec::process_failed))]
    ProcessFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn role_list(roles: &[ToolRole]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ToolchainError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ToolchainError::DuplicateToolchain { name } => {
                Diagnostic::error(format!("toolchain `{}` registered twice", name))
                    .with_suggestion("Remove one of the definitions, or set `builtin = false` to replace the built-in toolchain")
            }

            ToolchainError::UnknownToolchain { name, known } => {
                Diagnostic::error(format!("toolchain `{}` does not exist", name))
                    .with_context(format!("known toolchains: {}", known.join(", ")))
                    .with_suggestion("Run `berth toolchain list` to see registered toolchains")
            }

            ToolchainError::InvalidName { name, reason } => {
                Diagnostic::error(format!("invalid toolchain name `{}`", name)).with_context(reason.clone())
            }

            ToolchainError::MissingDistribution { toolchain } => Diagnostic::error(format!(
                "the {} toolchain is not owned by any distribution",
                toolchain
            ))
            .with_suggestion("List the launcher distribution under `distributions`"),

            ToolchainError::UnsupportedTool {
                toolchain,
                distribution,
                tool,
                supported,
            } => Diagnostic::error(format!(
                "the {} toolchain (defined by {}) does not support tool '{}'",
                toolchain, distribution, tool
            ))
            .with_context(format!("supported tools: {}", role_list(supported))),

            ToolchainError::UnknownAlias {
                toolchain,
                alias,
                valid,
            } => Diagnostic::error(format!(
                "the {} toolchain has no command `{}`",
                toolchain, alias
            ))
            .with_context(format!("valid commands: {}", valid.join(", ")))
            .with_suggestion(format!(
                "usage: berth {}-toolchain <command> [args...]",
                toolchain
            )),

            ToolchainError::DuplicateAlias {
                toolchain,
                alias,
                first,
                second,
            } => Diagnostic::error(format!(
                "alias `{}` of the {} toolchain is ambiguous",
                alias, toolchain
            ))
            .with_context(format!("claimed by {} and {}", first, second))
            .with_suggestion("Give every role a distinct set of aliases"),

            ToolchainError::MissingAliases { toolchain, role } => Diagnostic::error(format!(
                "the {} toolchain has no aliases for {}",
                toolchain, role
            ))
            .with_suggestion(format!("Add `{}` to [toolchain.aliases]", role)),

            ToolchainError::StandaloneNotConfigured { mode, tool } => Diagnostic::error(format!(
                "cannot query {} from the {} standalone",
                tool, mode
            ))
            .with_context("no standalone is configured for this mode")
            .with_suggestion(format!("Set `standalone.{}` in .berth/toolchains.toml", mode))
            .with_suggestion("Pass --allow-bootstrap to use the bootstrap toolchain"),

            ToolchainError::StandaloneNotBuilt { mode, tool, path } => Diagnostic::error(format!(
                "cannot query {} from the {} standalone",
                tool, mode
            ))
            .with_location(path.clone())
            .with_context("the standalone has not been built yet")
            .with_suggestion(format!("Build the {} standalone", mode))
            .with_suggestion("Pass --allow-bootstrap to use the bootstrap toolchain"),

            ToolchainError::EmptyIntrospection {
                mode,
                tool,
                standalone,
            } => Diagnostic::error(format!(
                "the {} standalone returned no path for {}",
                mode, tool
            ))
            .with_location(standalone.clone())
            .with_suggestion("Check that the standalone supports --print-toolchain-api-tool"),

            ToolchainError::ProcessFailed {
                command,
                code,
                stderr,
            } => {
                let mut diag =
                    Diagnostic::error(format!("`{}` failed with exit code {:?}", command, code));
                if !stderr.trim().is_empty() {
                    diag = diag.with_context(stderr.trim().to_string());
                }
                diag
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_tool_message() {
        let err = ToolchainError::UnsupportedTool {
            toolchain: "native".to_string(),
            distribution: "SULONG_TOOLCHAIN_LAUNCHERS".to_string(),
            tool: "FC".to_string(),
            supported: vec![ToolRole::Cc, ToolRole::Cxx],
        };
        assert_eq!(
            err.to_string(),
            "the native toolchain (defined by SULONG_TOOLCHAIN_LAUNCHERS) does not support tool 'FC' (supported: CC, CXX)"
        );
        let rendered = err.to_diagnostic().format(false);
        assert!(rendered.contains("supported tools: CC, CXX"));
    }

    #[test]
    fn test_unknown_alias_lists_commands() {
        let err = ToolchainError::UnknownAlias {
            toolchain: "native".to_string(),
            alias: "tcc".to_string(),
            valid: vec!["clang".to_string(), "cc".to_string()],
        };
        let rendered = err.to_diagnostic().format(false);
        assert!(rendered.contains("valid commands: clang, cc"));
        assert!(rendered.contains("berth native-toolchain"));
    }

    #[test]
    fn test_standalone_errors_are_distinct() {
        let not_configured = ToolchainError::StandaloneNotConfigured {
            mode: "native".to_string(),
            tool: "CC".to_string(),
        };
        let not_built = ToolchainError::StandaloneNotBuilt {
            mode: "native".to_string(),
            tool: "CC".to_string(),
            path: PathBuf::from("/opt/standalone/bin/lli"),
        };
        assert!(not_configured.to_string().contains("no standalone configured"));
        assert!(not_built.to_string().contains("isn't built yet"));
    }
}
