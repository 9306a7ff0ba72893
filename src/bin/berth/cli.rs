//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Berth - toolchain alias resolution and command dispatch
#[derive(Parser)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use this config file instead of .berth/toolchains.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Query tools from a pre-built standalone (jvm or native)
    #[arg(long, global = true, value_name = "MODE", env = "BERTH_USE_STANDALONE")]
    pub use_standalone: Option<String>,

    /// Fall back to the bootstrap toolchain when the standalone is unavailable
    #[arg(long, global = true)]
    pub allow_bootstrap: bool,

    /// What dispatched commands run (runtime or resolved)
    #[arg(long, global = true, value_name = "TARGET")]
    pub dispatch: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect registered toolchains
    Toolchain(ToolchainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Run a toolchain command: <name>-toolchain <command> [args...]
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Args)]
pub struct ToolchainArgs {
    #[command(subcommand)]
    pub command: ToolchainCommands,
}

#[derive(Subcommand)]
pub enum ToolchainCommands {
    /// List toolchains with their roles and aliases
    List,

    /// Print the path of a tool
    Path(ToolchainPathArgs),

    /// Print the bootstrap root of a toolchain
    Root(ToolchainNameArgs),

    /// Show the launchers packaged for a toolchain
    Launchers(ToolchainLaunchersArgs),
}

#[derive(Args)]
pub struct ToolchainPathArgs {
    /// Toolchain name, or `<name>,<TOOL>`
    pub toolchain: String,

    /// Tool role (CC, CXX, CL, LD, FC, BINUTIL) or binary utility (AR, NM, ...)
    pub tool: Option<String>,
}

#[derive(Args)]
pub struct ToolchainNameArgs {
    /// Toolchain name
    pub toolchain: String,
}

#[derive(Args)]
pub struct ToolchainLaunchersArgs {
    /// Toolchain name
    pub toolchain: String,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
