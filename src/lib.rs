//! Berth - toolchain alias resolution and command dispatch
//!
//! This crate maps abstract compiler-tool roles (C compiler, linker,
//! binary utilities, ...) to platform-specific executable names, resolves
//! their location through a standalone or the bootstrap toolchain, routes
//! invoked aliases to launcher entry points, and describes the launchers to
//! package.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for berth unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording process executor and toolchain
/// fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    descriptor::ToolchainDescriptor, descriptor::ToolchainSpec, registry::ToolchainRegistry,
    role::ToolRole,
};

pub use util::context::GlobalContext;
