//! Test fixtures for common test scenarios.
//!
//! This module provides pre-built toolchains and on-disk layouts for the
//! resolution and dispatch tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::descriptor::{FixedRoot, ToolchainDescriptor, ToolchainSpec};
use crate::core::platform::Platform;
use crate::core::role::ToolRole;
use crate::ops::builtin;

/// The built-in `native` toolchain with its bootstrap root fixed at `root`.
pub fn native_descriptor(root: &Path) -> ToolchainDescriptor {
    native_descriptor_for(root, Platform::Posix)
}

/// The built-in `native` toolchain for a specific platform.
pub fn native_descriptor_for(root: &Path, platform: Platform) -> ToolchainDescriptor {
    let spec = builtin::native_spec().root_provider(Arc::new(FixedRoot(root.to_path_buf())));
    ToolchainDescriptor::from_spec(spec, platform).expect("built-in toolchain must be valid")
}

/// A small toolchain providing only CC and LD.
pub fn minimal_spec(name: &str) -> ToolchainSpec {
    ToolchainSpec::new(name, "tools")
        .distribution(format!("{}_LAUNCHERS", name.to_uppercase()))
        .tool(ToolRole::Cc, "com.example.Clang")
        .tool(ToolRole::Ld, "com.example.Linker")
}

/// Create the canonical binary of every supported role under `<root>/bin`.
///
/// Returns the created paths, in role order.
pub fn write_bootstrap_layout(root: &Path, desc: &ToolchainDescriptor) -> Vec<PathBuf> {
    let bin = root.join("bin");
    std::fs::create_dir_all(&bin).expect("failed to create bootstrap bin dir");

    desc.supported_roles()
        .into_iter()
        .map(|role| {
            let path = bin.join(desc.primary_alias(role).expect("supported role"));
            std::fs::write(&path, b"").expect("failed to write bootstrap binary");
            path
        })
        .collect()
}

/// Config defining one custom toolchain whose bootstrap output is `output`.
pub fn custom_toolchain_config(name: &str, output: &Path) -> String {
    format!(
        r#"builtin = false

[distributions.{upper}_BOOTSTRAP]
output = "{output}"

[distributions.{upper}_LAUNCHERS]
classpath = ["/build/{name}-launchers.jar"]

[[toolchain]]
name = "{name}"
suite = "tools"
distributions = ["{upper}_LAUNCHERS"]
bootstrap = "{upper}_BOOTSTRAP"

[toolchain.tools]
CC = "com.example.Clang"
CXX = "com.example.ClangXX"
LD = "com.example.Linker"
"#,
        name = name,
        upper = name.to_uppercase(),
        output = output.display().to_string().replace('\\', "/"),
    )
}
