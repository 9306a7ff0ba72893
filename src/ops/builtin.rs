//! The built-in `native` toolchain and registry loading.

use anyhow::Result;

use crate::core::descriptor::ToolchainSpec;
use crate::core::registry::ToolchainRegistry;
use crate::core::role::ToolRole;
use crate::util::config::Config;
use crate::util::context::GlobalContext;

/// Name of the built-in toolchain.
pub const NATIVE_TOOLCHAIN: &str = "native";

/// Suite owning the built-in toolchain.
pub const NATIVE_SUITE: &str = "sulong";

/// Distribution holding the built-in launchers.
pub const NATIVE_LAUNCHERS: &str = "SULONG_TOOLCHAIN_LAUNCHERS";

/// Distribution holding the built-in bootstrap toolchain.
pub const NATIVE_BOOTSTRAP: &str = "sulong:SULONG_BOOTSTRAP_TOOLCHAIN";

/// Package of the built-in launcher entry points.
pub const NATIVE_LAUNCHER_PACKAGE: &str = "com.oracle.truffle.llvm.toolchain.launchers";

/// Registration spec for the built-in toolchain, without a bootstrap output.
pub fn native_spec() -> ToolchainSpec {
    let main = |class: &str| format!("{}.{}", NATIVE_LAUNCHER_PACKAGE, class);

    ToolchainSpec::new(NATIVE_TOOLCHAIN, NATIVE_SUITE)
        .distribution(NATIVE_LAUNCHERS)
        .bootstrap(NATIVE_BOOTSTRAP)
        .tool(ToolRole::Cc, main("Clang"))
        .tool(ToolRole::Cxx, main("ClangXX"))
        .tool(ToolRole::Cl, main("ClangCL"))
        .tool(ToolRole::Fc, main("Flang"))
        .tool(ToolRole::Ld, main("Linker"))
        .tool(ToolRole::Binutil, main("BinUtil"))
}

/// Build the registry from configuration.
///
/// The built-in toolchain comes first unless disabled; configured toolchains
/// follow in file order. Any registration failure aborts loading.
pub fn load_registry(config: &Config, ctx: &GlobalContext) -> Result<ToolchainRegistry> {
    let mut registry = ToolchainRegistry::new();

    if config.builtin_enabled() {
        let mut spec = native_spec();
        if let Some(output) = config.distribution_output(&spec.bootstrap) {
            spec = spec.bootstrap_output(output);
        }
        registry.register(spec, ctx)?;
    }

    for toolchain in &config.toolchains {
        registry.register(toolchain.to_spec(config), ctx)?;
    }

    tracing::debug!("loaded {} toolchain(s)", registry.len());
    Ok(registry)
}
