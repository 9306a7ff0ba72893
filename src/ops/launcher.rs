//! Launcher descriptors for packaging.
//!
//! Every supported role of a toolchain gets one native launcher: the
//! canonical alias is the built binary and the remaining aliases become links
//! to it inside the toolchain's `bin/` directory.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::descriptor::ToolchainDescriptor;
use crate::ops::builtin::NATIVE_LAUNCHER_PACKAGE;

/// Options wrapped in the experimental-options unlock pair.
const EXPERIMENTAL_OPTIONS: &[&str] = &["-H:-ParseRuntimeOptions"];

/// Packaging record for one launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LauncherConfig {
    /// Built binary, relative to the packaging root
    pub destination: PathBuf,
    /// Suite-qualified distributions on the launcher's classpath
    pub jar_distributions: Vec<String>,
    /// Main entry symbol
    pub main_class: String,
    /// Link paths pointing at the destination
    pub links: Vec<PathBuf>,
    /// Native-image build arguments
    pub build_args: Vec<String>,
    pub is_main_launcher: bool,
    pub default_symlinks: bool,
}

/// Builds [`LauncherConfig`]s from a descriptor.
#[derive(Debug, Clone)]
pub struct LauncherDescriptorBuilder {
    build_time_package: String,
}

impl LauncherDescriptorBuilder {
    /// A builder initializing the built-in launcher package at build time.
    pub fn new() -> Self {
        LauncherDescriptorBuilder {
            build_time_package: NATIVE_LAUNCHER_PACKAGE.to_string(),
        }
    }

    /// Native-image arguments shared by every launcher.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--initialize-at-build-time={}", self.build_time_package),
            "--gc=epsilon".to_string(),
            "-H:+UnlockExperimentalVMOptions".to_string(),
        ];
        args.extend(EXPERIMENTAL_OPTIONS.iter().map(|s| s.to_string()));
        args.push("-H:-UnlockExperimentalVMOptions".to_string());
        args
    }

    /// One launcher per supported role, in role definition order.
    pub fn build(&self, desc: &ToolchainDescriptor) -> Result<Vec<LauncherConfig>> {
        let bin = PathBuf::from(desc.subdir()).join("bin");
        let jars: Vec<String> = desc
            .jar_distributions()
            .iter()
            .map(|d| d.to_string())
            .collect();
        let build_args = self.build_args();

        desc.supported_roles()
            .into_iter()
            .map(|role| -> Result<LauncherConfig> {
                Ok(LauncherConfig {
                    destination: bin.join(desc.primary_alias(role)?),
                    jar_distributions: jars.clone(),
                    main_class: desc.main_entry(role)?.to_string(),
                    links: desc
                        .secondary_aliases(role)?
                        .iter()
                        .map(|alias| bin.join(alias))
                        .collect(),
                    build_args: build_args.clone(),
                    is_main_launcher: false,
                    default_symlinks: false,
                })
            })
            .collect()
    }
}

impl Default for LauncherDescriptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptor::ToolchainSpec;
    use crate::core::platform::Platform;
    use crate::core::role::ToolRole;
    use crate::test_support::native_descriptor;
    use std::collections::HashSet;
    use std::path::Path;

    fn two_role_descriptor() -> ToolchainDescriptor {
        let spec = ToolchainSpec::new("native", "sulong")
            .distribution("SULONG_TOOLCHAIN_LAUNCHERS")
            .tool(ToolRole::Cc, "launchers.Clang")
            .tool(ToolRole::Cxx, "launchers.ClangXX");
        ToolchainDescriptor::from_spec(spec, Platform::Posix).unwrap()
    }

    #[test]
    fn test_one_launcher_per_role() {
        let desc = two_role_descriptor();
        let launchers = LauncherDescriptorBuilder::new().build(&desc).unwrap();

        assert_eq!(launchers.len(), 2);
        let destinations: HashSet<_> = launchers.iter().map(|l| l.destination.clone()).collect();
        assert_eq!(destinations.len(), 2);

        let cc = &launchers[0];
        assert_eq!(cc.destination, Path::new("native/bin/graalvm-native-clang"));
        assert_eq!(cc.main_class, "launchers.Clang");
        assert_eq!(
            cc.links,
            vec![
                PathBuf::from("native/bin/graalvm-clang"),
                PathBuf::from("native/bin/clang"),
                PathBuf::from("native/bin/cc"),
                PathBuf::from("native/bin/gcc"),
            ]
        );
        assert_eq!(cc.jar_distributions, vec!["sulong:SULONG_TOOLCHAIN_LAUNCHERS"]);
        assert!(!cc.is_main_launcher);
        assert!(!cc.default_symlinks);
    }

    #[test]
    fn test_build_is_deterministic() {
        let desc = native_descriptor(Path::new("/bootstrap"));
        let builder = LauncherDescriptorBuilder::new();
        assert_eq!(builder.build(&desc).unwrap(), builder.build(&desc).unwrap());
    }

    #[test]
    fn test_build_args() {
        let args = LauncherDescriptorBuilder::new().build_args();
        assert_eq!(
            args,
            vec![
                "--initialize-at-build-time=com.oracle.truffle.llvm.toolchain.launchers",
                "--gc=epsilon",
                "-H:+UnlockExperimentalVMOptions",
                "-H:-ParseRuntimeOptions",
                "-H:-UnlockExperimentalVMOptions",
            ]
        );
    }

    #[test]
    fn test_serializes_to_json() {
        let desc = two_role_descriptor();
        let launchers = LauncherDescriptorBuilder::new().build(&desc).unwrap();
        let json = serde_json::to_value(&launchers).unwrap();

        assert_eq!(json[1]["destination"], "native/bin/graalvm-native-clang++");
        assert_eq!(json[1]["main_class"], "launchers.ClangXX");
        assert_eq!(json[1]["is_main_launcher"], false);
    }
}
