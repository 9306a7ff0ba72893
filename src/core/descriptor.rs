//! Toolchain descriptors.
//!
//! A [`ToolchainSpec`] is the registration input: what a toolchain is called,
//! which distributions own it, which main entry implements each role, and how
//! its tools are named. Registration turns a spec into an immutable
//! [`ToolchainDescriptor`] with expanded aliases and a reverse [`PathMap`].

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use indexmap::IndexMap;

use crate::core::alias::{AliasTable, AliasTemplates};
use crate::core::distribution::DistributionRef;
use crate::core::errors::ToolchainError;
use crate::core::platform::Platform;
use crate::core::role::ToolRole;
use crate::util::context::GlobalContext;

/// Computes the root directory of a bootstrap toolchain.
///
/// Called on every lookup; implementations must not cache, since the
/// environment and filesystem may change between calls.
pub trait BootstrapRootProvider: fmt::Debug + Send + Sync {
    /// Return the bootstrap root for `toolchain`.
    fn root(&self, toolchain: &str, ctx: &GlobalContext) -> Result<PathBuf>;
}

/// Bootstrap root backed by a distribution's output directory.
///
/// When the bootstrap standalone environment variable is set, its
/// `lib/sulong/<toolchain>` directory wins over the distribution output.
#[derive(Debug, Clone)]
pub struct DistributionRoot {
    distribution: DistributionRef,
    output: Option<PathBuf>,
}

impl DistributionRoot {
    /// Create a provider for `distribution` whose build output is `output`.
    pub fn new(distribution: DistributionRef, output: Option<PathBuf>) -> Self {
        DistributionRoot {
            distribution,
            output,
        }
    }
}

impl BootstrapRootProvider for DistributionRoot {
    fn root(&self, toolchain: &str, ctx: &GlobalContext) -> Result<PathBuf> {
        if let Some(standalone) = ctx.env_var(ctx.bootstrap_env()) {
            if !standalone.is_empty() {
                return Ok(PathBuf::from(standalone)
                    .join("lib")
                    .join("sulong")
                    .join(toolchain));
            }
        }

        match &self.output {
            Some(output) => Ok(output.clone()),
            None => bail!(
                "bootstrap distribution {} has no output directory configured\n\
                 help: set `distributions.{}.output` or the {} environment variable",
                self.distribution,
                self.distribution.name(),
                ctx.bootstrap_env()
            ),
        }
    }
}

/// Bootstrap root at a fixed path.
#[derive(Debug, Clone)]
pub struct FixedRoot(pub PathBuf);

impl BootstrapRootProvider for FixedRoot {
    fn root(&self, _toolchain: &str, _ctx: &GlobalContext) -> Result<PathBuf> {
        Ok(self.0.clone())
    }
}

/// Registration input for a toolchain.
#[derive(Debug, Clone)]
pub struct ToolchainSpec {
    /// Unique toolchain name
    pub name: String,
    /// Suite owning the toolchain (qualifies plain distribution names)
    pub suite: String,
    /// Distributions the launchers live in, in order
    pub distributions: Vec<DistributionRef>,
    /// Distribution holding the bootstrap toolchain
    pub bootstrap: DistributionRef,
    /// Output directory of the bootstrap distribution
    pub bootstrap_output: Option<PathBuf>,
    /// Main entry symbol per role, in definition order
    pub tools: IndexMap<ToolRole, String>,
    /// Alias templates, or the defaults when `None`
    pub alias_templates: Option<AliasTemplates>,
    /// Flags passed to a standalone before the introspection query
    pub select_flags: Vec<String>,
    /// Custom bootstrap root provider
    pub root_provider: Option<Arc<dyn BootstrapRootProvider>>,
}

impl ToolchainSpec {
    /// Start a spec for `name`, owned by `suite`.
    pub fn new(name: impl Into<String>, suite: impl Into<String>) -> Self {
        let name = name.into();
        ToolchainSpec {
            bootstrap: DistributionRef::new(format!("{}_BOOTSTRAP_TOOLCHAIN", name.to_uppercase())),
            name,
            suite: suite.into(),
            distributions: Vec::new(),
            bootstrap_output: None,
            tools: IndexMap::new(),
            alias_templates: None,
            select_flags: Vec::new(),
            root_provider: None,
        }
    }

    /// Add an owning distribution.
    pub fn distribution(mut self, dist: impl AsRef<str>) -> Self {
        self.distributions.push(DistributionRef::parse(dist.as_ref()));
        self
    }

    /// Set the bootstrap distribution.
    pub fn bootstrap(mut self, dist: impl AsRef<str>) -> Self {
        self.bootstrap = DistributionRef::parse(dist.as_ref());
        self
    }

    /// Set the bootstrap distribution's output directory.
    pub fn bootstrap_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.bootstrap_output = Some(output.into());
        self
    }

    /// Map a role to its main entry symbol.
    pub fn tool(mut self, role: ToolRole, main: impl Into<String>) -> Self {
        self.tools.insert(role, main.into());
        self
    }

    /// Override the alias templates.
    pub fn alias_templates(mut self, templates: AliasTemplates) -> Self {
        self.alias_templates = Some(templates);
        self
    }

    /// Set the standalone select flags.
    pub fn select_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Use a custom bootstrap root provider.
    pub fn root_provider(mut self, provider: Arc<dyn BootstrapRootProvider>) -> Self {
        self.root_provider = Some(provider);
        self
    }
}

/// Reverse mapping from concrete alias to role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMap {
    entries: HashMap<String, ToolRole>,
}

impl PathMap {
    /// Build the reverse map for `roles`, rejecting aliases claimed twice.
    pub fn build(
        toolchain: &str,
        aliases: &AliasTable,
        roles: impl IntoIterator<Item = ToolRole>,
    ) -> Result<Self, ToolchainError> {
        let mut entries = HashMap::new();
        for role in roles {
            let names = aliases
                .aliases(role)
                .filter(|names| !names.is_empty())
                .ok_or_else(|| ToolchainError::MissingAliases {
                    toolchain: toolchain.to_string(),
                    role,
                })?;

            for name in names {
                if let Some(first) = entries.insert(name.clone(), role) {
                    return Err(ToolchainError::DuplicateAlias {
                        toolchain: toolchain.to_string(),
                        alias: name.clone(),
                        first,
                        second: role,
                    });
                }
            }
        }
        Ok(PathMap { entries })
    }

    /// Role for a concrete alias.
    pub fn get(&self, alias: &str) -> Option<ToolRole> {
        self.entries.get(alias).copied()
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An immutable, registered toolchain.
#[derive(Debug, Clone)]
pub struct ToolchainDescriptor {
    name: String,
    suite: String,
    distributions: Vec<DistributionRef>,
    bootstrap: DistributionRef,
    tools: IndexMap<ToolRole, String>,
    aliases: AliasTable,
    path_map: PathMap,
    select_flags: Vec<String>,
    root_provider: Arc<dyn BootstrapRootProvider>,
}

impl ToolchainDescriptor {
    /// Validate a spec and expand its aliases for `platform`.
    pub fn from_spec(spec: ToolchainSpec, platform: Platform) -> Result<Self, ToolchainError> {
        validate_name(&spec.name)?;

        if spec.distributions.is_empty() {
            return Err(ToolchainError::MissingDistribution {
                toolchain: spec.name,
            });
        }

        let templates = spec.alias_templates.unwrap_or_default();
        let aliases = templates.expand(&spec.name, platform);
        let path_map = PathMap::build(&spec.name, &aliases, spec.tools.keys().copied())?;

        let root_provider = spec.root_provider.unwrap_or_else(|| {
            Arc::new(DistributionRoot::new(
                spec.bootstrap.clone(),
                spec.bootstrap_output.clone(),
            ))
        });

        Ok(ToolchainDescriptor {
            name: spec.name,
            suite: spec.suite,
            distributions: spec.distributions,
            bootstrap: spec.bootstrap,
            tools: spec.tools,
            aliases,
            path_map,
            select_flags: spec.select_flags,
            root_provider,
        })
    }

    /// The toolchain name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the dispatch command (`<name>-toolchain`).
    pub fn command_name(&self) -> String {
        format!("{}-toolchain", self.name)
    }

    /// Subdirectory the toolchain is packaged under.
    pub fn subdir(&self) -> &str {
        &self.name
    }

    /// The owning suite.
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Owning distributions, in order.
    pub fn distributions(&self) -> &[DistributionRef] {
        &self.distributions
    }

    /// The distribution named in diagnostics.
    pub fn primary_distribution(&self) -> &DistributionRef {
        &self.distributions[0]
    }

    /// Owning distributions qualified with the suite.
    pub fn jar_distributions(&self) -> Vec<DistributionRef> {
        self.distributions
            .iter()
            .map(|d| d.qualify(&self.suite))
            .collect()
    }

    /// The bootstrap distribution.
    pub fn bootstrap_distribution(&self) -> &DistributionRef {
        &self.bootstrap
    }

    /// Flags passed to a standalone before the introspection query.
    pub fn select_flags(&self) -> &[String] {
        &self.select_flags
    }

    /// Supported roles, in definition order.
    pub fn supported_roles(&self) -> Vec<ToolRole> {
        self.tools.keys().copied().collect()
    }

    /// Whether `role` has a main entry.
    pub fn supports(&self, role: ToolRole) -> bool {
        self.tools.contains_key(&role)
    }

    /// Main entry symbol for a role.
    pub fn main_entry(&self, role: ToolRole) -> Result<&str, ToolchainError> {
        self.tools
            .get(&role)
            .map(|s| s.as_str())
            .ok_or_else(|| self.unsupported(role))
    }

    /// All aliases for a supported role, canonical first.
    pub fn aliases(&self, role: ToolRole) -> Result<&[String], ToolchainError> {
        self.check_tool(role)?;
        self.aliases.aliases(role).ok_or_else(|| self.unsupported(role))
    }

    /// The canonical binary name for a supported role.
    pub fn primary_alias(&self, role: ToolRole) -> Result<&str, ToolchainError> {
        self.check_tool(role)?;
        self.aliases.primary(role).ok_or_else(|| self.unsupported(role))
    }

    /// Link names for a supported role.
    pub fn secondary_aliases(&self, role: ToolRole) -> Result<&[String], ToolchainError> {
        self.check_tool(role)?;
        Ok(self.aliases.secondary(role))
    }

    /// Role an alias dispatches to.
    pub fn role_for_alias(&self, alias: &str) -> Option<ToolRole> {
        self.path_map.get(alias)
    }

    /// Every alias of every supported role, in role order.
    pub fn supported_aliases(&self) -> Vec<String> {
        self.tools
            .keys()
            .filter_map(|role| self.aliases.aliases(*role))
            .flatten()
            .cloned()
            .collect()
    }

    /// The reverse alias map.
    pub fn path_map(&self) -> &PathMap {
        &self.path_map
    }

    /// Compute the bootstrap root. Never cached.
    pub fn bootstrap_root(&self, ctx: &GlobalContext) -> Result<PathBuf> {
        self.root_provider.root(&self.name, ctx)
    }

    /// Error for a tool this toolchain does not provide.
    pub fn unsupported(&self, tool: impl fmt::Display) -> ToolchainError {
        ToolchainError::UnsupportedTool {
            toolchain: self.name.clone(),
            distribution: self.primary_distribution().to_string(),
            tool: tool.to_string(),
            supported: self.supported_roles(),
        }
    }

    fn check_tool(&self, role: ToolRole) -> Result<(), ToolchainError> {
        if self.supports(role) {
            Ok(())
        } else {
            Err(self.unsupported(role))
        }
    }
}

fn validate_name(name: &str) -> Result<(), ToolchainError> {
    let reason = if name.is_empty() {
        "name must not be empty"
    } else if name.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
        "name must not contain whitespace or path separators"
    } else if name.contains(',') {
        "name must not contain ','"
    } else {
        return Ok(());
    };

    Err(ToolchainError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn spec() -> ToolchainSpec {
        ToolchainSpec::new("native", "sulong")
            .distribution("SULONG_TOOLCHAIN_LAUNCHERS")
            .bootstrap("sulong:SULONG_BOOTSTRAP_TOOLCHAIN")
            .tool(ToolRole::Cc, "launchers.Clang")
            .tool(ToolRole::Cxx, "launchers.ClangXX")
    }

    #[test]
    fn test_from_spec_builds_path_map() {
        let desc = ToolchainDescriptor::from_spec(spec(), Platform::Posix).unwrap();

        assert_eq!(desc.role_for_alias("clang"), Some(ToolRole::Cc));
        assert_eq!(desc.role_for_alias("graalvm-native-clang"), Some(ToolRole::Cc));
        assert_eq!(desc.role_for_alias("g++"), Some(ToolRole::Cxx));
        // Roles without a main entry are not dispatchable.
        assert_eq!(desc.role_for_alias("ld"), None);
        assert_eq!(desc.path_map().len(), 10);
    }

    #[test]
    fn test_unsupported_role_lists_configured_roles() {
        let desc = ToolchainDescriptor::from_spec(spec(), Platform::Posix).unwrap();

        let err = desc.main_entry(ToolRole::Ld).unwrap_err();
        match err {
            ToolchainError::UnsupportedTool {
                toolchain,
                distribution,
                tool,
                supported,
            } => {
                assert_eq!(toolchain, "native");
                assert_eq!(distribution, "SULONG_TOOLCHAIN_LAUNCHERS");
                assert_eq!(tool, "LD");
                assert_eq!(supported, vec![ToolRole::Cc, ToolRole::Cxx]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let templates = AliasTemplates::new()
            .with_role(ToolRole::Cc, ["graalvm-{name}-clang", "cc"])
            .with_role(ToolRole::Cxx, ["graalvm-{name}-clang++", "cc"]);

        let err = ToolchainDescriptor::from_spec(spec().alias_templates(templates), Platform::Posix)
            .unwrap_err();
        assert!(matches!(
            err,
            ToolchainError::DuplicateAlias { ref alias, first: ToolRole::Cc, second: ToolRole::Cxx, .. }
                if alias == "cc"
        ));
    }

    #[test]
    fn test_role_without_aliases_rejected() {
        let templates = AliasTemplates::new().with_role(ToolRole::Cc, ["cc"]);
        let err = ToolchainDescriptor::from_spec(spec().alias_templates(templates), Platform::Posix)
            .unwrap_err();
        assert!(matches!(err, ToolchainError::MissingAliases { role: ToolRole::Cxx, .. }));
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "my toolchain", "a/b", "a,b"] {
            let spec = ToolchainSpec::new(name, "suite").distribution("D").tool(ToolRole::Cc, "Main");
            assert!(matches!(
                ToolchainDescriptor::from_spec(spec, Platform::Posix),
                Err(ToolchainError::InvalidName { .. })
            ));
        }
    }

    #[test]
    fn test_requires_distribution() {
        let spec = ToolchainSpec::new("bare", "suite").tool(ToolRole::Cc, "Main");
        assert!(matches!(
            ToolchainDescriptor::from_spec(spec, Platform::Posix),
            Err(ToolchainError::MissingDistribution { .. })
        ));
    }

    #[test]
    fn test_jar_distributions_are_qualified() {
        let spec = spec().distribution("tools:EXTRA");
        let desc = ToolchainDescriptor::from_spec(spec, Platform::Posix).unwrap();
        let jars: Vec<String> = desc.jar_distributions().iter().map(|d| d.to_string()).collect();
        assert_eq!(jars, vec!["sulong:SULONG_TOOLCHAIN_LAUNCHERS", "tools:EXTRA"]);
    }

    #[test]
    fn test_distribution_root_prefers_bootstrap_standalone() {
        let tmp = TempDir::new().unwrap();
        let desc = ToolchainDescriptor::from_spec(
            spec().bootstrap_output(tmp.path().join("out")),
            Platform::Posix,
        )
        .unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .unwrap()
            .with_env("SULONG_BOOTSTRAP_STANDALONE", None::<String>);
        assert_eq!(desc.bootstrap_root(&ctx).unwrap(), tmp.path().join("out"));

        let ctx = ctx.with_env("SULONG_BOOTSTRAP_STANDALONE", Some("/opt/standalone"));
        assert_eq!(
            desc.bootstrap_root(&ctx).unwrap(),
            PathBuf::from("/opt/standalone/lib/sulong/native")
        );
    }

    #[test]
    fn test_distribution_root_without_output_fails() {
        let tmp = TempDir::new().unwrap();
        let desc = ToolchainDescriptor::from_spec(spec(), Platform::Posix).unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .unwrap()
            .with_env("SULONG_BOOTSTRAP_STANDALONE", None::<String>);

        let err = desc.bootstrap_root(&ctx).unwrap_err();
        assert!(err.to_string().contains("SULONG_BOOTSTRAP_TOOLCHAIN"));
    }
}
