//! Toolchain registry.
//!
//! The registry is an explicit context object: it is built once while the
//! configuration is loaded and then handed by reference to every lookup.
//! Registration either fully succeeds or leaves the registry untouched.

use indexmap::IndexMap;

use crate::core::descriptor::{ToolchainDescriptor, ToolchainSpec};
use crate::core::errors::ToolchainError;
use crate::core::role::ToolRequest;
use crate::util::context::GlobalContext;

/// Registered toolchains, keyed by unique name.
#[derive(Debug, Clone, Default)]
pub struct ToolchainRegistry {
    toolchains: IndexMap<String, ToolchainDescriptor>,
}

impl ToolchainRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        ToolchainRegistry {
            toolchains: IndexMap::new(),
        }
    }

    /// Register a toolchain.
    ///
    /// Fails if the name is taken or the spec is malformed. On failure
    /// nothing from `spec` becomes visible.
    pub fn register(
        &mut self,
        spec: ToolchainSpec,
        ctx: &GlobalContext,
    ) -> Result<&ToolchainDescriptor, ToolchainError> {
        if self.toolchains.contains_key(&spec.name) {
            return Err(ToolchainError::DuplicateToolchain { name: spec.name });
        }

        let descriptor = ToolchainDescriptor::from_spec(spec, ctx.platform())?;
        tracing::debug!(
            "registered toolchain {} ({} roles, command `{}`)",
            descriptor.name(),
            descriptor.supported_roles().len(),
            descriptor.command_name()
        );

        let name = descriptor.name().to_string();
        let (index, _) = self.toolchains.insert_full(name, descriptor);
        Ok(&self.toolchains[index])
    }

    /// Look up a toolchain by name.
    pub fn get(&self, name: &str) -> Result<&ToolchainDescriptor, ToolchainError> {
        self.toolchains
            .get(name)
            .ok_or_else(|| ToolchainError::UnknownToolchain {
                name: name.to_string(),
                known: self.names(),
            })
    }

    /// Look up a toolchain by its dispatch command (`<name>-toolchain`).
    pub fn by_command(&self, command: &str) -> Option<&ToolchainDescriptor> {
        command
            .strip_suffix("-toolchain")
            .and_then(|name| self.toolchains.get(name))
    }

    /// Look up a toolchain and tool from the combined `"<name>,<TOOL>"` form.
    pub fn lookup_tool(
        &self,
        name_tool: &str,
    ) -> anyhow::Result<(&ToolchainDescriptor, ToolRequest)> {
        let (name, tool) = name_tool
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("expected `<toolchain>,<TOOL>`, got `{}`", name_tool))?;
        let descriptor = self.get(name)?;
        let request = tool
            .parse::<ToolRequest>()
            .map_err(|_| descriptor.unsupported(tool))?;
        Ok((descriptor, request))
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.toolchains.keys().cloned().collect()
    }

    /// Iterate registered toolchains in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolchainDescriptor> + '_ {
        self.toolchains.values()
    }

    /// Whether a toolchain is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.toolchains.contains_key(name)
    }

    /// Number of registered toolchains.
    pub fn len(&self) -> usize {
        self.toolchains.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.toolchains.is_empty()
    }
}
