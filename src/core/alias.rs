//! Alias tables: per-role executable names.
//!
//! Each role maps to an ordered list of name templates. The first entry is
//! the canonical binary that launcher generation builds; the rest become
//! links that point at it. Templates may contain a `{name}` placeholder that
//! is replaced with the toolchain name.

use indexmap::IndexMap;

use crate::core::platform::Platform;
use crate::core::role::{BinutilTool, ToolRole};

/// Placeholder substituted with the toolchain name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Ordered name templates for every role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTemplates {
    templates: IndexMap<ToolRole, Vec<String>>,
}

impl AliasTemplates {
    /// Create an empty template set.
    pub fn new() -> Self {
        AliasTemplates {
            templates: IndexMap::new(),
        }
    }

    /// Set the templates for a role, replacing any previous entry.
    pub fn with_role<I, S>(mut self, role: ToolRole, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(role, templates.into_iter().map(Into::into).collect());
        self
    }

    /// Set the templates for a role.
    pub fn insert(&mut self, role: ToolRole, templates: Vec<String>) {
        self.templates.insert(role, templates);
    }

    /// Templates for a role.
    pub fn get(&self, role: ToolRole) -> Option<&[String]> {
        self.templates.get(&role).map(|t| t.as_slice())
    }

    /// Iterate roles and their templates.
    pub fn iter(&self) -> impl Iterator<Item = (ToolRole, &[String])> + '_ {
        self.templates.iter().map(|(role, t)| (*role, t.as_slice()))
    }

    /// Expand every template for `toolchain` on `platform`.
    pub fn expand(&self, toolchain: &str, platform: Platform) -> AliasTable {
        let entries = self
            .templates
            .iter()
            .map(|(role, templates)| {
                let names = templates
                    .iter()
                    .map(|t| expand_template(t, toolchain, platform))
                    .collect();
                (*role, names)
            })
            .collect();
        AliasTable { entries }
    }
}

impl Default for AliasTemplates {
    /// The standard LLVM-style alias templates.
    fn default() -> Self {
        let binutils = std::iter::once("graalvm-{name}-binutil".to_string())
            .chain(BinutilTool::ALL.iter().map(|t| t.as_str().to_string()))
            .chain(BinutilTool::ALL.iter().map(|t| format!("llvm-{}", t.as_str())));

        AliasTemplates::new()
            .with_role(
                ToolRole::Cc,
                ["graalvm-{name}-clang", "graalvm-clang", "clang", "cc", "gcc"],
            )
            .with_role(
                ToolRole::Cxx,
                ["graalvm-{name}-clang++", "graalvm-clang++", "clang++", "c++", "g++"],
            )
            .with_role(
                ToolRole::Cl,
                ["graalvm-{name}-clang-cl", "graalvm-clang-cl", "clang-cl", "cl"],
            )
            .with_role(
                ToolRole::Ld,
                ["graalvm-{name}-ld", "ld", "ld.lld", "lld", "lld-link", "ld64"],
            )
            .with_role(
                ToolRole::Fc,
                ["graalvm-{name}-flang", "graalvm-flang", "flang-new", "flang"],
            )
            .with_role(ToolRole::Binutil, binutils)
    }
}

/// Substitute the toolchain name and append the executable suffix.
pub fn expand_template(template: &str, toolchain: &str, platform: Platform) -> String {
    platform.exe(&template.replace(NAME_PLACEHOLDER, toolchain))
}

/// Concrete, platform-suffixed alias names per role.
///
/// Order within a role is preserved verbatim and never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: IndexMap<ToolRole, Vec<String>>,
}

impl AliasTable {
    /// All aliases for a role, canonical first.
    pub fn aliases(&self, role: ToolRole) -> Option<&[String]> {
        self.entries.get(&role).map(|a| a.as_slice())
    }

    /// The canonical (packaged) binary name for a role.
    pub fn primary(&self, role: ToolRole) -> Option<&str> {
        self.entries
            .get(&role)
            .and_then(|a| a.first())
            .map(|s| s.as_str())
    }

    /// The link names for a role (everything after the canonical binary).
    pub fn secondary(&self, role: ToolRole) -> &[String] {
        self.entries
            .get(&role)
            .map(|a| a.get(1..).unwrap_or(&[]))
            .unwrap_or(&[])
    }

    /// Iterate roles and their aliases.
    pub fn iter(&self) -> impl Iterator<Item = (ToolRole, &[String])> + '_ {
        self.entries.iter().map(|(role, a)| (*role, a.as_slice()))
    }

    /// Whether the table has an entry for `role`.
    pub fn contains(&self, role: ToolRole) -> bool {
        self.entries.contains_key(&role)
    }
}
