//! Tool roles.
//!
//! A role names what a tool does (C compiler, linker, ...) independent of the
//! binary that implements it. Roles are a closed set so every lookup table
//! keyed by role can be validated when a toolchain is registered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The main roles a toolchain can provide a launcher for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolRole {
    /// C compiler driver
    Cc,
    /// C++ compiler driver
    Cxx,
    /// MSVC-compatible compiler driver
    Cl,
    /// Linker
    Ld,
    /// Fortran compiler driver
    Fc,
    /// Multi-call binary utility launcher
    Binutil,
}

impl ToolRole {
    /// All roles, in canonical order.
    pub const ALL: [ToolRole; 6] = [
        ToolRole::Cc,
        ToolRole::Cxx,
        ToolRole::Cl,
        ToolRole::Ld,
        ToolRole::Fc,
        ToolRole::Binutil,
    ];

    /// The role name as used on the command line and in introspection queries.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolRole::Cc => "CC",
            ToolRole::Cxx => "CXX",
            ToolRole::Cl => "CL",
            ToolRole::Ld => "LD",
            ToolRole::Fc => "FC",
            ToolRole::Binutil => "BINUTIL",
        }
    }
}

impl fmt::Display for ToolRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CC" => Ok(ToolRole::Cc),
            "CXX" => Ok(ToolRole::Cxx),
            "CL" => Ok(ToolRole::Cl),
            "LD" => Ok(ToolRole::Ld),
            "FC" => Ok(ToolRole::Fc),
            "BINUTIL" => Ok(ToolRole::Binutil),
            _ => Err(format!("unknown tool role '{}'", s)),
        }
    }
}

impl Serialize for ToolRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ToolRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Binary utilities served by the BINUTIL launcher.
///
/// These are resolved straight from the bootstrap `bin/` directory and never
/// go through the alias table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinutilTool {
    Ar,
    Nm,
    Objcopy,
    Objdump,
    Ranlib,
    Readelf,
    Readobj,
    Strip,
}

impl BinutilTool {
    /// All binary utilities, in canonical order.
    pub const ALL: [BinutilTool; 8] = [
        BinutilTool::Ar,
        BinutilTool::Nm,
        BinutilTool::Objcopy,
        BinutilTool::Objdump,
        BinutilTool::Ranlib,
        BinutilTool::Readelf,
        BinutilTool::Readobj,
        BinutilTool::Strip,
    ];

    /// Lowercase executable name (`ar`, `nm`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            BinutilTool::Ar => "ar",
            BinutilTool::Nm => "nm",
            BinutilTool::Objcopy => "objcopy",
            BinutilTool::Objdump => "objdump",
            BinutilTool::Ranlib => "ranlib",
            BinutilTool::Readelf => "readelf",
            BinutilTool::Readobj => "readobj",
            BinutilTool::Strip => "strip",
        }
    }

    /// Uppercase request name (`AR`, `NM`, ...).
    pub fn request_name(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for BinutilTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinutilTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        BinutilTool::ALL
            .iter()
            .copied()
            .find(|tool| tool.as_str() == lower)
            .ok_or_else(|| format!("unknown binary utility '{}'", s))
    }
}

/// A request for a tool path: either a main role or a binary utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolRequest {
    Role(ToolRole),
    Binutil(BinutilTool),
}

impl ToolRequest {
    /// The name passed to a standalone's introspection query.
    pub fn query_name(&self) -> String {
        match self {
            ToolRequest::Role(role) => role.as_str().to_string(),
            ToolRequest::Binutil(tool) => tool.request_name(),
        }
    }
}

impl From<ToolRole> for ToolRequest {
    fn from(role: ToolRole) -> Self {
        ToolRequest::Role(role)
    }
}

impl From<BinutilTool> for ToolRequest {
    fn from(tool: BinutilTool) -> Self {
        ToolRequest::Binutil(tool)
    }
}

impl fmt::Display for ToolRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query_name())
    }
}

impl FromStr for ToolRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(role) = s.parse::<ToolRole>() {
            return Ok(ToolRequest::Role(role));
        }
        if let Ok(tool) = s.parse::<BinutilTool>() {
            return Ok(ToolRequest::Binutil(tool));
        }
        Err(format!(
            "unknown tool '{}'; expected one of {}, or a binary utility ({})",
            s,
            ToolRole::ALL.map(|r| r.as_str()).join(", "),
            BinutilTool::ALL.map(|t| t.request_name()).join(", ")
        ))
    }
}
