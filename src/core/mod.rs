//! Core data structures for berth.
//!
//! This module contains the foundational types used throughout berth:
//! - Tool roles and requests
//! - Platform naming conventions
//! - Alias tables and distribution references
//! - Toolchain descriptors and the registry

pub mod alias;
pub mod descriptor;
pub mod distribution;
pub mod errors;
pub mod platform;
pub mod registry;
pub mod role;

pub use alias::{AliasTable, AliasTemplates};
pub use descriptor::{BootstrapRootProvider, PathMap, ToolchainDescriptor, ToolchainSpec};
pub use distribution::DistributionRef;
pub use errors::ToolchainError;
pub use platform::Platform;
pub use registry::ToolchainRegistry;
pub use role::{BinutilTool, ToolRequest, ToolRole};
