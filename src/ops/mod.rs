//! High-level operations.
//!
//! This module contains the implementation of berth commands.

pub mod builtin;
pub mod dispatch;
pub mod launcher;
pub mod resolve;

pub use builtin::{load_registry, native_spec};
pub use dispatch::{CommandDispatcher, DispatchKind, DispatchTarget, RuntimeInvocation};
pub use launcher::{LauncherConfig, LauncherDescriptorBuilder};
pub use resolve::{
    ExecutionMode, FallbackPolicy, NotFoundReason, Resolution, StandaloneKind, StandaloneLocator,
    ToolResolver,
};
