//! Host platform conventions for executable names.
//!
//! The platform is selected once (usually from the host) and carried by the
//! [`GlobalContext`](crate::util::GlobalContext); everything that needs to
//! suffix a binary name or patch a bootstrap path asks it.

use std::fmt;
use std::path::{Path, PathBuf};

/// Executable naming conventions of the target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Linux, macOS and other POSIX-like systems: no suffixes.
    Posix,
    /// Windows: `.exe` for compiled images, `.cmd` for script wrappers.
    Windows,
}

impl Platform {
    /// Detect the host platform.
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    /// Suffix for compiled executables.
    pub fn exe_suffix(&self) -> &'static str {
        match self {
            Platform::Posix => "",
            Platform::Windows => ".exe",
        }
    }

    /// Suffix for script launchers.
    pub fn cmd_suffix(&self) -> &'static str {
        match self {
            Platform::Posix => "",
            Platform::Windows => ".cmd",
        }
    }

    /// Append the executable suffix to `name`.
    pub fn exe(&self, name: &str) -> String {
        format!("{}{}", name, self.exe_suffix())
    }

    /// Append the script launcher suffix to `name`.
    pub fn cmd(&self, name: &str) -> String {
        format!("{}{}", name, self.cmd_suffix())
    }

    /// Patch a main-role bootstrap path whose compiled image may be missing.
    ///
    /// A bootstrap toolchain built without native images only ships `.cmd`
    /// wrappers on Windows. When the `.exe` is absent the wrapper is used
    /// instead. Other platforms return the path untouched.
    pub fn bootstrap_executable(&self, path: PathBuf) -> PathBuf {
        match self {
            Platform::Posix => path,
            Platform::Windows => {
                let is_exe = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"));
                if is_exe && !path.exists() {
                    tracing::debug!(
                        "{} not found, falling back to script launcher",
                        path.display()
                    );
                    path.with_extension("cmd")
                } else {
                    path
                }
            }
        }
    }

    /// Separator for classpath-style path lists.
    pub fn path_list_separator(&self) -> &'static str {
        match self {
            Platform::Posix => ":",
            Platform::Windows => ";",
        }
    }

    /// Join a list of paths with the platform's list separator.
    pub fn join_path_list(&self, paths: &[impl AsRef<Path>]) -> String {
        paths
            .iter()
            .map(|p| p.as_ref().display().to_string())
            .collect::<Vec<_>>()
            .join(self.path_list_separator())
    }

    /// Name of the platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Posix => "posix",
            Platform::Windows => "windows",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::host()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
