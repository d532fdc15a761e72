//! Platform detection for shell resolution.
//!
//! The user's shell comes from a per-platform environment variable, and the
//! fallback shell differs between Unix and Windows.

use serde::{Deserialize, Serialize};

/// Host platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Native Linux (not WSL)
    Linux,
    /// macOS
    MacOS,
    /// Native Windows
    Windows,
    /// Windows Subsystem for Linux
    WSL,
}

impl Platform {
    /// Detect the current platform at runtime.
    ///
    /// # Examples
    ///
    /// ```
    /// use lintterm_core::Platform;
    ///
    /// let platform = Platform::detect();
    /// println!("Running on: {:?}", platform);
    /// ```
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if Self::is_wsl() {
            Platform::WSL
        } else {
            Platform::Linux
        }
    }

    /// Check if running under Windows Subsystem for Linux (WSL).
    ///
    /// Detection strategies:
    /// 1. Check `/proc/version` for "microsoft" or "Microsoft"
    /// 2. Check for `/proc/sys/fs/binfmt_misc/WSLInterop` file
    fn is_wsl() -> bool {
        if !cfg!(target_os = "linux") {
            return false;
        }

        if let Ok(version) = std::fs::read_to_string("/proc/version") {
            if version.to_lowercase().contains("microsoft") {
                return true;
            }
        }

        std::path::Path::new("/proc/sys/fs/binfmt_misc/WSLInterop").exists()
    }

    /// Get the platform name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
            Platform::MacOS => "macOS",
            Platform::Windows => "Windows",
            Platform::WSL => "WSL",
        }
    }

    /// Check if this is a Unix-like platform.
    pub fn is_unix(&self) -> bool {
        matches!(self, Platform::Linux | Platform::MacOS | Platform::WSL)
    }

    /// Environment variable naming the user's shell on this platform.
    pub fn shell_env_var(&self) -> &'static str {
        if self.is_unix() {
            "SHELL"
        } else {
            "COMSPEC"
        }
    }

    /// Shell used when nothing is configured.
    pub fn fallback_shell(&self) -> &'static str {
        if self.is_unix() {
            "/bin/sh"
        } else {
            "cmd.exe"
        }
    }

    /// Resolve the user's default shell from the environment.
    pub fn default_shell_path(&self) -> String {
        std::env::var(self.shell_env_var())
            .ok()
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| self.fallback_shell().to_string())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
