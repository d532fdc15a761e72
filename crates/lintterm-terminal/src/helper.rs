//! Default shell helper backed by configuration and the platform.

use lintterm_core::shell::{build_command_line, identify_shell};
use lintterm_core::{Platform, ShellType, TerminalSettings};

use crate::host::TerminalHelper;

/// [`TerminalHelper`] that resolves the shell from a configured override or
/// the platform's default shell.
#[derive(Debug, Clone)]
pub struct ShellTerminalHelper {
    shell_path: Option<String>,
    platform: Platform,
}

impl ShellTerminalHelper {
    /// Helper for the current platform with an optional shell override.
    pub fn new(shell_path: Option<String>) -> Self {
        Self::with_platform(shell_path, Platform::detect())
    }

    /// Helper for an explicit platform.
    pub fn with_platform(shell_path: Option<String>, platform: Platform) -> Self {
        Self {
            shell_path,
            platform,
        }
    }

    /// Helper configured from terminal settings.
    pub fn from_settings(settings: &TerminalSettings) -> Self {
        Self::new(settings.shell_path.clone())
    }

    /// Platform whose default shell is used.
    pub fn platform(&self) -> Platform {
        self.platform
    }
}

impl Default for ShellTerminalHelper {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TerminalHelper for ShellTerminalHelper {
    fn terminal_shell_path(&self) -> Option<String> {
        match self.shell_path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => Some(path.to_string()),
            _ => Some(self.platform.default_shell_path()),
        }
    }

    fn identify_terminal_shell(&self, shell_path: &str) -> ShellType {
        identify_shell(shell_path)
    }

    fn build_command_for_terminal(
        &self,
        shell: ShellType,
        command: &str,
        args: &[String],
    ) -> String {
        build_command_line(shell, command, args)
    }
}
