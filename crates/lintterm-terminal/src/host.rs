//! Contracts of the editor's terminal host.
//!
//! The terminal service never talks to a process directly. It goes through
//! these traits, which the embedding editor implements.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use lintterm_core::{Result, ShellType, Subscription, TerminalId, TerminalOptions, Url};

/// A terminal owned by the host.
pub trait Terminal: Debug + Send + Sync {
    /// Identity of this terminal.
    fn id(&self) -> TerminalId;

    /// Display name.
    fn name(&self) -> &str;

    /// Reveal the terminal, optionally keeping focus where it is.
    fn show(&self, preserve_focus: bool);

    /// Write text into the terminal, submitting it when `add_new_line` is set.
    fn send_text(&self, text: &str, add_new_line: bool);

    /// Kill the terminal. The host later reports it as closed.
    fn dispose(&self);
}

/// Callback for terminal-close notifications.
pub type TerminalCloseListener = Box<dyn Fn(&Arc<dyn Terminal>) + Send + Sync>;

/// The host's terminal factory and global close channel.
#[async_trait]
pub trait TerminalManager: Send + Sync {
    /// Create a new terminal.
    async fn create_terminal(&self, options: TerminalOptions) -> Result<Arc<dyn Terminal>>;

    /// Listen for every terminal the host closes, whoever created it.
    fn on_did_close_terminal(&self, listener: TerminalCloseListener) -> Subscription;
}

/// Shell resolution and command formatting.
pub trait TerminalHelper: Send + Sync {
    /// Configured shell executable, if any.
    fn terminal_shell_path(&self) -> Option<String>;

    /// Classify a shell executable path.
    fn identify_terminal_shell(&self, shell_path: &str) -> ShellType;

    /// Build the line that runs `command` with `args` in a `shell` terminal.
    fn build_command_for_terminal(&self, shell: ShellType, command: &str, args: &[String])
        -> String;
}

/// Activates a language environment inside a terminal.
#[async_trait]
pub trait TerminalActivator: Send + Sync {
    /// Send whatever commands activate the environment for `resource`.
    ///
    /// Resolves once activation has been written; returns whether anything
    /// was activated.
    async fn activate_environment_in_terminal(
        &self,
        terminal: &Arc<dyn Terminal>,
        resource: Option<&Url>,
        preserve_focus: bool,
    ) -> Result<bool>;
}
