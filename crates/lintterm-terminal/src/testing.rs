//! In-memory terminal host.
//!
//! Records every interaction so tests (here and in dependent crates) can
//! assert on what the terminal service did.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use lintterm_core::shell::{build_command_line, identify_shell};
use lintterm_core::{
    Emitter, Error, Result, ShellType, Subscription, TerminalId, TerminalOptions, Url,
};

use crate::host::{
    Terminal, TerminalActivator, TerminalCloseListener, TerminalHelper, TerminalManager,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Terminal that records what it was asked to do.
#[derive(Debug)]
pub struct FakeTerminal {
    id: TerminalId,
    options: TerminalOptions,
    shows: Mutex<Vec<bool>>,
    sent: Mutex<Vec<(String, bool)>>,
    disposals: AtomicUsize,
}

impl FakeTerminal {
    /// Create a terminal with the given options.
    pub fn new(options: TerminalOptions) -> Self {
        Self {
            id: TerminalId::new(),
            options,
            shows: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            disposals: AtomicUsize::new(0),
        }
    }

    /// Options the terminal was created with.
    pub fn options(&self) -> &TerminalOptions {
        &self.options
    }

    /// `preserve_focus` flag of every `show` call.
    pub fn shows(&self) -> Vec<bool> {
        lock(&self.shows).clone()
    }

    /// Every `send_text` call as `(text, add_new_line)`.
    pub fn sent(&self) -> Vec<(String, bool)> {
        lock(&self.sent).clone()
    }

    /// Whether `dispose` was called.
    pub fn is_disposed(&self) -> bool {
        self.dispose_count() > 0
    }

    /// Number of `dispose` calls.
    pub fn dispose_count(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }
}

impl Terminal for FakeTerminal {
    fn id(&self) -> TerminalId {
        self.id
    }

    fn name(&self) -> &str {
        &self.options.name
    }

    fn show(&self, preserve_focus: bool) {
        lock(&self.shows).push(preserve_focus);
    }

    fn send_text(&self, text: &str, add_new_line: bool) {
        lock(&self.sent).push((text.to_string(), add_new_line));
    }

    fn dispose(&self) {
        self.disposals.fetch_add(1, Ordering::SeqCst);
    }
}

/// Terminal host that creates [`FakeTerminal`]s and lets tests close them.
#[derive(Debug, Default)]
pub struct RecordingTerminalManager {
    terminals: Mutex<Vec<Arc<FakeTerminal>>>,
    closed: Emitter<Arc<dyn Terminal>>,
    creation_delay: Option<Duration>,
    fail_next: Mutex<Option<Error>>,
}

impl RecordingTerminalManager {
    /// Host that creates terminals immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose terminal creation takes `delay` of (Tokio) time.
    pub fn with_creation_delay(delay: Duration) -> Self {
        Self {
            creation_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Make the next `create_terminal` call fail with `error`.
    pub fn fail_next_creation(&self, error: Error) {
        *lock(&self.fail_next) = Some(error);
    }

    /// Every terminal created so far.
    pub fn terminals(&self) -> Vec<Arc<FakeTerminal>> {
        lock(&self.terminals).clone()
    }

    /// Number of terminals created so far.
    pub fn created_count(&self) -> usize {
        lock(&self.terminals).len()
    }

    /// Most recently created terminal.
    pub fn last_terminal(&self) -> Option<Arc<FakeTerminal>> {
        lock(&self.terminals).last().cloned()
    }

    /// Simulate the user closing `terminal`.
    pub fn close_terminal(&self, terminal: &Arc<FakeTerminal>) {
        let terminal: Arc<dyn Terminal> = terminal.clone();
        self.closed.fire(&terminal);
    }

    /// Simulate a terminal the manager never created being closed.
    pub fn close_foreign_terminal(&self) {
        let terminal: Arc<dyn Terminal> =
            Arc::new(FakeTerminal::new(TerminalOptions::named("foreign")));
        self.closed.fire(&terminal);
    }

    /// Number of close listeners currently registered.
    pub fn close_listener_count(&self) -> usize {
        self.closed.listener_count()
    }
}

#[async_trait]
impl TerminalManager for RecordingTerminalManager {
    async fn create_terminal(&self, options: TerminalOptions) -> Result<Arc<dyn Terminal>> {
        if let Some(delay) = self.creation_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = lock(&self.fail_next).take() {
            return Err(error);
        }
        let terminal = Arc::new(FakeTerminal::new(options));
        lock(&self.terminals).push(Arc::clone(&terminal));
        Ok(terminal)
    }

    fn on_did_close_terminal(&self, listener: TerminalCloseListener) -> Subscription {
        self.closed.subscribe(move |terminal| listener(terminal))
    }
}

/// One recorded environment activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Terminal the environment was activated in
    pub terminal: TerminalId,
    /// Resource the environment was chosen for
    pub resource: Option<Url>,
    /// Focus preference passed along
    pub preserve_focus: bool,
}

/// Activator that records activations and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingActivator {
    activations: Mutex<Vec<Activation>>,
    delay: Option<Duration>,
    fail_next: Mutex<Option<Error>>,
}

impl RecordingActivator {
    /// Activator that completes immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Activator whose activation takes `delay` of (Tokio) time.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Make the next activation fail with `error`.
    pub fn fail_next_activation(&self, error: Error) {
        *lock(&self.fail_next) = Some(error);
    }

    /// Every activation so far.
    pub fn activations(&self) -> Vec<Activation> {
        lock(&self.activations).clone()
    }
}

#[async_trait]
impl TerminalActivator for RecordingActivator {
    async fn activate_environment_in_terminal(
        &self,
        terminal: &Arc<dyn Terminal>,
        resource: Option<&Url>,
        preserve_focus: bool,
    ) -> Result<bool> {
        lock(&self.activations).push(Activation {
            terminal: terminal.id(),
            resource: resource.cloned(),
            preserve_focus,
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match lock(&self.fail_next).take() {
            Some(error) => Err(error),
            None => Ok(true),
        }
    }
}

/// Helper with a fixed (possibly missing) shell path.
#[derive(Debug, Clone, Default)]
pub struct FixedShellHelper {
    shell_path: Option<String>,
}

impl FixedShellHelper {
    /// Helper reporting `shell_path` as the configured shell.
    pub fn new(shell_path: Option<&str>) -> Self {
        Self {
            shell_path: shell_path.map(str::to_string),
        }
    }
}

impl TerminalHelper for FixedShellHelper {
    fn terminal_shell_path(&self) -> Option<String> {
        self.shell_path.clone()
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
