//! Terminal service: one lazily created, environment-activated terminal.
//!
//! The terminal does not exist until the first `send_command`, `send_text`
//! or `show`. Creation runs at most once at a time: callers arriving while a
//! terminal is being created and activated await the same pending creation.
//! When the host reports the terminal closed, the session goes back to idle
//! and the next call creates a fresh one.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, warn};

use lintterm_core::{
    Disposable, Emitter, Error, Result, ShellType, Subscription, TerminalOptions, Url,
};

use crate::host::{Terminal, TerminalActivator, TerminalHelper, TerminalManager};

/// Collaborators a terminal service works with.
#[derive(Clone)]
pub struct TerminalServices {
    /// Terminal host
    pub manager: Arc<dyn TerminalManager>,
    /// Shell resolution and command formatting
    pub helper: Arc<dyn TerminalHelper>,
    /// Environment activation
    pub activator: Arc<dyn TerminalActivator>,
}

impl fmt::Debug for TerminalServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalServices").finish_non_exhaustive()
    }
}

/// A created and activated terminal.
#[derive(Debug, Clone)]
struct ActiveTerminal {
    terminal: Arc<dyn Terminal>,
    shell_type: ShellType,
}

type PendingTerminal = Shared<BoxFuture<'static, Result<ActiveTerminal>>>;

enum SessionState {
    /// No terminal yet, or the last one closed
    Idle,
    /// Creation/activation in flight
    Creating {
        generation: u64,
        pending: PendingTerminal,
        /// Set once the host has handed out the terminal
        terminal: Option<Arc<dyn Terminal>>,
    },
    /// Terminal is usable
    Ready(ActiveTerminal),
    /// Service disposed
    Disposed,
}

struct Session {
    generation: u64,
    state: SessionState,
}

struct ServiceInner {
    services: TerminalServices,
    resource: Option<Url>,
    title: String,
    session: Mutex<Session>,
    closed: Emitter<()>,
}

impl ServiceInner {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resource_str(&self) -> &str {
        self.resource.as_ref().map(Url::as_str).unwrap_or("<none>")
    }

    /// Return the live terminal, creating it if needed.
    async fn ensure_terminal(self: &Arc<Self>, preserve_focus: bool) -> Result<ActiveTerminal> {
        let pending = {
            let mut session = self.session();
            match &session.state {
                SessionState::Ready(active) => return Ok(active.clone()),
                SessionState::Disposed => return Err(Error::TerminalDisposed),
                SessionState::Creating { pending, .. } => {
                    debug!("Awaiting in-flight terminal creation: title='{}'", self.title);
                    pending.clone()
                }
                SessionState::Idle => {
                    session.generation += 1;
                    let generation = session.generation;
                    let pending = Arc::clone(self)
                        .create_terminal(generation, preserve_focus)
                        .boxed()
                        .shared();
                    session.state = SessionState::Creating {
                        generation,
                        pending: pending.clone(),
                        terminal: None,
                    };
                    pending
                }
            }
        };
        pending.await
    }

    async fn create_terminal(
        self: Arc<Self>,
        generation: u64,
        preserve_focus: bool,
    ) -> Result<ActiveTerminal> {
        let shell_path = self
            .services
            .helper
            .terminal_shell_path()
            .filter(|path| !path.trim().is_empty());
        let shell_type = match &shell_path {
            Some(path) => self.services.helper.identify_terminal_shell(path),
            None => ShellType::Other,
        };

        let options = TerminalOptions {
            shell_path,
            ..TerminalOptions::named(self.title.clone())
        };
        let result = self
            .create_and_activate(generation, options, shell_type, preserve_focus)
            .await;
        self.settle(generation, result)
    }

    async fn create_and_activate(
        &self,
        generation: u64,
        options: TerminalOptions,
        shell_type: ShellType,
        preserve_focus: bool,
    ) -> Result<ActiveTerminal> {
        info!(
            "Creating terminal: title='{}', shell={}, resource={}",
            self.title,
            shell_type,
            self.resource_str()
        );

        let terminal = self.services.manager.create_terminal(options).await?;
        // Only disposal ends a creation before the host hands out its terminal.
        if !self.record_in_flight(generation, &terminal) {
            info!(
                "Disposing terminal created after service disposal: id={}",
                terminal.id()
            );
            terminal.dispose();
            return Err(Error::TerminalDisposed);
        }

        let activation = self
            .services
            .activator
            .activate_environment_in_terminal(&terminal, self.resource.as_ref(), preserve_focus)
            .await;
        if let Err(err) = activation {
            // Forget the terminal first so its close notification is not ours.
            if self.release_in_flight(generation) {
                warn!(
                    "Environment activation failed, disposing terminal: id={}, error={}",
                    terminal.id(),
                    err
                );
                terminal.dispose();
            }
            return Err(err);
        }

        terminal.show(preserve_focus);
        Ok(ActiveTerminal {
            terminal,
            shell_type,
        })
    }

    /// Store the host terminal of creation `generation`.
    ///
    /// Returns false when that creation is no longer current; the caller
    /// then still owns the terminal.
    fn record_in_flight(&self, generation: u64, terminal: &Arc<dyn Terminal>) -> bool {
        let mut session = self.session();
        match &mut session.state {
            SessionState::Creating {
                generation: current,
                terminal: slot,
                ..
            } if *current == generation => {
                *slot = Some(Arc::clone(terminal));
                true
            }
            _ => false,
        }
    }

    /// Take back the terminal stored by [`Self::record_in_flight`].
    ///
    /// Returns false when a close or disposal already took it.
    fn release_in_flight(&self, generation: u64) -> bool {
        let mut session = self.session();
        match &mut session.state {
            SessionState::Creating {
                generation: current,
                terminal: slot,
                ..
            } if *current == generation => slot.take().is_some(),
            _ => false,
        }
    }

    /// Record the outcome of creation `generation`.
    fn settle(&self, generation: u64, result: Result<ActiveTerminal>) -> Result<ActiveTerminal> {
        let mut session = self.session();
        let current = matches!(
            &session.state,
            SessionState::Creating { generation: g, .. } if *g == generation
        );

        if current {
            session.state = match &result {
                Ok(active) => {
                    info!(
                        "Terminal ready: title='{}', id={}, shell={}",
                        self.title,
                        active.terminal.id(),
                        active.shell_type
                    );
                    SessionState::Ready(active.clone())
                }
                Err(err) => {
                    debug!("Terminal creation failed: title='{}', error={}", self.title, err);
                    SessionState::Idle
                }
            };
            return result;
        }

        // Closed or disposed while creation was in flight. Disposal already
        // released the terminal it found in flight.
        let disposed = matches!(session.state, SessionState::Disposed);
        drop(session);
        match result {
            Ok(_) if disposed => Err(Error::TerminalDisposed),
            Ok(_) => Err(Error::TerminalClosed),
            Err(err) => Err(err),
        }
    }

    fn handle_terminal_closed(&self, closed: &Arc<dyn Terminal>) {
        let closed_id = closed.id();
        {
            let mut session = self.session();
            let ours = match &session.state {
                SessionState::Ready(active) => active.terminal.id() == closed_id,
                SessionState::Creating {
                    terminal: Some(terminal),
                    ..
                } => terminal.id() == closed_id,
                _ => false,
            };
            if !ours {
                return;
            }
            session.state = SessionState::Idle;
        }

        info!("Terminal closed: title='{}', id={}", self.title, closed_id);
        self.closed.fire(&());
    }
}

/// Owns at most one terminal, created on first use.
pub struct TerminalService {
    inner: Arc<ServiceInner>,
    close_subscription: Subscription,
}

impl TerminalService {
    /// Create a service; no terminal is created until first use.
    ///
    /// The service listens to the host's close notifications for its whole
    /// lifetime and reacts only to its own terminal.
    pub fn new(services: TerminalServices, resource: Option<Url>, title: impl Into<String>) -> Self {
        let inner = Arc::new(ServiceInner {
            services,
            resource,
            title: title.into(),
            session: Mutex::new(Session {
                generation: 0,
                state: SessionState::Idle,
            }),
            closed: Emitter::new(),
        });

        let weak = Arc::downgrade(&inner);
        let close_subscription = inner
            .services
            .manager
            .on_did_close_terminal(Box::new(move |terminal: &Arc<dyn Terminal>| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_terminal_closed(terminal);
                }
            }));

        Self {
            inner,
            close_subscription,
        }
    }

    /// Run `command` with `args` in the terminal.
    ///
    /// The command line is formatted for the terminal's shell and submitted
    /// for execution.
    pub async fn send_command(&self, command: &str, args: &[String]) -> Result<()> {
        let active = self.inner.ensure_terminal(true).await?;
        let text =
            self.inner
                .services
                .helper
                .build_command_for_terminal(active.shell_type, command, args);
        debug!("Sending command: title='{}', text='{}'", self.inner.title, text);
        active.terminal.show(true);
        active.terminal.send_text(&text, true);
        Ok(())
    }

    /// Write raw text into the terminal without submitting it.
    pub async fn send_text(&self, text: &str) -> Result<()> {
        let active = self.inner.ensure_terminal(true).await?;
        active.terminal.show(true);
        active.terminal.send_text(text, false);
        Ok(())
    }

    /// Reveal the terminal, creating it if needed.
    pub async fn show(&self, preserve_focus: bool) -> Result<()> {
        let active = self.inner.ensure_terminal(preserve_focus).await?;
        active.terminal.show(preserve_focus);
        Ok(())
    }

    /// Listen for the service's terminal being closed.
    pub fn on_did_close_terminal<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.closed.subscribe(move |_| listener())
    }

    /// Terminal title.
    pub fn title(&self) -> &str {
        &self.inner.title
    }

    /// Resource whose environment is activated.
    pub fn resource(&self) -> Option<&Url> {
        self.inner.resource.as_ref()
    }

    /// Shell type of the live terminal.
    pub fn shell_type(&self) -> Option<ShellType> {
        match &self.inner.session().state {
            SessionState::Ready(active) => Some(active.shell_type),
            _ => None,
        }
    }

    /// Whether a usable terminal currently exists.
    pub fn has_terminal(&self) -> bool {
        matches!(self.inner.session().state, SessionState::Ready(_))
    }

    /// Whether the service has been disposed.
    pub fn is_disposed(&self) -> bool {
        matches!(self.inner.session().state, SessionState::Disposed)
    }
}

impl Disposable for TerminalService {
    fn dispose(&self) {
        self.close_subscription.dispose();

        let previous =
            std::mem::replace(&mut self.inner.session().state, SessionState::Disposed);
        match previous {
            SessionState::Ready(active) => {
                info!(
                    "Disposing terminal: title='{}', id={}",
                    self.inner.title,
                    active.terminal.id()
                );
                active.terminal.dispose();
            }
            SessionState::Creating {
                terminal: Some(terminal),
                ..
            } => {
                info!(
                    "Disposing terminal still being activated: title='{}', id={}",
                    self.inner.title,
                    terminal.id()
                );
                terminal.dispose();
            }
            SessionState::Creating { terminal: None, .. } => {
                debug!(
                    "Terminal creation in flight, host terminal disposed on arrival: title='{}'",
                    self.inner.title
                );
            }
            SessionState::Idle | SessionState::Disposed => {}
        }
    }
}

impl fmt::Debug for TerminalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalService")
            .field("title", &self.inner.title)
            .field("resource", &self.inner.resource)
            .field("has_terminal", &self.has_terminal())
            .finish()
    }
}
