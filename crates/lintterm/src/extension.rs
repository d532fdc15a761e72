//! Extension activation: wires terminal sessions and lint scheduling to the
//! editor's services.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use lintterm_core::{Disposable, ExtensionConfig, Result, Url};
use lintterm_lint::{
    ConfigurationService, DocumentManager, InterpreterService, LintScheduler, LintSchedulerConfig,
    LintServices, LinterManager, LintingEngine, WorkspaceService,
};
use lintterm_terminal::{
    ShellTerminalHelper, TerminalActivator, TerminalHelper, TerminalManager, TerminalService,
    TerminalServiceFactory, TerminalServiceFactoryConfig, TerminalServices,
};

use crate::context::DisposableRegistry;

/// Editor services the extension is activated against.
#[derive(Clone)]
pub struct ExtensionServices {
    /// Terminal host
    pub terminal_manager: Arc<dyn TerminalManager>,
    /// Environment activation in terminals
    pub activator: Arc<dyn TerminalActivator>,
    /// Shell helper; defaults to [`ShellTerminalHelper`] from the terminal settings
    pub terminal_helper: Option<Arc<dyn TerminalHelper>>,
    /// Open document tracking
    pub documents: Arc<dyn DocumentManager>,
    /// Configuration change events
    pub workspace: Arc<dyn WorkspaceService>,
    /// Lint settings per location
    pub configuration: Arc<dyn ConfigurationService>,
    /// Active linter lookup
    pub linters: Arc<dyn LinterManager>,
    /// Lint execution and diagnostics
    pub engine: Arc<dyn LintingEngine>,
    /// Interpreter change events
    pub interpreters: Arc<dyn InterpreterService>,
}

impl fmt::Debug for ExtensionServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionServices").finish_non_exhaustive()
    }
}

/// An activated extension.
///
/// Dropping it disposes everything it registered.
pub struct Extension {
    config: ExtensionConfig,
    terminals: Arc<TerminalServiceFactory>,
    scheduler: Arc<LintScheduler>,
    disposables: DisposableRegistry,
}

impl Extension {
    /// Load and validate a YAML configuration file.
    pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<ExtensionConfig> {
        let path = path.as_ref();
        ExtensionConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    /// Activate against `services` on the current Tokio runtime.
    pub fn activate(services: ExtensionServices, config: ExtensionConfig) -> Result<Self> {
        config.validate()?;

        let helper: Arc<dyn TerminalHelper> = match services.terminal_helper {
            Some(helper) => helper,
            None => Arc::new(ShellTerminalHelper::from_settings(&config.terminal)),
        };
        let terminals = Arc::new(TerminalServiceFactory::with_config(
            TerminalServices {
                manager: services.terminal_manager,
                helper,
                activator: services.activator,
            },
            TerminalServiceFactoryConfig::from(&config.terminal),
        ));

        let scheduler = Arc::new(LintScheduler::new(
            LintServices {
                documents: services.documents,
                workspace: services.workspace,
                configuration: services.configuration,
                linters: services.linters,
                engine: services.engine,
                interpreters: services.interpreters,
            },
            LintSchedulerConfig::from(&config.linting),
        )?);

        let disposables = DisposableRegistry::new();
        disposables.push(Arc::clone(&scheduler) as Arc<dyn Disposable>);
        disposables.push(Arc::clone(&terminals) as Arc<dyn Disposable>);

        info!(
            "Extension activated: terminal='{}', language={}",
            config.terminal.title, config.linting.language_id
        );

        Ok(Self {
            config,
            terminals,
            scheduler,
            disposables,
        })
    }

    /// Terminal service for `resource`, cached per title and resource.
    pub fn terminal_service(
        &self,
        resource: Option<&Url>,
        title: Option<&str>,
    ) -> Result<Arc<TerminalService>> {
        self.terminals.get_terminal_service(resource, title)
    }

    /// Terminal service factory.
    pub fn terminals(&self) -> &TerminalServiceFactory {
        &self.terminals
    }

    /// Lint scheduler.
    pub fn scheduler(&self) -> &LintScheduler {
        &self.scheduler
    }

    /// Active configuration.
    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// Register another disposable to be released with the extension.
    pub fn register(&self, item: Arc<dyn Disposable>) {
        self.disposables.push(item);
    }

    /// Whether the extension has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposables.is_disposed()
    }

    /// Release everything in reverse registration order. Idempotent.
    pub fn dispose(&self) {
        if self.disposables.is_disposed() {
            return;
        }
        self.disposables.dispose();
        info!("Extension disposed");
    }
}

impl Drop for Extension {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("config", &self.config)
            .field("terminals", &self.terminals)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
