//! Lint scheduling driven by document lifecycle events.
//!
//! The scheduler decides, per editor event, whether a lint pass should run
//! and starts it as a detached task so the triggering event never waits on
//! it. Lint failures are logged and dropped.
//!
//! | Event | Action |
//! |-------|--------|
//! | document opened | lint the document |
//! | document saved | lint it if lint-on-save applies, else rescan everything after a delay when a linter config file was saved |
//! | document closed | clear its diagnostics once no editor has it open |
//! | configuration changed | re-lint each affected open document |
//! | interpreter changed | lint all open files |
//! | startup | lint all open files after a delay |

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use lintterm_core::{Disposable, Error, LintingSettings, Result, Subscription, TextDocument};

use crate::host::{
    ConfigurationChange, ConfigurationService, DocumentManager, InterpreterService, LintReason,
    LinterManager, LintingEngine, WorkspaceService,
};

/// Collaborators the scheduler listens to and drives.
#[derive(Clone)]
pub struct LintServices {
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

impl fmt::Debug for LintServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LintServices").finish_non_exhaustive()
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSchedulerConfig {
    /// Language whose documents are linted on save
    pub language_id: String,

    /// Configuration section whose changes trigger a re-lint
    pub config_section: String,

    /// Delay before the startup pass
    pub startup_delay: Duration,

    /// Delay before the rescan triggered by a saved linter config file
    pub config_rescan_delay: Duration,

    /// Whether to run the startup pass at all
    pub run_startup_pass: bool,
}

impl Default for LintSchedulerConfig {
    fn default() -> Self {
        Self::from(&LintingSettings::default())
    }
}

impl From<&LintingSettings> for LintSchedulerConfig {
    /// The startup pass is also skipped under test execution.
    fn from(settings: &LintingSettings) -> Self {
        Self {
            language_id: settings.language_id.clone(),
            config_section: settings.config_section.clone(),
            startup_delay: settings.startup_delay(),
            config_rescan_delay: settings.config_rescan_delay(),
            run_startup_pass: settings.run_startup_pass && !lintterm_core::is_test_execution(),
        }
    }
}

#[derive(Default)]
struct Timers {
    disposed: bool,
    pending: Vec<JoinHandle<()>>,
}

struct SchedulerInner {
    services: LintServices,
    config: LintSchedulerConfig,
    runtime: Handle,
    timers: Mutex<Timers>,
}

impl SchedulerInner {
    fn timers(&self) -> MutexGuard<'_, Timers> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_disposed(&self) -> bool {
        self.timers().disposed
    }

    fn spawn_lint_document(&self, document: TextDocument, reason: LintReason) {
        let engine = Arc::clone(&self.services.engine);
        self.runtime.spawn(async move {
            if let Err(err) = engine.lint_document(&document, reason).await {
                debug!(
                    "Lint failed: uri={}, reason={}, error={}",
                    document.uri, reason, err
                );
            }
        });
    }

    fn lint_open_files(&self, reason: LintReason) -> impl Future<Output = ()> + Send + 'static {
        let engine = Arc::clone(&self.services.engine);
        async move {
            debug!("Linting open files: reason={}", reason);
            if let Err(err) = engine.lint_open_files(reason).await {
                debug!("Lint of open files failed: reason={}, error={}", reason, err);
            }
        }
    }

    /// Run `task` after `delay` unless the scheduler is disposed first.
    fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut timers = self.timers();
        if timers.disposed {
            return;
        }
        timers.pending.retain(|handle| !handle.is_finished());
        let deadline = Instant::now() + delay;
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            task.await;
        });
        timers.pending.push(handle);
    }

    fn on_document_opened(&self, document: &TextDocument) {
        if self.is_disposed() {
            return;
        }
        self.spawn_lint_document(document.clone(), LintReason::Opened);
    }

    fn on_document_saved(self: &Arc<Self>, document: &TextDocument) {
        if self.is_disposed() {
            return;
        }

        let settings = self
            .services
            .configuration
            .lint_settings(Some(&document.uri));
        if document.language_id == self.config.language_id
            && settings.enabled
            && settings.lint_on_save
        {
            self.spawn_lint_document(document.clone(), LintReason::Saved);
            return;
        }

        let Some(basename) = document.basename() else {
            return;
        };
        let inner = Arc::downgrade(self);
        let uri = document.uri.clone();
        let linters = Arc::clone(&self.services.linters);
        self.runtime.spawn(async move {
            let active = match linters.active_linters(true, Some(&uri)).await {
                Ok(active) => active,
                Err(err) => {
                    debug!("Active linter lookup failed: uri={}, error={}", uri, err);
                    return;
                }
            };
            let Some(linter) = active
                .iter()
                .find(|linter| linter.watches_config_file(&basename))
            else {
                return;
            };
            if let Some(inner) = Weak::upgrade(&inner) {
                info!(
                    "Linter config file saved, rescanning open files: file={}, linter={}",
                    basename, linter.name
                );
                let rescan = inner.lint_open_files(LintReason::ConfigFileSaved);
                inner.schedule(inner.config.config_rescan_delay, rescan);
            }
        });
    }

    fn on_document_closed(&self, document: &TextDocument) {
        if self.is_disposed() || document.fs_path().is_none() {
            return;
        }
        if self.services.documents.is_document_open(&document.uri) {
            debug!("Document still open elsewhere: uri={}", document.uri);
            return;
        }
        debug!("Clearing diagnostics: uri={}", document.uri);
        self.services.engine.clear_diagnostics(document);
    }

    fn on_configuration_changed(&self, change: &Arc<dyn ConfigurationChange>) {
        if self.is_disposed() {
            return;
        }
        for document in self.services.documents.text_documents() {
            if change.affects_configuration(&self.config.config_section, Some(&document.uri)) {
                self.spawn_lint_document(document, LintReason::ConfigurationChanged);
            }
        }
    }

    fn on_interpreter_changed(&self) {
        if self.is_disposed() {
            return;
        }
        self.runtime
            .spawn(self.lint_open_files(LintReason::InterpreterChanged));
    }
}

/// Triggers lint passes in response to editor events.
///
/// Dropping the scheduler disposes it.
pub struct LintScheduler {
    inner: Arc<SchedulerInner>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl LintScheduler {
    /// Create a scheduler on the current Tokio runtime.
    ///
    /// Fails with [`Error::NoRuntime`] outside a runtime context.
    pub fn new(services: LintServices, config: LintSchedulerConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self::with_runtime(services, config, runtime))
    }

    /// Create a scheduler whose background work runs on `runtime`.
    pub fn with_runtime(
        services: LintServices,
        config: LintSchedulerConfig,
        runtime: Handle,
    ) -> Self {
        let inner = Arc::new(SchedulerInner {
            services,
            config,
            runtime,
            timers: Mutex::new(Timers::default()),
        });

        let documents = &inner.services.documents;
        let mut subscriptions = Vec::with_capacity(5);

        let weak = Arc::downgrade(&inner);
        subscriptions.push(documents.on_did_open_text_document(Box::new(
            move |document: &TextDocument| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_document_opened(document);
                }
            },
        )));

        let weak = Arc::downgrade(&inner);
        subscriptions.push(documents.on_did_save_text_document(Box::new(
            move |document: &TextDocument| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_document_saved(document);
                }
            },
        )));

        let weak = Arc::downgrade(&inner);
        subscriptions.push(documents.on_did_close_text_document(Box::new(
            move |document: &TextDocument| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_document_closed(document);
                }
            },
        )));

        let weak = Arc::downgrade(&inner);
        subscriptions.push(inner.services.workspace.on_did_change_configuration(Box::new(
            move |change: &Arc<dyn ConfigurationChange>| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_configuration_changed(change);
                }
            },
        )));

        let weak = Arc::downgrade(&inner);
        subscriptions.push(inner.services.interpreters.on_did_change_interpreter(Box::new(
            move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_interpreter_changed();
                }
            },
        )));

        if inner.config.run_startup_pass {
            debug!(
                "Scheduling startup lint pass: delay={}ms",
                inner.config.startup_delay.as_millis()
            );
            let startup = inner.lint_open_files(LintReason::Startup);
            inner.schedule(inner.config.startup_delay, startup);
        }

        info!(
            "Lint scheduler started: language={}, section={}",
            inner.config.language_id, inner.config.config_section
        );

        Self {
            inner,
            subscriptions: Mutex::new(subscriptions),
        }
    }

    /// Scheduler configuration.
    pub fn config(&self) -> &LintSchedulerConfig {
        &self.inner.config
    }

    /// Number of delayed passes not yet finished.
    pub fn pending_timers(&self) -> usize {
        self.inner
            .timers()
            .pending
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Whether the scheduler has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

impl Disposable for LintScheduler {
    fn dispose(&self) {
        let pending = {
            let mut timers = self.inner.timers();
            if timers.disposed {
                return;
            }
            timers.disposed = true;
            std::mem::take(&mut timers.pending)
        };

        let subscriptions = std::mem::take(
            &mut *self
                .subscriptions
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for subscription in &subscriptions {
            subscription.dispose();
        }
        for handle in &pending {
            handle.abort();
        }

        info!(
            "Lint scheduler disposed: subscriptions={}, aborted_timers={}",
            subscriptions.len(),
            pending.len()
        );
    }
}

impl Drop for LintScheduler {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for LintScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LintScheduler")
            .field("config", &self.inner.config)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintterm_core::{LintSettings, Url};

    use crate::host::LinterInfo;
    use crate::testing::{
        InMemoryDocuments, LintCall, RecordingInterpreterService, RecordingLintingEngine,
        RecordingWorkspace, SectionChange, StaticConfiguration, StaticLinterManager,
    };

    struct Fixture {
        documents: Arc<InMemoryDocuments>,
        workspace: Arc<RecordingWorkspace>,
        configuration: Arc<StaticConfiguration>,
        linters: Arc<StaticLinterManager>,
        engine: Arc<RecordingLintingEngine>,
        interpreters: Arc<RecordingInterpreterService>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                documents: Arc::new(InMemoryDocuments::new()),
                workspace: Arc::new(RecordingWorkspace::new()),
                configuration: Arc::new(StaticConfiguration::new(LintSettings::default())),
                linters: Arc::new(StaticLinterManager::new(vec![LinterInfo::new(
                    "flake8",
                    [".flake8", "setup.cfg", "tox.ini"],
                )])),
                engine: Arc::new(RecordingLintingEngine::new()),
                interpreters: Arc::new(RecordingInterpreterService::new()),
            }
        }

        fn services(&self) -> LintServices {
            LintServices {
                documents: self.documents.clone(),
                workspace: self.workspace.clone(),
                configuration: self.configuration.clone(),
                linters: self.linters.clone(),
                engine: self.engine.clone(),
                interpreters: self.interpreters.clone(),
            }
        }

        fn scheduler(&self) -> LintScheduler {
            LintScheduler::new(self.services(), config()).unwrap()
        }
    }

    fn config() -> LintSchedulerConfig {
        LintSchedulerConfig {
            run_startup_pass: false,
            ..LintSchedulerConfig::from(&LintingSettings::default())
        }
    }

    fn python(path: &str) -> TextDocument {
        TextDocument::from_path(path, "python").unwrap()
    }

    /// Let detached tasks run to completion.
    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_new_requires_runtime() {
        let fixture = Fixture::new();
        let result = LintScheduler::new(fixture.services(), config());
        assert!(matches!(result, Err(Error::NoRuntime)));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = LintingSettings {
            config_rescan_delay_ms: 250,
            run_startup_pass: false,
            ..LintingSettings::default()
        };
        let config = LintSchedulerConfig::from(&settings);
        assert_eq!(config.language_id, "python");
        assert_eq!(config.config_section, "python.linting");
        assert_eq!(config.config_rescan_delay, Duration::from_millis(250));
        assert_eq!(config.startup_delay, Duration::from_millis(1200));
        assert!(!config.run_startup_pass);
    }

    #[tokio::test]
    async fn test_open_lints_document() {
        let fixture = Fixture::new();
        let _scheduler = fixture.scheduler();
        let doc = python("/work/a.py");

        fixture.documents.open(doc.clone());
        settle().await;

        assert_eq!(
            fixture.engine.calls(),
            vec![LintCall::Document(doc.uri, LintReason::Opened)]
        );
    }

    #[tokio::test]
    async fn test_open_failure_is_swallowed() {
        let fixture = Fixture::new();
        let _scheduler = fixture.scheduler();
        fixture.engine.fail_all(true);

        fixture.documents.open(python("/work/a.py"));
        fixture.documents.open(python("/work/b.py"));
        settle().await;

        assert_eq!(fixture.engine.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_with_lint_on_save_lints_immediately() {
        let fixture = Fixture::new();
        let _scheduler = fixture.scheduler();
        let doc = python("/work/a.py");

        fixture.documents.save(&doc);
        settle().await;

        assert_eq!(
            fixture.engine.calls(),
            vec![LintCall::Document(doc.uri, LintReason::Saved)]
        );
        assert!(fixture.linters.lookups().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_other_language_checks_config_files() {
        let fixture = Fixture::new();
        let scheduler = fixture.scheduler();
        let doc = TextDocument::from_path("/work/setup.cfg", "ini").unwrap();

        fixture.documents.save(&doc);
        settle().await;

        assert_eq!(fixture.linters.lookups(), vec![(true, Some(doc.uri.clone()))]);
        assert!(fixture.engine.calls().is_empty());
        assert_eq!(scheduler.pending_timers(), 1);

        tokio::time::sleep(Duration::from_millis(1001)).await;
        settle().await;

        assert_eq!(
            fixture.engine.calls(),
            vec![LintCall::OpenFiles(LintReason::ConfigFileSaved)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_config_file_rescan_waits_for_delay() {
        let fixture = Fixture::new();
        fixture.configuration.set_default(LintSettings {
            enabled: false,
            lint_on_save: true,
        });
        let _scheduler = fixture.scheduler();

        fixture.documents.save(&python("/work/.FLAKE8"));
        settle().await;
        assert!(fixture.engine.calls().is_empty());

        tokio::time::advance(Duration::from_millis(999)).await;
        settle().await;
        assert!(fixture.engine.calls().is_empty());

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(
            fixture.engine.calls(),
            vec![LintCall::OpenFiles(LintReason::ConfigFileSaved)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_disabled_non_config_file_does_nothing() {
        let fixture = Fixture::new();
        fixture.configuration.set_default(LintSettings {
            enabled: false,
            lint_on_save: true,
        });
        let scheduler = fixture.scheduler();

        fixture.documents.save(&python("/work/a.py"));
        settle().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        settle().await;

        assert_eq!(fixture.linters.lookups().len(), 1);
        assert!(fixture.engine.calls().is_empty());
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_with_lint_on_save_off_uses_per_uri_settings() {
        let fixture = Fixture::new();
        let doc = python("/work/a.py");
        fixture.configuration.set(
            &doc.uri,
            LintSettings {
                enabled: true,
                lint_on_save: false,
            },
        );
        let _scheduler = fixture.scheduler();

        fixture.documents.save(&doc);
        fixture.documents.save(&python("/work/b.py"));
        settle().await;

        assert_eq!(
            fixture.engine.calls(),
            vec![LintCall::Document(
                python("/work/b.py").uri,
                LintReason::Saved
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_linter_lookup_failure_is_swallowed() {
        let fixture = Fixture::new();
        fixture.linters.fail_lookups(true);
        let scheduler = fixture.scheduler();

        fixture
            .documents
            .save(&TextDocument::from_path("/work/tox.ini", "ini").unwrap());
        settle().await;

        assert_eq!(fixture.linters.lookups().len(), 1);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[tokio::test]
    async fn test_close_clears_when_last_editor_closes() {
        let fixture = Fixture::new();
        let _scheduler = fixture.scheduler();
        let doc = python("/work/a.py");
        fixture.documents.open(doc.clone());
        fixture.documents.open(doc.clone());

        fixture.documents.close(&doc);
        assert!(fixture.engine.cleared().is_empty());

        fixture.documents.close(&doc);
        assert_eq!(fixture.engine.cleared(), vec![doc.uri]);
    }

    #[tokio::test]
    async fn test_close_without_path_is_ignored() {
        let fixture = Fixture::new();
        let _scheduler = fixture.scheduler();
        let doc = TextDocument::new(Url::parse("output:").unwrap(), "log");

        fixture.documents.close(&doc);

        assert!(fixture.engine.cleared().is_empty());
    }

    #[tokio::test]
    async fn test_configuration_change_relints_affected_documents() {
        let fixture = Fixture::new();
        let _scheduler = fixture.scheduler();
        let a = python("/work/a/a.py");
        let b = python("/other/b.py");
        fixture.documents.open(a.clone());
        fixture.documents.open(b.clone());
        settle().await;
        fixture.engine.reset();

        fixture
            .workspace
            .change_configuration(SectionChange::new("python.linting").scoped_to(&a.uri));
        settle().await;

        assert_eq!(
            fixture.engine.calls(),
            vec![LintCall::Document(a.uri, LintReason::ConfigurationChanged)]
        );
    }

    #[tokio::test]
    async fn test_configuration_change_failure_isolated() {
        let fixture = Fixture::new();
        let _scheduler = fixture.scheduler();
        let a = python("/work/a.py");
        let b = python("/work/b.py");
        fixture.documents.open(a.clone());
        fixture.documents.open(b.clone());
        settle().await;
        fixture.engine.reset();
        fixture.engine.fail_all(true);

        fixture
            .workspace
            .change_configuration(SectionChange::new("python.linting"));
        settle().await;

        let calls = fixture.engine.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&LintCall::Document(a.uri, LintReason::ConfigurationChanged)));
        assert!(calls.contains(&LintCall::Document(b.uri, LintReason::ConfigurationChanged)));
    }

    #[tokio::test]
    async fn test_unrelated_configuration_change_is_ignored() {
        let fixture = Fixture::new();
        let _scheduler = fixture.scheduler();
        fixture.documents.open(python("/work/a.py"));
        settle().await;
        fixture.engine.reset();

        fixture
            .workspace
            .change_configuration(SectionChange::new("editor.fontSize"));
        settle().await;

        assert!(fixture.engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_interpreter_change_lints_open_files() {
        let fixture = Fixture::new();
        let _scheduler = fixture.scheduler();

        fixture.interpreters.change_interpreter();
        settle().await;

        assert_eq!(
            fixture.engine.calls(),
            vec![LintCall::OpenFiles(LintReason::InterpreterChanged)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_pass_runs_after_delay() {
        let fixture = Fixture::new();
        let config = LintSchedulerConfig {
            run_startup_pass: true,
            ..config()
        };
        let scheduler = LintScheduler::new(fixture.services(), config).unwrap();

        tokio::time::advance(Duration::from_millis(1100)).await;
        settle().await;
        assert!(fixture.engine.calls().is_empty());
        assert_eq!(scheduler.pending_timers(), 1);

        tokio::time::advance(Duration::from_millis(200)).await;
        settle().await;
        assert_eq!(
            fixture.engine.calls(),
            vec![LintCall::OpenFiles(LintReason::Startup)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_pass_disabled() {
        let fixture = Fixture::new();
        let scheduler = fixture.scheduler();

        tokio::time::sleep(Duration::from_secs(5)).await;
        settle().await;

        assert_eq!(scheduler.pending_timers(), 0);
        assert!(fixture.engine.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_cancels_startup_pass() {
        let fixture = Fixture::new();
        let config = LintSchedulerConfig {
            run_startup_pass: true,
            ..config()
        };
        let scheduler = LintScheduler::new(fixture.services(), config).unwrap();
        assert_eq!(scheduler.pending_timers(), 1);

        scheduler.dispose();
        tokio::time::sleep(Duration::from_secs(5)).await;
        settle().await;

        assert!(!fixture
            .engine
            .calls()
            .contains(&LintCall::OpenFiles(LintReason::Startup)));
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_cancels_pending_rescan() {
        let fixture = Fixture::new();
        let scheduler = fixture.scheduler();

        fixture
            .documents
            .save(&TextDocument::from_path("/work/.flake8", "plaintext").unwrap());
        settle().await;
        assert_eq!(scheduler.pending_timers(), 1);

        scheduler.dispose();
        tokio::time::sleep(Duration::from_secs(5)).await;
        settle().await;

        assert!(fixture.engine.calls().is_empty());
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[tokio::test]
    async fn test_dispose_releases_subscriptions() {
        let fixture = Fixture::new();
        let scheduler = fixture.scheduler();
        assert_eq!(fixture.documents.listener_count(), 3);
        assert_eq!(fixture.workspace.listener_count(), 1);
        assert_eq!(fixture.interpreters.listener_count(), 1);

        scheduler.dispose();
        scheduler.dispose();

        assert!(scheduler.is_disposed());
        assert_eq!(fixture.documents.listener_count(), 0);
        assert_eq!(fixture.workspace.listener_count(), 0);
        assert_eq!(fixture.interpreters.listener_count(), 0);

        fixture.documents.open(python("/work/a.py"));
        settle().await;
        assert!(fixture.engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_drop_disposes() {
        let fixture = Fixture::new();
        let scheduler = fixture.scheduler();
        drop(scheduler);

        assert_eq!(fixture.documents.listener_count(), 0);
    }
}
