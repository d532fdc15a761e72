//! In-memory editor services for exercising the lint scheduler.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use lintterm_core::{Emitter, Error, LintSettings, Result, Subscription, TextDocument, Url};

use crate::host::{
    ConfigurationChange, ConfigurationChangeListener, ConfigurationService, DocumentListener,
    DocumentManager, InterpreterListener, InterpreterService, LintReason, LinterInfo,
    LinterManager, LintingEngine, WorkspaceService,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Open editors, one entry per editor; a URI may be open more than once.
#[derive(Debug, Default)]
pub struct InMemoryDocuments {
    editors: Mutex<Vec<TextDocument>>,
    opened: Emitter<TextDocument>,
    saved: Emitter<TextDocument>,
    closed: Emitter<TextDocument>,
}

impl InMemoryDocuments {
    /// No open documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `document` in a new editor.
    pub fn open(&self, document: TextDocument) {
        lock(&self.editors).push(document.clone());
        self.opened.fire(&document);
    }

    /// Save `document`.
    pub fn save(&self, document: &TextDocument) {
        self.saved.fire(document);
    }

    /// Close one editor showing `document`.
    pub fn close(&self, document: &TextDocument) {
        {
            let mut editors = lock(&self.editors);
            if let Some(index) = editors.iter().position(|open| open.uri == document.uri) {
                editors.remove(index);
            }
        }
        self.closed.fire(document);
    }

    /// Listeners across the open, save and close channels.
    pub fn listener_count(&self) -> usize {
        self.opened.listener_count() + self.saved.listener_count() + self.closed.listener_count()
    }
}

impl DocumentManager for InMemoryDocuments {
    fn text_documents(&self) -> Vec<TextDocument> {
        let mut unique: Vec<TextDocument> = Vec::new();
        for document in lock(&self.editors).iter() {
            if !unique.iter().any(|seen| seen.uri == document.uri) {
                unique.push(document.clone());
            }
        }
        unique
    }

    fn is_document_open(&self, uri: &Url) -> bool {
        lock(&self.editors).iter().any(|open| &open.uri == uri)
    }

    fn on_did_open_text_document(&self, listener: DocumentListener) -> Subscription {
        self.opened.subscribe(move |document| listener(document))
    }

    fn on_did_save_text_document(&self, listener: DocumentListener) -> Subscription {
        self.saved.subscribe(move |document| listener(document))
    }

    fn on_did_close_text_document(&self, listener: DocumentListener) -> Subscription {
        self.closed.subscribe(move |document| listener(document))
    }
}

/// A change to one configuration section, optionally limited to resources.
#[derive(Debug, Clone)]
pub struct SectionChange {
    section: String,
    resources: Vec<Url>,
}

impl SectionChange {
    /// Change of `section` for every resource.
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            resources: Vec::new(),
        }
    }

    /// Limit the change to `resource` (cumulative).
    pub fn scoped_to(mut self, resource: &Url) -> Self {
        self.resources.push(resource.clone());
        self
    }
}

impl ConfigurationChange for SectionChange {
    /// A change to `a.b.c` affects `a`, `a.b` and `a.b.c`.
    fn affects_configuration(&self, section: &str, scope: Option<&Url>) -> bool {
        let section_matches = self.section == section
            || self
                .section
                .strip_prefix(section)
                .is_some_and(|rest| rest.starts_with('.'));
        let scope_matches = match scope {
            Some(resource) if !self.resources.is_empty() => self.resources.contains(resource),
            _ => true,
        };
        section_matches && scope_matches
    }
}

/// Workspace that fires configuration changes on request.
#[derive(Debug, Default)]
pub struct RecordingWorkspace {
    changed: Emitter<Arc<dyn ConfigurationChange>>,
}

impl RecordingWorkspace {
    /// Workspace with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire a configuration change.
    pub fn change_configuration(&self, change: impl ConfigurationChange + 'static) {
        let change: Arc<dyn ConfigurationChange> = Arc::new(change);
        self.changed.fire(&change);
    }

    /// Number of configuration listeners.
    pub fn listener_count(&self) -> usize {
        self.changed.listener_count()
    }
}

impl WorkspaceService for RecordingWorkspace {
    fn on_did_change_configuration(&self, listener: ConfigurationChangeListener) -> Subscription {
        self.changed.subscribe(move |change| listener(change))
    }
}

/// Lint settings with optional per-URI overrides.
#[derive(Debug)]
pub struct StaticConfiguration {
    default: Mutex<LintSettings>,
    overrides: Mutex<HashMap<Url, LintSettings>>,
}

impl StaticConfiguration {
    /// Configuration returning `default` everywhere.
    pub fn new(default: LintSettings) -> Self {
        Self {
            default: Mutex::new(default),
            overrides: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the settings used where no override applies.
    pub fn set_default(&self, settings: LintSettings) {
        *lock(&self.default) = settings;
    }

    /// Override the settings for `uri`.
    pub fn set(&self, uri: &Url, settings: LintSettings) {
        lock(&self.overrides).insert(uri.clone(), settings);
    }
}

impl ConfigurationService for StaticConfiguration {
    fn lint_settings(&self, resource: Option<&Url>) -> LintSettings {
        resource
            .and_then(|uri| lock(&self.overrides).get(uri).copied())
            .unwrap_or_else(|| *lock(&self.default))
    }
}

/// Linter manager with a fixed set of active linters.
#[derive(Debug, Default)]
pub struct StaticLinterManager {
    linters: Vec<LinterInfo>,
    lookups: Mutex<Vec<(bool, Option<Url>)>>,
    fail: AtomicBool,
}

impl StaticLinterManager {
    /// Manager reporting `linters` as active.
    pub fn new(linters: Vec<LinterInfo>) -> Self {
        Self {
            linters,
            ..Self::default()
        }
    }

    /// Make every lookup fail.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every lookup as `(force_refresh, resource)`.
    pub fn lookups(&self) -> Vec<(bool, Option<Url>)> {
        lock(&self.lookups).clone()
    }
}

#[async_trait]
impl LinterManager for StaticLinterManager {
    async fn active_linters(
        &self,
        force_refresh: bool,
        resource: Option<&Url>,
    ) -> Result<Vec<LinterInfo>> {
        lock(&self.lookups).push((force_refresh, resource.cloned()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::LinterLookup("linter manager unavailable".to_string()));
        }
        Ok(self.linters.clone())
    }
}

/// One recorded lint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintCall {
    /// `lint_document` for a URI
    Document(Url, LintReason),
    /// `lint_open_files`
    OpenFiles(LintReason),
}

/// Engine that records requests and can be told to fail them.
#[derive(Debug, Default)]
pub struct RecordingLintingEngine {
    calls: Mutex<Vec<LintCall>>,
    cleared: Mutex<Vec<Url>>,
    fail: AtomicBool,
}

impl RecordingLintingEngine {
    /// Engine whose requests succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every lint request fail (still recorded).
    pub fn fail_all(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Lint requests so far, in order.
    pub fn calls(&self) -> Vec<LintCall> {
        lock(&self.calls).clone()
    }

    /// URIs whose diagnostics were cleared.
    pub fn cleared(&self) -> Vec<Url> {
        lock(&self.cleared).clone()
    }

    /// Forget recorded requests.
    pub fn reset(&self) {
        lock(&self.calls).clear();
        lock(&self.cleared).clear();
    }

    fn record(&self, call: LintCall) -> Result<()> {
        lock(&self.calls).push(call);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Lint("linter crashed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LintingEngine for RecordingLintingEngine {
    async fn lint_document(&self, document: &TextDocument, reason: LintReason) -> Result<()> {
        self.record(LintCall::Document(document.uri.clone(), reason))
    }

    async fn lint_open_files(&self, reason: LintReason) -> Result<()> {
        self.record(LintCall::OpenFiles(reason))
    }

    fn clear_diagnostics(&self, document: &TextDocument) {
        lock(&self.cleared).push(document.uri.clone());
    }
}

/// Interpreter service that fires changes on request.
#[derive(Debug, Default)]
pub struct RecordingInterpreterService {
    changed: Emitter<()>,
}

impl RecordingInterpreterService {
    /// Service with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire an interpreter change.
    pub fn change_interpreter(&self) {
        self.changed.fire(&());
    }

    /// Number of interpreter listeners.
    pub fn listener_count(&self) -> usize {
        self.changed.listener_count()
    }
}

impl InterpreterService for RecordingInterpreterService {
    fn on_did_change_interpreter(&self, listener: InterpreterListener) -> Subscription {
        self.changed.subscribe(move |_| listener())
    }
}
