//! Contracts of the editor services the lint scheduler listens to and drives.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use lintterm_core::{LintSettings, Result, Subscription, TextDocument, Url};

/// Why a lint pass was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LintReason {
    /// A document was opened
    Opened,
    /// A document was saved with lint-on-save enabled
    Saved,
    /// Lint configuration changed for the document
    ConfigurationChanged,
    /// The active interpreter changed
    InterpreterChanged,
    /// A linter configuration file was saved
    ConfigFileSaved,
    /// Initial pass after activation
    Startup,
}

impl LintReason {
    /// Short lowercase name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            LintReason::Opened => "opened",
            LintReason::Saved => "saved",
            LintReason::ConfigurationChanged => "configuration-changed",
            LintReason::InterpreterChanged => "interpreter-changed",
            LintReason::ConfigFileSaved => "config-file-saved",
            LintReason::Startup => "startup",
        }
    }
}

impl fmt::Display for LintReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An active linter and the configuration files it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinterInfo {
    /// Linter name
    pub name: String,
    /// Basenames of the configuration files the linter watches
    pub config_file_names: Vec<String>,
}

impl LinterInfo {
    /// Describe a linter.
    pub fn new<I, S>(name: impl Into<String>, config_file_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            config_file_names: config_file_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `basename` names one of this linter's configuration files,
    /// ignoring case.
    pub fn watches_config_file(&self, basename: &str) -> bool {
        self.config_file_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(basename))
    }
}

/// Callback for document lifecycle notifications.
pub type DocumentListener = Box<dyn Fn(&TextDocument) + Send + Sync>;

/// Tracks the documents open in the editor.
pub trait DocumentManager: Send + Sync {
    /// Every open document, once per URI.
    fn text_documents(&self) -> Vec<TextDocument>;

    /// Whether any editor still has `uri` open.
    fn is_document_open(&self, uri: &Url) -> bool;

    /// Listen for documents being opened.
    fn on_did_open_text_document(&self, listener: DocumentListener) -> Subscription;

    /// Listen for documents being saved.
    fn on_did_save_text_document(&self, listener: DocumentListener) -> Subscription;

    /// Listen for documents being closed.
    fn on_did_close_text_document(&self, listener: DocumentListener) -> Subscription;
}

/// A configuration change notification.
pub trait ConfigurationChange: Send + Sync {
    /// Whether the change touches `section`, optionally as seen from `scope`.
    fn affects_configuration(&self, section: &str, scope: Option<&Url>) -> bool;
}

/// Callback for configuration changes.
pub type ConfigurationChangeListener = Box<dyn Fn(&Arc<dyn ConfigurationChange>) + Send + Sync>;

/// Workspace-level events.
pub trait WorkspaceService: Send + Sync {
    /// Listen for configuration changes.
    fn on_did_change_configuration(&self, listener: ConfigurationChangeListener) -> Subscription;
}

/// Reads lint settings.
pub trait ConfigurationService: Send + Sync {
    /// Lint settings in effect for `resource`.
    fn lint_settings(&self, resource: Option<&Url>) -> LintSettings;
}

/// Knows which linters are active.
#[async_trait]
pub trait LinterManager: Send + Sync {
    /// Linters active for `resource`; `force_refresh` bypasses any cache.
    async fn active_linters(
        &self,
        force_refresh: bool,
        resource: Option<&Url>,
    ) -> Result<Vec<LinterInfo>>;
}

/// Runs lint passes and owns their diagnostics.
#[async_trait]
pub trait LintingEngine: Send + Sync {
    /// Lint one document.
    async fn lint_document(&self, document: &TextDocument, reason: LintReason) -> Result<()>;

    /// Lint every open document.
    async fn lint_open_files(&self, reason: LintReason) -> Result<()>;

    /// Drop the diagnostics published for `document`.
    fn clear_diagnostics(&self, document: &TextDocument);
}

/// Callback for interpreter changes.
pub type InterpreterListener = Box<dyn Fn() + Send + Sync>;

/// Reports changes of the active interpreter.
pub trait InterpreterService: Send + Sync {
    /// Listen for the active interpreter changing.
    fn on_did_change_interpreter(&self, listener: InterpreterListener) -> Subscription;
}
