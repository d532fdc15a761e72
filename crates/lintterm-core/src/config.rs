//! Configuration types for lintterm.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::Error;

/// Environment variable that marks a test run; the startup lint pass is
/// skipped while it is set.
pub const TEST_EXECUTION_ENV: &str = "LINTTERM_CI_TEST";

/// Returns true when running under test execution.
pub fn is_test_execution() -> bool {
    std::env::var_os(TEST_EXECUTION_ENV).is_some()
}

/// Extension configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Terminal settings
    pub terminal: TerminalSettings,
    /// Linting settings
    pub linting: LintingSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl ExtensionConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration: path={}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: ExtensionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        if self.terminal.title.trim().is_empty() {
            return Err(Error::Config("terminal.title cannot be empty".to_string()));
        }

        if self.terminal.max_terminals == 0 {
            return Err(Error::Config(
                "terminal.max_terminals must be > 0".to_string(),
            ));
        }

        if self.linting.language_id.trim().is_empty() {
            return Err(Error::Config(
                "linting.language_id cannot be empty".to_string(),
            ));
        }

        if self.linting.config_section.trim().is_empty() {
            return Err(Error::Config(
                "linting.config_section cannot be empty".to_string(),
            ));
        }

        self.logging.validate()
    }
}

/// Terminal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalSettings {
    /// Title given to terminals created by the extension
    pub title: String,
    /// Shell executable override (falls back to the platform default)
    pub shell_path: Option<String>,
    /// Maximum number of cached terminal services
    pub max_terminals: usize,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            title: "Python".to_string(),
            shell_path: None,
            max_terminals: 16,
        }
    }
}

/// Linting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LintingSettings {
    /// Language id of documents the linters target
    pub language_id: String,
    /// Configuration namespace whose changes trigger a re-lint
    pub config_section: String,
    /// Delay before the startup lint pass in milliseconds
    pub startup_delay_ms: u64,
    /// Delay before re-linting after a linter config file is saved
    pub config_rescan_delay_ms: u64,
    /// Whether to lint already-open documents shortly after activation
    pub run_startup_pass: bool,
}

impl Default for LintingSettings {
    fn default() -> Self {
        Self {
            language_id: "python".to_string(),
            config_section: "python.linting".to_string(),
            startup_delay_ms: 1200,
            config_rescan_delay_ms: 1000,
            run_startup_pass: true,
        }
    }
}

impl LintingSettings {
    /// Startup delay as a [`Duration`].
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Config-file rescan delay as a [`Duration`].
    pub fn config_rescan_delay(&self) -> Duration {
        Duration::from_millis(self.config_rescan_delay_ms)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingSettings {
    const LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];

    /// Validate the configured level.
    pub fn validate(&self) -> crate::Result<()> {
        let level = self.level.to_ascii_lowercase();
        if !Self::LEVELS.contains(&level.as_str()) {
            return Err(Error::Config(format!(
                "logging.level '{}' is not one of {:?}",
                self.level,
                Self::LEVELS
            )));
        }
        Ok(())
    }
}

/// Per-location linting switches reported by the configuration service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintSettings {
    /// Linting enabled at all
    pub enabled: bool,
    /// Lint documents when they are saved
    pub lint_on_save: bool,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            lint_on_save: true,
        }
    }
}
