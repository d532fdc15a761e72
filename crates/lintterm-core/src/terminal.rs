//! Terminal identity and creation options.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a host terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerminalId(Uuid);

impl TerminalId {
    /// Create a new random terminal ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for TerminalId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for TerminalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TerminalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options passed to the terminal host when creating a terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalOptions {
    /// Display name of the terminal
    pub name: String,
    /// Shell executable (host default when absent)
    pub shell_path: Option<String>,
}

impl TerminalOptions {
    /// Options for a terminal with the given name and host defaults otherwise.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
