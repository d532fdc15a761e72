//! # lintterm-core
//!
//! Core types shared by the lintterm services.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other lintterm crates. It provides:
//!
//! - Error types
//! - YAML configuration and per-location lint settings
//! - Event emitters and disposable subscriptions
//! - Text documents and their paths
//! - Shell classification and command-line building
//! - Platform detection and terminal identity
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other lintterm crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod platform;
pub mod shell;
pub mod terminal;

// Re-export commonly used types
pub use config::{
    is_test_execution, ExtensionConfig, LintSettings, LintingSettings, LoggingSettings,
    TerminalSettings,
};
pub use document::TextDocument;
pub use error::{Error, Result};
pub use event::{Disposable, Emitter, Listener, Subscription};
pub use platform::Platform;
pub use shell::ShellType;
pub use terminal::{TerminalId, TerminalOptions};
pub use url::Url;
