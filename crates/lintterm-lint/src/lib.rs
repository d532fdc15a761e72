//! # lintterm-lint
//!
//! Document-lifecycle lint scheduling for the lintterm services.
//!
//! This crate provides:
//! - Contracts of the editor services linting depends on (documents,
//!   workspace configuration, linters, lint engine, interpreters)
//! - `LintScheduler`: decides which lint passes editor events trigger
//! - In-memory editor doubles for tests
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends only on lintterm-core.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod host;
pub mod scheduler;
pub mod testing;

// Re-export commonly used types
pub use host::{
    ConfigurationChange, ConfigurationChangeListener, ConfigurationService, DocumentListener,
    DocumentManager, InterpreterListener, InterpreterService, LintReason, LinterInfo,
    LinterManager, LintingEngine, WorkspaceService,
};
pub use scheduler::{LintScheduler, LintSchedulerConfig, LintServices};
