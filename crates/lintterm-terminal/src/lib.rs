//! # lintterm-terminal
//!
//! Terminal sessions for the lintterm services.
//!
//! This crate provides:
//! - Contracts of the editor's terminal host and environment activator
//! - The default shell helper
//! - `TerminalService`: one lazily created, environment-activated terminal
//! - `TerminalServiceFactory`: services cached per title and resource
//! - In-memory host doubles for tests
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends only on lintterm-core.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod factory;
pub mod helper;
pub mod host;
pub mod service;
pub mod testing;

// Re-export commonly used types
pub use factory::{TerminalServiceFactory, TerminalServiceFactoryConfig, TerminalServiceInfo};
pub use helper::ShellTerminalHelper;
pub use host::{
    Terminal, TerminalActivator, TerminalCloseListener, TerminalHelper, TerminalManager,
};
pub use lintterm_core::Disposable;
pub use service::{TerminalService, TerminalServices};
