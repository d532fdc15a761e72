//! # lintterm
//!
//! Terminal session and lint scheduling services for editor language
//! extensions.
//!
//! ## Overview
//!
//! An [`Extension`] is activated against the editor's services and provides:
//! - Terminal services that lazily create one environment-activated terminal
//!   each, cached per title and resource
//! - A lint scheduler reacting to document open/save/close, configuration
//!   changes, interpreter changes and startup
//!
//! ## Architecture
//!
//! This is Layer 2 - the facade that ties together:
//! - lintterm-core: Core types
//! - lintterm-terminal: Terminal sessions
//! - lintterm-lint: Lint scheduling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod extension;
pub mod logging;

// Re-export commonly used types
pub use context::DisposableRegistry;
pub use extension::{Extension, ExtensionServices};
pub use lintterm_core::{Disposable, Error, ExtensionConfig, Result};
