//! Interactive session engine.
//!
//! This module provides the stateful REPL built on top of the completion
//! client.  Each line of input is classified as chat text, a colon-prefixed
//! meta-command, a named loop command, or a double-colon escape to the host
//! shell, and dispatched against one process-wide [`Session`].
//!
//! # Architecture
//!
//! - [`commands`]: input classification, command enums, and help text
//! - [`render`]: the fixed color palette and ANSI output
//! - [`session`]: session state and the chat-turn path
//! - [`shell`]: host-shell passthrough

pub mod commands;
pub mod render;
pub mod session;
pub mod shell;

pub use commands::{FontTarget, LoopCommand, MetaCommand, ReplInput, classify, help_text};
pub use render::{Color, ColorScheme};
pub use session::Session;
