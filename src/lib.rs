// Public modules
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod repl;
pub mod types;

// Re-exports
pub use client::Completions;
pub use error::{Error, Result};
pub use types::*;
