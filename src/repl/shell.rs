//! Host-shell passthrough.
//!
//! Input prefixed with a double colon runs verbatim in the operating system's
//! command interpreter with stdio inherited.  Nothing is sandboxed, quoted,
//! or rewritten: the remainder of the line reaches the interpreter untouched,
//! so this surface is only as trustworthy as the person typing at it.

use std::process::{Command, ExitStatus};

use crate::error::{Error, Result};

/// Run `command` in the host shell and wait for it to finish.
///
/// # Errors
///
/// Returns an I/O error only when the interpreter itself cannot be spawned;
/// a command that runs and fails is reported through the returned status.
pub fn run(command: &str) -> Result<ExitStatus> {
    let status = if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", command]).status()
    } else {
        Command::new("sh").arg("-c").arg(command).status()
    };
    status.map_err(|err| Error::io(format!("failed to run shell command: {command}"), err))
}
