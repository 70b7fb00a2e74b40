//! Input classification for the interactive loop.
//!
//! Each line of input is one of: a colon-prefixed meta-command operating on
//! session state, a double-colon escape to the host shell, a named loop
//! command (prompt and color customization), chat text for the completion
//! service, or nothing at all.

use crate::repl::render::Color;

/// A classified line of REPL input.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplInput {
    /// A meta-command that reads or mutates session state.
    Meta(MetaCommand),

    /// A named loop command customizing the prompt or colors.
    Command(LoopCommand),

    /// A literal command for the host operating-system shell.
    Shell(String),

    /// Chat text forwarded to the completion service.
    Chat(String),

    /// An empty line; nothing to do.
    Empty,
}

/// A parsed meta-command.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaCommand {
    /// Show the last choice's metadata with its text stripped.
    Check,

    /// Write a coerced value into the live parameter mapping.
    Set {
        /// The parameter name.
        key: String,
        /// The raw value, coerced by the session to the key's declared type.
        value: String,
    },

    /// Show the last full structured response.
    Response,

    /// Show the current resolved parameter mapping.
    Configurations,

    /// Show usage text.
    Help,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Which font a `font_color` command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontTarget {
    /// The color user input is typed in.
    Input,
    /// The color completions are rendered in.
    Output,
}

/// A parsed loop command.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopCommand {
    /// Change the interactive prompt string.
    Prompt(String),

    /// Change the input or output font color.
    FontColor {
        /// Which font to recolor.
        target: FontTarget,
        /// The new color.
        color: Color,
    },

    /// Change the console background color.
    BackgroundColor(Color),

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// The registered meta-command names.
const META_NAMES: &[&str] = &[":check", ":set", ":response", ":configurations", ":help"];

/// The registered loop-command names.
const LOOP_NAMES: &[&str] = &["prompt", "font_color", "background_color"];

/// Classify one raw line of input.
///
/// Checked in order: a first token matching a registered meta-command name
/// dispatches as [`ReplInput::Meta`]; a leading double colon dispatches the
/// trimmed remainder as [`ReplInput::Shell`]; a first token matching a loop
/// command dispatches as [`ReplInput::Command`]; any other non-empty line is
/// chat.  A single-colon token that is not a registered name is not special;
/// it falls through to chat like any other text.
pub fn classify(line: &str) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }

    let first = line.split_whitespace().next().expect("line is non-empty");
    if META_NAMES.contains(&first) {
        return ReplInput::Meta(parse_meta(first, line));
    }

    if let Some(rest) = line.strip_prefix("::") {
        return ReplInput::Shell(rest.trim().to_string());
    }

    if LOOP_NAMES.contains(&first) {
        return ReplInput::Command(parse_loop(first, line));
    }

    ReplInput::Chat(line.to_string())
}

fn parse_meta(name: &str, line: &str) -> MetaCommand {
    match name {
        ":check" => MetaCommand::Check,
        ":response" => MetaCommand::Response,
        ":configurations" => MetaCommand::Configurations,
        ":help" => MetaCommand::Help,
        ":set" => {
            let rest = line[name.len()..].trim();
            let mut parts = rest.splitn(2, ' ');
            let key = parts.next().map(str::trim).filter(|s| !s.is_empty());
            let value = parts.next().map(str::trim).filter(|s| !s.is_empty());
            match (key, value) {
                (Some(key), Some(value)) => MetaCommand::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                _ => MetaCommand::Invalid(
                    ":set requires a parameter name and a value".to_string(),
                ),
            }
        }
        _ => unreachable!("only registered names reach parse_meta"),
    }
}

fn parse_loop(name: &str, line: &str) -> LoopCommand {
    let rest = line[name.len()..].trim();
    match name {
        "prompt" => {
            if rest.is_empty() {
                LoopCommand::Invalid("prompt requires the new prompt text".to_string())
            } else {
                LoopCommand::Prompt(rest.to_string())
            }
        }
        "font_color" => {
            let mut parts = rest.splitn(2, ' ');
            let target = match parts.next().map(str::trim) {
                Some("input") => FontTarget::Input,
                Some("output") => FontTarget::Output,
                _ => {
                    return LoopCommand::Invalid(
                        "font_color requires a target: input or output".to_string(),
                    );
                }
            };
            match parts.next().map(str::trim).filter(|s| !s.is_empty()) {
                Some(color) => match color.parse::<Color>() {
                    Ok(color) => LoopCommand::FontColor { target, color },
                    Err(err) => LoopCommand::Invalid(err),
                },
                None => LoopCommand::Invalid("font_color requires a color name".to_string()),
            }
        }
        "background_color" => {
            if rest.is_empty() {
                return LoopCommand::Invalid(
                    "background_color requires a color name".to_string(),
                );
            }
            match rest.parse::<Color>() {
                Ok(color) => LoopCommand::BackgroundColor(color),
                Err(err) => LoopCommand::Invalid(err),
            }
        }
        _ => unreachable!("only registered names reach parse_loop"),
    }
}

/// Returns help text describing the command set.
pub fn help_text() -> &'static str {
    r#"The special character is `:`
  Inputs without it are sent to the completion service as the prompt.

Meta-commands (single leading colon):
  :check             Show the last choice's metadata, text stripped
  :set <key> <val>   Update a request parameter; keys: model, prompt,
                     temperature, max_tokens, top_p, frequency_penalty,
                     presence_penalty
  :response          Show the last full structured response
  :configurations    Show the current request parameters
  :help              Show this help message

Loop commands:
  prompt <text>                     Change the interactive prompt
  font_color input|output <color>   Set the input or output font color
  background_color <color>          Set the console background color
  Colors: cyan, red, green, yellow, blue, magenta, black, reset

Shell escape (double colon, unsandboxed, runs in the host shell):
  ::<command>        e.g. ::ls -l"#
}
