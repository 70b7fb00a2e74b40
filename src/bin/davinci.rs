//! Interactive terminal client for OpenAI-compatible completion services.
//!
//! This binary resolves a request payload from a built-in template, an
//! optional JSON configuration file, and command-line overrides, then drops
//! into a REPL where plain text is completed by the remote service.
//!
//! # Usage
//!
//! ```bash
//! # Start the REPL with defaults
//! davinci
//!
//! # Run one completion first, then stay interactive
//! davinci explain the difference between threads and processes
//!
//! # Pick a model and tighten sampling
//! davinci --model text-curie-001 --temperature 0.2
//!
//! # Use a configuration file and a key file
//! davinci --config request.json --key-path ~/.openai.key
//! ```
//!
//! # Commands
//!
//! While chatting, colon-prefixed meta-commands inspect and mutate session
//! state:
//! - `:check` - show the last choice's metadata, text stripped
//! - `:set <key> <value>` - update a request parameter
//! - `:response` - show the last full response
//! - `:configurations` - show the current request parameters
//! - `:help` - show usage text
//!
//! `prompt`, `font_color`, and `background_color` customize the loop, and a
//! double colon (`::ls`) runs the rest of the line in the host shell.

use std::path::Path;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use davinci::repl::{
    Color, ColorScheme, FontTarget, LoopCommand, MetaCommand, ReplInput, Session, classify,
    help_text, shell,
};
use davinci::{Completions, CompletionTemplate, config, credentials};

/// Default interactive prompt string.
const DEFAULT_PROMPT: &str = "davinci>> ";

/// Command-line arguments for the davinci tool.
#[derive(CommandLine, Debug, Default, PartialEq)]
struct Args {
    /// Model to use.
    #[arrrg(optional, "Model to use (default: text-davinci-003)", "MODEL")]
    model: Option<String>,

    /// Sampling temperature.
    #[arrrg(optional, "Randomness of the generated text (0.0-1.0)", "TEMP")]
    temperature: Option<f64>,

    /// Maximum tokens per completion.
    #[arrrg(optional, "Maximum number of tokens to generate", "TOKENS")]
    max_tokens: Option<u32>,

    /// Nucleus sampling threshold.
    #[arrrg(optional, "Sampling threshold during inference time", "TOP_P")]
    top_p: Option<f64>,

    /// Penalty against repeating tokens.
    #[arrrg(optional, "Chances of a word being repeated", "PENALTY")]
    frequency_penalty: Option<f64>,

    /// Penalty against repeating topics.
    #[arrrg(optional, "Chances of a topic being repeated", "PENALTY")]
    presence_penalty: Option<f64>,

    /// API key.
    #[arrrg(optional, "API key for the completion service", "KEY")]
    key: Option<String>,

    /// Path to a file whose contents are the API key.
    #[arrrg(optional, "Path to a text file containing the API key", "PATH")]
    key_path: Option<String>,

    /// Path to a JSON configuration file.
    #[arrrg(optional, "Use JSON-formatted configurations in PATH", "PATH")]
    config: Option<String>,

    /// Base URL for OpenAI-compatible endpoints.
    #[arrrg(optional, "Base URL of the completion service", "URL")]
    api_base: Option<String>,

    /// Font color for inputs.
    #[arrrg(optional, "Font color for inputs (default: reset)", "COLOR")]
    input_color: Option<String>,

    /// Font color for outputs.
    #[arrrg(optional, "Font color for outputs (default: cyan)", "COLOR")]
    output_color: Option<String>,

    /// Console background color.
    #[arrrg(optional, "Console background color (default: reset)", "COLOR")]
    background_color: Option<String>,

    /// Interactive prompt string.
    #[arrrg(optional, "Interactive prompt string", "PROMPT")]
    prompt_string: Option<String>,
}

// `CommandLine` requires `Eq`, which cannot be derived because `Args`
// contains `f64` fields. `Eq` is a marker trait with no methods, so it is
// implemented manually here on top of the derived `PartialEq`.
impl Eq for Args {}

/// Main entry point for the davinci terminal client.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line_relaxed("davinci [OPTIONS] [PROMPT...]");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Assemble the request payload: base (file or sample), then overrides.
    let mut overrides = CompletionTemplate::new();
    if let Some(model) = args.model.as_deref() {
        overrides = overrides.with_model(model);
    }
    if let Some(temperature) = args.temperature {
        overrides = overrides.with_temperature(temperature);
    }
    if let Some(max_tokens) = args.max_tokens {
        overrides = overrides.with_max_tokens(max_tokens);
    }
    if let Some(top_p) = args.top_p {
        overrides = overrides.with_top_p(top_p);
    }
    if let Some(frequency_penalty) = args.frequency_penalty {
        overrides = overrides.with_frequency_penalty(frequency_penalty);
    }
    if let Some(presence_penalty) = args.presence_penalty {
        overrides = overrides.with_presence_penalty(presence_penalty);
    }
    if !free.is_empty() {
        overrides = overrides.with_prompt(free.join(" "));
    }

    let mut params = match config::resolve(args.config.as_deref().map(Path::new), overrides) {
        Ok(params) => params,
        Err(err) => fatal(&err.to_string()),
    };

    let api_key = match credentials::resolve(
        &mut params,
        args.key.as_deref(),
        args.key_path.as_deref().map(Path::new),
    ) {
        Ok(api_key) => api_key,
        Err(err) => fatal(&err.to_string()),
    };

    let client = match Completions::with_options(api_key, args.api_base.clone(), None) {
        Ok(client) => client,
        Err(err) => fatal(&err.to_string()),
    };

    let scheme = ColorScheme::new(
        parse_color(args.input_color.as_deref(), Color::Reset),
        parse_color(args.output_color.as_deref(), Color::Cyan),
        parse_color(args.background_color.as_deref(), Color::Reset),
    );
    let prompt_string = args
        .prompt_string
        .clone()
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    let mut session = Session::new(client, params, scheme, prompt_string);
    session.scheme().apply();

    // SIGINT outside readline (e.g. mid-request) ends the whole process.
    ctrlc::set_handler(|| {
        println!("\nStopping program");
        std::process::exit(0);
    })?;

    println!("davinci (model: {})", session.params().model);
    println!("Type :help for commands\n");

    let mut rl = DefaultEditor::new()?;

    // A prompt on the command line runs one turn before the loop.
    if !free.is_empty() {
        chat_turn(&mut session, &free.join(" ")).await;
    }

    loop {
        let prompt = session.prompt_text().to_string();
        let readline = rl.readline(&prompt);

        match readline {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                dispatch(&mut session, &line).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!("Stopping program");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("End of input, goodbye");
                break;
            }
            Err(err) => {
                session
                    .scheme()
                    .print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

/// Classify one line and run it against the session.
///
/// Every per-turn failure is rendered and logged here; nothing escapes to end
/// the loop.
async fn dispatch(session: &mut Session, line: &str) {
    match classify(line) {
        ReplInput::Empty => {}
        ReplInput::Meta(meta) => match meta {
            MetaCommand::Check => {
                if let Some(metadata) = session.check() {
                    let rendered = serde_json::to_string_pretty(&metadata)
                        .unwrap_or_else(|_| metadata.to_string());
                    session.scheme().print_output(&rendered);
                }
            }
            MetaCommand::Set { key, value } => match session.set_parameter(&key, &value) {
                Ok(()) => session.scheme().print_info("ok"),
                Err(err) => session.scheme().print_error(&err.to_string()),
            },
            MetaCommand::Response => {
                if let Some(rendered) = session.response_pretty() {
                    session.scheme().print_output(&rendered);
                }
            }
            MetaCommand::Configurations => {
                let rendered = session.configurations_pretty();
                session.scheme().print_output(&rendered);
            }
            MetaCommand::Help => session.scheme().print_info(help_text()),
            MetaCommand::Invalid(message) => session.scheme().print_error(&message),
        },
        ReplInput::Command(command) => match command {
            LoopCommand::Prompt(text) => session.set_prompt_text(text),
            LoopCommand::FontColor { target, color } => {
                match target {
                    FontTarget::Input => session.scheme_mut().input = color,
                    FontTarget::Output => session.scheme_mut().output = color,
                }
                session.scheme().apply();
            }
            LoopCommand::BackgroundColor(color) => {
                session.scheme_mut().background = color;
                session.scheme().apply();
            }
            LoopCommand::Invalid(message) => session.scheme().print_error(&message),
        },
        ReplInput::Shell(command) => {
            if command.is_empty() {
                session
                    .scheme()
                    .print_error("the shell escape requires a command, e.g. ::ls");
            } else if let Err(err) = shell::run(&command) {
                tracing::error!(%err, %command, "shell passthrough failed");
                session.scheme().print_error(&err.to_string());
            }
        }
        ReplInput::Chat(text) => chat_turn(session, &text).await,
    }
}

/// Run one completion turn and render the outcome.
async fn chat_turn(session: &mut Session, text: &str) {
    match session.complete(text).await {
        Ok(choice) => {
            let text = choice.text.unwrap_or_default();
            session.scheme().print_output(&text);
        }
        Err(err) => {
            tracing::error!(%err, "completion failed");
            session.scheme().print_error(&err.to_string());
        }
    }
}

/// Parse a color flag, exiting with a diagnostic on a non-palette name.
fn parse_color(flag: Option<&str>, default: Color) -> Color {
    match flag {
        Some(name) => match name.parse::<Color>() {
            Ok(color) => color,
            Err(err) => fatal(&err),
        },
        None => default,
    }
}

/// Report a startup failure and exit non-zero.
fn fatal(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}
