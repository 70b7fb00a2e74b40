//! Output rendering for the interactive loop.
//!
//! The palette is a fixed set of colors usable as both foreground and
//! background.  A [`ColorScheme`] carries the active input/output/background
//! choices and knows how to apply itself to the terminal stream with ANSI
//! escape codes.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// ANSI escape code to reset the foreground to the terminal default.
const ANSI_RESET_FG: &str = "\x1b[39m";

/// A member of the fixed color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Cyan.
    Cyan,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Yellow.
    Yellow,
    /// Blue.
    Blue,
    /// Magenta.
    Magenta,
    /// Black.
    Black,
    /// The terminal's default color.
    #[default]
    Reset,
}

impl Color {
    /// Every palette member, in help-text order.
    pub const ALL: [Color; 8] = [
        Color::Cyan,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Black,
        Color::Reset,
    ];

    /// The ANSI escape code selecting this color as the foreground.
    pub fn fg_code(&self) -> &'static str {
        match self {
            Color::Cyan => "\x1b[36m",
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Magenta => "\x1b[35m",
            Color::Black => "\x1b[30m",
            Color::Reset => ANSI_RESET_FG,
        }
    }

    /// The ANSI escape code selecting this color as the background.
    pub fn bg_code(&self) -> &'static str {
        match self {
            Color::Cyan => "\x1b[46m",
            Color::Red => "\x1b[41m",
            Color::Green => "\x1b[42m",
            Color::Yellow => "\x1b[43m",
            Color::Blue => "\x1b[44m",
            Color::Magenta => "\x1b[45m",
            Color::Black => "\x1b[40m",
            Color::Reset => "\x1b[49m",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Cyan => write!(f, "cyan"),
            Color::Red => write!(f, "red"),
            Color::Green => write!(f, "green"),
            Color::Yellow => write!(f, "yellow"),
            Color::Blue => write!(f, "blue"),
            Color::Magenta => write!(f, "magenta"),
            Color::Black => write!(f, "black"),
            Color::Reset => write!(f, "reset"),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse a color name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error string listing the valid names if the color is not a
    /// palette member.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cyan" => Ok(Color::Cyan),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            "blue" => Ok(Color::Blue),
            "magenta" => Ok(Color::Magenta),
            "black" => Ok(Color::Black),
            "reset" => Ok(Color::Reset),
            _ => Err(format!(
                "Invalid color: {}. Valid options: cyan, red, green, yellow, blue, magenta, black, reset",
                s
            )),
        }
    }
}

/// The active color scheme: input and output font colors plus the console
/// background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    /// Font color for user input.
    pub input: Color,
    /// Font color for rendered completions.
    pub output: Color,
    /// Console background color.
    pub background: Color,
}

impl ColorScheme {
    /// Creates a scheme from explicit colors.
    pub fn new(input: Color, output: Color, background: Color) -> Self {
        Self {
            input,
            output,
            background,
        }
    }

    /// Re-applies the background and input colors to the terminal stream.
    ///
    /// Called at startup and again whenever a color-setting command succeeds.
    pub fn apply(&self) {
        print!("{}{}", self.background.bg_code(), self.input.fg_code());
        Self::flush();
    }

    /// Print a completed response in the output color.
    pub fn print_output(&self, text: &str) {
        println!("{}{}{}", self.output.fg_code(), text, ANSI_RESET_FG);
        Self::flush();
    }

    /// Print an informational message.
    pub fn print_info(&self, info: &str) {
        println!("{info}");
        Self::flush();
    }

    /// Print an error message.
    pub fn print_error(&self, error: &str) {
        eprintln!("Error: {error}");
    }

    /// Flushes stdout so escape codes take effect immediately.
    fn flush() {
        let _ = io::stdout().flush();
    }
}

impl Default for ColorScheme {
    /// The startup scheme: default input on a default background, cyan
    /// output.
    fn default() -> Self {
        Self {
            input: Color::Reset,
            output: Color::Cyan,
            background: Color::Reset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_palette_member() {
        for color in Color::ALL {
            assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
        }
        assert_eq!("CYAN".parse::<Color>().unwrap(), Color::Cyan);
    }

    #[test]
    fn rejects_non_members() {
        let err = "mauve".parse::<Color>().unwrap_err();
        assert!(err.contains("mauve"));
        assert!(err.contains("Valid options"));
    }

    #[test]
    fn foreground_and_background_codes_differ() {
        for color in Color::ALL {
            assert_ne!(color.fg_code(), color.bg_code());
        }
    }

    #[test]
    fn default_scheme_matches_startup_defaults() {
        let scheme = ColorScheme::default();
        assert_eq!(scheme.input, Color::Reset);
        assert_eq!(scheme.output, Color::Cyan);
        assert_eq!(scheme.background, Color::Reset);
    }
}
