//! Command parsing for the terminal's command line.
//!
//! This module parses command strings into structured [`Command`] values.

/// Parsed command from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Request a mode by number.
    Mode {
        /// Raw mode number.
        mode: i32,
    },

    /// Switch to the tab with this label.
    Tab {
        /// Tab label, matched ignoring case.
        name: String,
    },

    /// Request the off mode.
    Off,

    /// Request auto mode.
    Auto,

    /// Quit the application.
    Quit,

    /// Nothing was typed.
    Empty,

    /// Unknown or invalid command.
    Unknown {
        /// The original input.
        input: String,
    },

    /// Command with missing or invalid arguments.
    InvalidArgs {
        /// Command name.
        command: String,
        /// Error message.
        error: String,
    },
}

/// Parse a user input string into a command.
///
/// Commands start with `/`.
pub fn parse(input: &str) -> Command {
    let input = input.trim();

    if input.is_empty() || input == "/" {
        return Command::Empty;
    }

    let Some(cmd_str) = input.strip_prefix('/') else {
        return Command::Unknown { input: input.to_string() };
    };

    let parts: Vec<&str> = cmd_str.split_whitespace().collect();
    let command = parts.first().copied().unwrap_or("");

    match command {
        "mode" | "m" => match parts.get(1) {
            Some(raw) => match raw.parse::<i32>() {
                Ok(mode) => Command::Mode { mode },
                Err(_) => {
                    Command::InvalidArgs { command: "mode".into(), error: "Invalid mode".into() }
                },
            },
            None => Command::InvalidArgs {
                command: "mode".into(),
                error: "Usage: /mode <number>".into(),
            },
        },

        "tab" | "t" => {
            if parts.len() < 2 {
                return Command::InvalidArgs {
                    command: "tab".into(),
                    error: "Usage: /tab <name>".into(),
                };
            }
            Command::Tab { name: parts[1..].join(" ") }
        },

        "off" => Command::Off,

        "auto" => Command::Auto,

        "quit" | "q" => Command::Quit,

        _ => Command::Unknown { input: input.to_string() },
    }
}
