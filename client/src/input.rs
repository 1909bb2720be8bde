//! Typed command parsing for the terminal client

use shared::Action;

/// Something the user asked the client to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Send(Action),
    Help,
    Quit,
}

pub const HELP: &str = "Commands: buzz (or b / empty line), reset (r), help (h), quit (q)";

/// Parses one line of user input
///
/// An empty line buzzes, so players can just hit Enter.
pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "b" | "buzz" => Some(Command::Send(Action::Buzz)),
        "r" | "reset" => Some(Command::Send(Action::Reset)),
        "h" | "help" | "?" => Some(Command::Help),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}
