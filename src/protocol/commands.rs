//! Module `commands`
//!
//! Defines the command parsing logic and the data structures used to
//! represent commands and their results.

use std::fmt;

/// A command parsed from one client line.
///
/// Credential commands carry the password as the remainder of the line, so it
/// may contain spaces. `Debug` output never shows it.
#[derive(PartialEq)]
pub enum Command {
    Register { username: String, password: String },
    Login { username: String, password: String },
    Logout,
    Incidents,
    Tickets,
    Insights,
    Quit,
    /// A known command missing its arguments; carries the usage text.
    Incomplete(&'static str),
    Unknown,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Register { username, .. } => write!(f, "REGISTER {username} ****"),
            Command::Login { username, .. } => write!(f, "LOGIN {username} ****"),
            Command::Logout => write!(f, "LOGOUT"),
            Command::Incidents => write!(f, "INCIDENTS"),
            Command::Tickets => write!(f, "TICKETS"),
            Command::Insights => write!(f, "INSIGHTS"),
            Command::Quit => write!(f, "QUIT"),
            Command::Incomplete(usage) => write!(f, "INCOMPLETE ({usage})"),
            Command::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn success(message: String) -> Self {
        Self {
            status: CommandStatus::Success,
            message: Some(message),
        }
    }

    pub fn failure(reason: impl Into<String>, message: String) -> Self {
        Self {
            status: CommandStatus::Failure(reason.into()),
            message: Some(message),
        }
    }
}

const REGISTER_USAGE: &str = "REGISTER <username> <password>";
const LOGIN_USAGE: &str = "LOGIN <username> <password>";

/// Parses a raw line received from a client into a `Command`.
///
/// Command words are case-insensitive; arguments are kept verbatim apart from
/// the single separator after the username.
pub fn parse_command(raw: &str) -> Command {
    let line = raw.trim_end_matches(['\r', '\n']).trim_start();
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg),
        None => (line, ""),
    };

    match cmd.to_ascii_uppercase().as_str() {
        "REGISTER" => match split_credentials(arg) {
            Some((username, password)) => Command::Register { username, password },
            None => Command::Incomplete(REGISTER_USAGE),
        },
        "LOGIN" => match split_credentials(arg) {
            Some((username, password)) => Command::Login { username, password },
            None => Command::Incomplete(LOGIN_USAGE),
        },
        "LOGOUT" => Command::Logout,
        "INCIDENTS" => Command::Incidents,
        "TICKETS" => Command::Tickets,
        "INSIGHTS" => Command::Insights,
        "QUIT" | "Q" => Command::Quit,
        _ => Command::Unknown,
    }
}

fn split_credentials(arg: &str) -> Option<(String, String)> {
    let (username, password) = arg.trim_start().split_once(' ')?;
    if username.is_empty() || password.is_empty() {
        return None;
    }
    Some((username.to_string(), password.to_string()))
}
