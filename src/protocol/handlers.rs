//! Command handlers
//!
//! One handler per command. Handlers are synchronous: they hash passwords and
//! read data files, so the session runs them on the blocking pool.

use log::{info, warn};

use crate::auth::validate_credentials;
use crate::client::Client;
use crate::error::handlers::{error_to_reply_code, handle_error};
use crate::error::{AuthError, ServerError, SessionError};
use crate::protocol::responses::{
    ARGUMENT_ERROR, CLOSING, CREATED, LOGIN_SUCCESS, NOT_LOGGED_IN, STATUS, SYNTAX_ERROR,
    format_multiline, format_response,
};
use crate::protocol::{Command, CommandResult, CommandStatus};
use crate::server::AppState;

/// Dispatches a parsed command to its handler.
pub fn handle_command(client: &mut Client, command: &Command, state: &AppState) -> CommandResult {
    match command {
        Command::Register { username, password } => {
            handle_cmd_register(username, password, state)
        }
        Command::Login { username, password } => {
            handle_cmd_login(client, username, password, state)
        }
        Command::Logout => handle_cmd_logout(client),
        Command::Incidents => handle_query(client, state, |s| {
            let summary = s.dashboard.incident_summary()?;
            Ok(format_response(STATUS, &summary))
        }),
        Command::Tickets => handle_query(client, state, |s| {
            let summary = s.dashboard.ticket_summary()?;
            Ok(format_response(STATUS, &summary))
        }),
        Command::Insights => handle_query(client, state, |s| {
            let lines = s.dashboard.insights()?;
            Ok(format_multiline(STATUS, &lines))
        }),
        Command::Quit => handle_cmd_quit(client),
        Command::Incomplete(usage) => CommandResult::failure(
            "Missing arguments",
            format_response(ARGUMENT_ERROR, &format!("Syntax: {usage}")),
        ),
        Command::Unknown => CommandResult::failure(
            "Unknown command",
            format_response(SYNTAX_ERROR, "Unknown command"),
        ),
    }
}

fn handle_cmd_register(username: &str, password: &str, state: &AppState) -> CommandResult {
    let outcome = validate_credentials(username, password, &state.limits)
        .and_then(|_| state.credentials.register(username, password));

    match outcome {
        Ok(()) => CommandResult::success(format_response(CREATED, "Registration successful")),
        Err(e) => auth_failure(e),
    }
}

/// Handles LOGIN. Unknown users and wrong passwords get the same reply.
fn handle_cmd_login(
    client: &mut Client,
    username: &str,
    password: &str,
    state: &AppState,
) -> CommandResult {
    if let Err(e) = validate_credentials(username, password, &state.limits) {
        return auth_failure(e);
    }

    match state.credentials.authenticate(username, password) {
        Ok(true) => {
            client.login(username.to_string());
            info!("User {} logged in", username);
            CommandResult::success(format_response(LOGIN_SUCCESS, "Login successful"))
        }
        Ok(false) => {
            client.logout();
            warn!("Failed login attempt for user {}", username);
            CommandResult::failure(
                "Invalid credentials",
                format_response(NOT_LOGGED_IN, "Invalid username or password"),
            )
        }
        Err(e) => auth_failure(e),
    }
}

fn handle_cmd_logout(client: &mut Client) -> CommandResult {
    if !client.is_logged_in() {
        return not_logged_in();
    }

    client.logout();
    CommandResult::success(format_response(CLOSING, "Logout successful"))
}

fn handle_cmd_quit(client: &mut Client) -> CommandResult {
    client.logout();
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(CLOSING, "Goodbye")),
    }
}

/// Runs a read-only dashboard query for a logged-in client.
fn handle_query<F>(client: &Client, state: &AppState, query: F) -> CommandResult
where
    F: FnOnce(&AppState) -> Result<String, ServerError>,
{
    if !client.is_logged_in() {
        return not_logged_in();
    }

    match query(state) {
        Ok(reply) => CommandResult::success(reply),
        Err(e) => server_failure(e),
    }
}

fn not_logged_in() -> CommandResult {
    let err = ServerError::from(SessionError::NotLoggedIn);
    CommandResult::failure(
        err.to_string(),
        format_response(error_to_reply_code(&err), "Not logged in"),
    )
}

fn auth_failure(e: AuthError) -> CommandResult {
    let text = match &e {
        AuthError::AlreadyExists(_) => "Username already exists".to_string(),
        AuthError::MalformedInput(reason) => reason.clone(),
        AuthError::StorageUnavailable { .. } | AuthError::Hashing(_) => {
            "Storage unavailable".to_string()
        }
    };
    let err = ServerError::from(e);
    handle_error(&err);
    CommandResult::failure(
        err.to_string(),
        format_response(error_to_reply_code(&err), &text),
    )
}

fn server_failure(err: ServerError) -> CommandResult {
    handle_error(&err);
    CommandResult::failure(
        err.to_string(),
        format_response(error_to_reply_code(&err), "Requested action aborted"),
    )
}
