//! Input validation for credential commands
//!
//! The store accepts any text; these checks are applied by the protocol layer
//! before a username or password reaches it.

use crate::config::StartupConfig;
use crate::error::AuthError;

/// Rejects empty, oversized, or control-character input.
fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.is_empty() && input.len() <= max_length && !input.chars().any(char::is_control)
}

/// Validates a username/password pair submitted by a client.
pub fn validate_credentials(
    username: &str,
    password: &str,
    config: &StartupConfig,
) -> Result<(), AuthError> {
    if !is_valid_input(username, config.max_username_length)
        || username.chars().any(char::is_whitespace)
    {
        return Err(AuthError::MalformedInput("Invalid username format".into()));
    }

    if !is_valid_input(password, config.max_password_length) {
        return Err(AuthError::MalformedInput("Invalid password format".into()));
    }

    Ok(())
}
