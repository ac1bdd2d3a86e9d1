//! Error handlers
//!
//! Maps errors to protocol reply codes and logs them.

use crate::error::types::{AuthError, ServerError, SessionError};
use crate::protocol::responses::{
    ARGUMENT_ERROR, CONFLICT, LOCAL_ERROR, NOT_LOGGED_IN, SERVICE_UNAVAILABLE, SYNTAX_ERROR,
};
use log::{error, warn};

/// Log a server error at a level matching its severity.
pub fn handle_error(err: &ServerError) {
    match err {
        ServerError::Auth(e) if e.is_recoverable() => warn!("{}", err),
        _ => error!("Server error: {}", err),
    }
}

/// Convert an error to its protocol reply code
pub fn error_to_reply_code(err: &ServerError) -> u16 {
    match err {
        ServerError::Auth(AuthError::AlreadyExists(_)) => CONFLICT,
        ServerError::Auth(AuthError::MalformedInput(_)) => ARGUMENT_ERROR,
        ServerError::Auth(AuthError::StorageUnavailable { .. }) => LOCAL_ERROR,
        ServerError::Auth(AuthError::Hashing(_)) => LOCAL_ERROR,
        ServerError::Analytics(_) => LOCAL_ERROR,
        ServerError::Session(SessionError::CommandTooLong(_)) => SYNTAX_ERROR,
        ServerError::Session(SessionError::InvalidEncoding) => ARGUMENT_ERROR,
        ServerError::Session(SessionError::TooManyConnections(_)) => SERVICE_UNAVAILABLE,
        ServerError::Session(SessionError::NotLoggedIn) => NOT_LOGGED_IN,
        ServerError::Session(SessionError::TaskFailed(_)) => LOCAL_ERROR,
        ServerError::Config(_) => SERVICE_UNAVAILABLE,
        ServerError::IoError(_) => SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn duplicate_username_maps_to_conflict() {
        let err = ServerError::from(AuthError::AlreadyExists("alice".into()));
        assert_eq!(error_to_reply_code(&err), CONFLICT);
        assert_eq!(CONFLICT, 409);
    }

    #[test]
    fn session_errors_map_to_their_replies() {
        let too_long = ServerError::from(SessionError::CommandTooLong(600));
        assert_eq!(error_to_reply_code(&too_long), 500);

        let bad_bytes = ServerError::from(SessionError::InvalidEncoding);
        assert_eq!(error_to_reply_code(&bad_bytes), 501);

        let full = ServerError::from(SessionError::TooManyConnections(16));
        assert_eq!(error_to_reply_code(&full), 421);

        let anonymous = ServerError::from(SessionError::NotLoggedIn);
        assert_eq!(error_to_reply_code(&anonymous), 530);
    }

    #[test]
    fn storage_failure_maps_to_local_error() {
        let err = ServerError::from(AuthError::storage(
            "data/users.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        ));
        assert_eq!(error_to_reply_code(&err), 451);
        assert!(err.to_string().contains("data/users.txt"));
    }
}
