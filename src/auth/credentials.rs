//! Credential records
//!
//! One stored `(username, password_hash)` pair and its line encoding
//! `<username>:<hash>\n`.

use std::fmt;

/// Separates the username from the hash encoding on a stored line.
pub const FIELD_SEPARATOR: char = ':';

/// A stored credential. The plaintext password never appears here.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: String,
}

impl CredentialRecord {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Parses one stored line, returning `None` for malformed lines.
    ///
    /// Only the line terminator is stripped; the username is taken verbatim.
    /// The split happens at the last separator because bcrypt encodings never
    /// contain one, which keeps usernames containing `:` intact.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            return None;
        }

        let (username, password_hash) = line.rsplit_once(FIELD_SEPARATOR)?;
        Some(Self::new(username, password_hash))
    }

    /// Encodes the record as a complete, newline-terminated line.
    pub fn to_line(&self) -> String {
        format!(
            "{}{}{}\n",
            self.username, FIELD_SEPARATOR, self.password_hash
        )
    }
}

// Hashes stay out of logs.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}
