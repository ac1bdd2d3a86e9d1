//! Module `state`
//!
//! Defines the `Client` struct tracking one connection's login state.

use std::net::SocketAddr;

/// Represents the state of a connected client.
///
/// Login state lives only as long as the connection; there are no tokens.
#[derive(Debug, Default)]
pub struct Client {
    username: Option<String>,
    client_addr: Option<SocketAddr>,
    is_logged_in: bool,
}

impl Client {
    pub fn new(client_addr: SocketAddr) -> Self {
        Self {
            client_addr: Some(client_addr),
            ..Self::default()
        }
    }

    /// Marks the client as authenticated as `username`.
    pub fn login(&mut self, username: String) {
        self.username = Some(username);
        self.is_logged_in = true;
    }

    /// Clears the login state. The connection address is kept.
    pub fn logout(&mut self) {
        self.username = None;
        self.is_logged_in = false;
    }

    /// Returns whether the client has successfully logged in.
    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    /// Returns the logged-in username, if any.
    pub fn username(&self) -> Option<&String> {
        self.username.as_ref()
    }

    /// Returns the client's socket address if known.
    pub fn client_addr(&self) -> Option<&SocketAddr> {
        self.client_addr.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_and_logout_toggle_state() {
        let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let mut client = Client::new(addr);
        assert!(!client.is_logged_in());

        client.login("alice".into());
        assert!(client.is_logged_in());
        assert_eq!(client.username().map(String::as_str), Some("alice"));

        client.logout();
        assert!(!client.is_logged_in());
        assert_eq!(client.username(), None);
        assert_eq!(client.client_addr(), Some(&addr));
    }
}
