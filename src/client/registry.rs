//! Client registry
//!
//! Tracks connected sessions and who, if anyone, each is logged in as.

use std::collections::HashMap;
use std::net::SocketAddr;

#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<SocketAddr, Option<String>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, addr: SocketAddr) {
        self.clients.insert(addr, None);
    }

    pub fn remove(&mut self, addr: &SocketAddr) -> Option<Option<String>> {
        self.clients.remove(addr)
    }

    /// Records the username a session is logged in as.
    pub fn set_username(&mut self, addr: &SocketAddr, username: Option<String>) {
        if let Some(entry) = self.clients.get_mut(addr) {
            *entry = username;
        }
    }

    pub fn username(&self, addr: &SocketAddr) -> Option<&str> {
        self.clients.get(addr)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn logged_in(&self) -> usize {
        self.clients.values().filter(|u| u.is_some()).count()
    }
}
