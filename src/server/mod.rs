//! Server core functionality
//!
//! Listener, connection admission, and the state shared by every session.

pub mod core;
pub mod state;

pub use self::core::Server;
pub use state::AppState;
