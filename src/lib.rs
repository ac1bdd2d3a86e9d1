pub mod analytics;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;

pub use auth::CredentialStore;
pub use server::{AppState, Server};
