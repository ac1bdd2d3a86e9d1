//! Authentication system
//!
//! Durable credential store with bcrypt hashing, plus the input checks the
//! protocol layer applies before calling it.

pub mod backend;
pub mod credentials;
pub mod hasher;
pub mod store;
pub mod validator;

pub use backend::{CredentialBackend, FileBackend, MemoryBackend};
pub use credentials::CredentialRecord;
pub use hasher::PasswordHasher;
pub use store::CredentialStore;
pub use validator::validate_credentials;
