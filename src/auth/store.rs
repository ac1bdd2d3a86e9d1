//! Credential store
//!
//! Append-only registry of username to salted password hash. Registration is
//! serialized through an in-process lock, so a username can win the
//! check-then-append race at most once per store handle.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};

use super::backend::{CredentialBackend, FileBackend};
use super::credentials::CredentialRecord;
use super::hasher::PasswordHasher;
use crate::error::AuthError;

pub struct CredentialStore<B = FileBackend> {
    backend: B,
    hasher: PasswordHasher,
    register_lock: Mutex<()>,
}

impl CredentialStore<FileBackend> {
    /// Opens a file-backed store. Nothing is created on disk until the first
    /// successful registration.
    pub fn open(path: impl Into<PathBuf>, hasher: PasswordHasher) -> Self {
        Self::with_backend(FileBackend::new(path), hasher)
    }
}

impl<B: CredentialBackend> CredentialStore<B> {
    pub fn with_backend(backend: B, hasher: PasswordHasher) -> Self {
        Self {
            backend,
            hasher,
            register_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns whether a record with exactly this username is stored.
    pub fn exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.backend.lookup(username)?.is_some())
    }

    /// Stores a new credential for `username`.
    ///
    /// Returns `AlreadyExists` without touching storage when the username is
    /// taken. Empty usernames and passwords are accepted.
    pub fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.contains(['\n', '\r']) {
            return Err(AuthError::MalformedInput(
                "username cannot contain line breaks".into(),
            ));
        }

        if self.exists(username)? {
            debug!("Registration rejected, username taken: {}", username);
            return Err(AuthError::AlreadyExists(username.to_string()));
        }

        let password_hash = self.hasher.hash(password)?;

        // The lock carries no data, so a poisoned guard is still usable.
        let _guard = self
            .register_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.exists(username)? {
            debug!("Registration lost race for username: {}", username);
            return Err(AuthError::AlreadyExists(username.to_string()));
        }

        self.backend
            .append(&CredentialRecord::new(username, password_hash))?;

        info!("Registered user: {}", username);
        Ok(())
    }

    /// Verifies `password` against the first record stored for `username`.
    ///
    /// Unknown users and wrong passwords both yield `Ok(false)`.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let Some(password_hash) = self.backend.lookup(username)? else {
            debug!("Authentication failed for user: {}", username);
            return Ok(false);
        };

        let verified = match self.hasher.verify(password, &password_hash) {
            Ok(verified) => verified,
            Err(e) => {
                warn!("Unusable stored hash for user {}: {}", username, e);
                false
            }
        };

        if verified {
            debug!("Authenticated user: {}", username);
        } else {
            debug!("Authentication failed for user: {}", username);
        }
        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::backend::MemoryBackend;
    use crate::auth::hasher::MIN_COST;
    use std::fs;
    use std::io;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn file_store(dir: &TempDir) -> CredentialStore {
        CredentialStore::open(
            dir.path().join("data/users.txt"),
            PasswordHasher::new(MIN_COST),
        )
    }

    /// Reads succeed but every append fails, like a read-only medium.
    #[derive(Default)]
    struct ReadOnlyBackend {
        records: MemoryBackend,
    }

    impl CredentialBackend for ReadOnlyBackend {
        fn lookup(&self, username: &str) -> Result<Option<String>, AuthError> {
            self.records.lookup(username)
        }

        fn append(&self, _record: &CredentialRecord) -> Result<(), AuthError> {
            Err(AuthError::storage(
                "read-only",
                io::Error::new(io::ErrorKind::PermissionDenied, "read-only medium"),
            ))
        }
    }

    fn memory_store() -> CredentialStore<MemoryBackend> {
        CredentialStore::with_backend(MemoryBackend::new(), PasswordHasher::new(MIN_COST))
    }

    #[test]
    fn alice_scenario() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir);

        assert!(!store.exists("alice").unwrap());
        store.register("alice", "Secr3t!").unwrap();
        assert!(store.exists("alice").unwrap());
        assert!(store.authenticate("alice", "Secr3t!").unwrap());
        assert!(!store.authenticate("alice", "wrong").unwrap());

        let err = store.register("alice", "Other").unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists(ref u) if u == "alice"));
    }

    #[test]
    fn duplicate_registration_keeps_first_hash() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir);

        store.register("bob", "first").unwrap();
        let before = fs::read_to_string(store.backend().path()).unwrap();

        assert!(store.register("bob", "second").is_err());
        let after = fs::read_to_string(store.backend().path()).unwrap();

        assert_eq!(before, after);
        assert!(store.authenticate("bob", "first").unwrap());
        assert!(!store.authenticate("bob", "second").unwrap());
    }

    #[test]
    fn identical_passwords_store_different_hashes() {
        let store = memory_store();
        store.register("a", "x").unwrap();
        store.register("b", "x").unwrap();

        let a = store.backend().lookup("a").unwrap().unwrap();
        let b = store.backend().lookup("b").unwrap().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_store_never_authenticates() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir);

        assert!(!store.authenticate("alice", "Secr3t!").unwrap());
        assert!(!store.authenticate("", "").unwrap());
        assert!(!store.backend().path().exists());
    }

    #[test]
    fn plaintext_never_reaches_storage() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir);
        store.register("carol", "hunter2-plaintext").unwrap();

        let contents = fs::read_to_string(store.backend().path()).unwrap();
        assert!(contents.starts_with("carol:$2"));
        assert!(!contents.contains("hunter2-plaintext"));
    }

    #[test]
    fn malformed_line_does_not_break_authentication() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir);
        store.register("dave", "pw").unwrap();

        let path = store.backend().path().to_path_buf();
        let contents = fs::read_to_string(&path).unwrap();
        fs::write(&path, format!("this line has no separator\n\n{contents}")).unwrap();

        assert!(store.authenticate("dave", "pw").unwrap());
        assert!(!store.authenticate("dave", "nope").unwrap());
        assert!(store.exists("dave").unwrap());
    }

    #[test]
    fn first_matching_record_decides() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir);
        let hasher = PasswordHasher::new(MIN_COST);

        let path = store.backend().path().to_path_buf();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            format!(
                "erin:{}\nerin:{}\n",
                hasher.hash("old").unwrap(),
                hasher.hash("new").unwrap()
            ),
        )
        .unwrap();

        assert!(store.authenticate("erin", "old").unwrap());
        assert!(!store.authenticate("erin", "new").unwrap());
    }

    #[test]
    fn corrupt_stored_hash_fails_closed() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir);

        let path = store.backend().path().to_path_buf();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "frank:not-a-hash\n").unwrap();

        assert!(store.exists("frank").unwrap());
        assert!(!store.authenticate("frank", "not-a-hash").unwrap());
    }

    #[test]
    fn usernames_match_exactly() {
        let store = memory_store();
        store.register("Grace", "pw").unwrap();

        assert!(!store.exists("grace").unwrap());
        assert!(!store.exists("Grace ").unwrap());
        assert!(!store.authenticate("grace", "pw").unwrap());
        store.register("grace", "pw2").unwrap();
        assert!(store.authenticate("grace", "pw2").unwrap());
    }

    #[test]
    fn empty_credentials_are_accepted() {
        let store = memory_store();
        store.register("", "").unwrap();
        assert!(store.exists("").unwrap());
        assert!(store.authenticate("", "").unwrap());
        assert!(!store.authenticate("", "x").unwrap());
    }

    #[test]
    fn colon_in_username_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir);
        store.register("team:ops", "pw").unwrap();

        assert!(store.exists("team:ops").unwrap());
        assert!(!store.exists("team").unwrap());
        assert!(store.authenticate("team:ops", "pw").unwrap());
    }

    #[test]
    fn line_breaks_in_username_are_rejected() {
        let store = memory_store();
        let err = store.register("evil\nroot", "pw").unwrap_err();
        assert!(matches!(err, AuthError::MalformedInput(_)));
        assert!(store.backend().is_empty());
    }

    #[test]
    fn register_after_unterminated_last_line_keeps_both_users() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir);
        let hasher = PasswordHasher::new(MIN_COST);

        let path = store.backend().path().to_path_buf();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("alice:{}", hasher.hash("pw").unwrap())).unwrap();

        store.register("bob", "pw2").unwrap();

        assert!(store.exists("alice").unwrap());
        assert!(store.authenticate("alice", "pw").unwrap());
        assert!(store.exists("bob").unwrap());
        assert!(store.authenticate("bob", "pw2").unwrap());
        assert!(matches!(
            store.register("alice", "again"),
            Err(AuthError::AlreadyExists(_))
        ));

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn failed_append_is_storage_unavailable_and_stores_nothing() {
        let store = CredentialStore::with_backend(
            ReadOnlyBackend::default(),
            PasswordHasher::new(MIN_COST),
        );

        let err = store.register("ivy", "pw").unwrap_err();
        assert!(matches!(err, AuthError::StorageUnavailable { .. }));
        assert!(!err.is_recoverable());
        assert!(!store.exists("ivy").unwrap());
        assert!(!store.authenticate("ivy", "pw").unwrap());
        assert!(store.backend().records.is_empty());
    }

    #[test]
    fn unwritable_location_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        // The credential file's parent is a regular file, so nothing can be created.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let store = CredentialStore::open(blocker.join("users.txt"), PasswordHasher::new(MIN_COST));

        let err = store.register("jack", "pw").unwrap_err();
        assert!(matches!(err, AuthError::StorageUnavailable { .. }));
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
    }

    #[test]
    fn concurrent_registration_has_one_winner() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(file_store(&dir));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.register("henry", &format!("pw{i}")))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|result| result.is_ok())
            .count();
        assert_eq!(winners, 1);

        let contents = fs::read_to_string(store.backend().path()).unwrap();
        assert_eq!(contents.lines().filter(|l| l.starts_with("henry:")).count(), 1);
    }
}
