//! Credential storage backends
//!
//! The store only needs two capabilities from its medium: find the first
//! record for a username, and durably append a new one. `FileBackend` is the
//! newline-delimited flat file; `MemoryBackend` keeps records in-process.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use log::{debug, warn};

use super::credentials::CredentialRecord;
use crate::error::AuthError;

/// Key-lookup capability over stored credential records.
pub trait CredentialBackend: Send + Sync {
    /// Returns the hash of the first record stored for `username`.
    ///
    /// A medium that has not been created yet holds no records.
    fn lookup(&self, username: &str) -> Result<Option<String>, AuthError>;

    /// Appends a record, provisioning the medium on first use.
    ///
    /// Either the whole record is stored or nothing is.
    fn append(&self, record: &CredentialRecord) -> Result<(), AuthError>;
}

/// Flat file with one `<username>:<hash>` record per line.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_for_scan(&self) -> Result<Option<BufReader<File>>, AuthError> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(BufReader::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AuthError::storage(&self.path, e)),
        }
    }

    fn ends_with_newline(&self, file: &mut File) -> Result<bool, AuthError> {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|e| AuthError::storage(&self.path, e))?;
        Ok(last[0] == b'\n')
    }
}

impl CredentialBackend for FileBackend {
    fn lookup(&self, username: &str) -> Result<Option<String>, AuthError> {
        let Some(reader) = self.open_for_scan()? else {
            return Ok(None);
        };

        for (index, line) in reader.split(b'\n').enumerate() {
            let line = line.map_err(|e| AuthError::storage(&self.path, e))?;

            let Ok(line) = std::str::from_utf8(&line) else {
                warn!(
                    "Skipping non UTF-8 credential line {} in {}",
                    index + 1,
                    self.path.display()
                );
                continue;
            };

            match CredentialRecord::parse_line(line) {
                Some(record) if record.username == username => {
                    return Ok(Some(record.password_hash));
                }
                Some(_) => {}
                None if line.trim_end_matches('\r').is_empty() => {}
                None => warn!(
                    "Skipping malformed credential line {} in {}",
                    index + 1,
                    self.path.display()
                ),
            }
        }

        Ok(None)
    }

    fn append(&self, record: &CredentialRecord) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AuthError::storage(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AuthError::storage(&self.path, e))?;

        let original_len = file
            .metadata()
            .map_err(|e| AuthError::storage(&self.path, e))?
            .len();

        // A last line without its terminator would swallow the new record.
        let mut line = String::new();
        if original_len > 0 && !self.ends_with_newline(&mut file)? {
            line.push('\n');
        }
        line.push_str(&record.to_line());

        let written = file.write_all(line.as_bytes()).and_then(|_| file.sync_data());

        if let Err(e) = written {
            // Roll back whatever part of the line reached the file.
            if let Err(truncate_err) = file.set_len(original_len) {
                warn!(
                    "Failed to roll back partial record in {}: {}",
                    self.path.display(),
                    truncate_err
                );
            }
            return Err(AuthError::storage(&self.path, e));
        }

        debug!("Appended credential record to {}", self.path.display());
        Ok(())
    }
}

/// Volatile in-process credential table.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: RwLock<Vec<CredentialRecord>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialBackend for MemoryBackend {
    fn lookup(&self, username: &str) -> Result<Option<String>, AuthError> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records
            .iter()
            .find(|record| record.username == username)
            .map(|record| record.password_hash.clone()))
    }

    fn append(&self, record: &CredentialRecord) -> Result<(), AuthError> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
