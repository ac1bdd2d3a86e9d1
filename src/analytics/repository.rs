//! CSV-backed record repository
//!
//! Every mutation reads the whole table and rewrites it. The rewrite goes to a
//! sibling temp file that replaces the original by rename.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::models::Record;
use crate::error::AnalyticsError;

pub struct CsvRepository<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> CsvRepository<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every row. A missing file is an empty table.
    pub fn load_all(&self) -> Result<Vec<T>, AnalyticsError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .from_path(&self.path)
            .map_err(|e| AnalyticsError::csv(&self.path, e))?;

        let records = reader
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| AnalyticsError::csv(&self.path, e))?;

        debug!("Loaded {} rows from {}", records.len(), self.path.display());
        Ok(records)
    }

    pub fn add(&self, record: T) -> Result<(), AnalyticsError> {
        let mut records = self.load_all()?;
        records.push(record);
        self.write_all(&records)?;
        info!("Added record to {}", self.path.display());
        Ok(())
    }

    /// Sets `status` on every row with this id. Returns whether any matched.
    pub fn update_status(&self, id: &str, status: &str) -> Result<bool, AnalyticsError> {
        let mut records = self.load_all()?;
        let mut matched = false;

        for record in records.iter_mut().filter(|r| r.id() == id) {
            record.set_status(status);
            matched = true;
        }

        if matched {
            self.write_all(&records)?;
            info!("Updated status of {} in {} to {}", id, self.path.display(), status);
        }
        Ok(matched)
    }

    /// Removes every row with this id. Returns whether any were removed.
    pub fn delete(&self, id: &str) -> Result<bool, AnalyticsError> {
        let mut records = self.load_all()?;
        let before = records.len();
        records.retain(|r| r.id() != id);

        if records.len() == before {
            return Ok(false);
        }

        self.write_all(&records)?;
        info!("Deleted {} from {}", id, self.path.display());
        Ok(true)
    }

    fn write_all(&self, records: &[T]) -> Result<(), AnalyticsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AnalyticsError::io(parent, e))?;
        }

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let mut writer = WriterBuilder::new()
            .from_path(&temp_path)
            .map_err(|e| AnalyticsError::csv(&temp_path, e))?;

        for record in records {
            writer
                .serialize(record)
                .map_err(|e| AnalyticsError::csv(&temp_path, e))?;
        }
        writer
            .flush()
            .map_err(|e| AnalyticsError::io(&temp_path, e))?;
        drop(writer);

        fs::rename(&temp_path, &self.path).map_err(|e| AnalyticsError::io(&self.path, e))
    }
}
