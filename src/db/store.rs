//! External store seam.
//!
//! Handlers talk to persistence only through `HealthStore`, so the service
//! runs unchanged with no store at all, with SQLite, or with a test double.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use super::{repository, sqlite, DatabaseError};
use crate::models::{DatasetRow, HealthRecord, RiskLevel};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Persistence for accepted assessments and the historical dataset.
pub trait HealthStore: Send + Sync {
    /// Persist an accepted assessment and return its identifier.
    fn save_entry(
        &self,
        record: &HealthRecord,
        risk_score: u32,
        risk_level: RiskLevel,
    ) -> Result<Uuid, StoreError>;

    /// Fetch at most `limit` historical dataset rows.
    fn fetch_dataset_rows(&self, limit: usize) -> Result<Vec<DatasetRow>, StoreError>;
}

/// SQLite-backed store. One connection, serialized behind a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = sqlite::open_database(path)?;
        tracing::info!(path = %path.display(), "SQLite store opened");
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self { conn: Mutex::new(sqlite::open_memory_database()?) })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, StoreError> {
        let mut conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(f(&mut *conn)?)
    }

    pub fn import_dataset(&self, rows: &[DatasetRow]) -> Result<usize, StoreError> {
        self.with_conn(|conn| repository::import_dataset_rows(conn, rows))
    }

    /// Import a dataset file, but only into an empty dataset table.
    /// Returns the number of rows imported (0 when the table already had data).
    pub fn seed_dataset_if_empty(&self, path: &Path) -> Result<usize, StoreError> {
        if self.with_conn(|conn| repository::count_dataset_rows(conn))? > 0 {
            tracing::debug!("Dataset table already populated, skipping import");
            return Ok(0);
        }
        let rows = repository::read_dataset_file(path)?;
        let imported = self.import_dataset(&rows)?;
        tracing::info!(imported, path = %path.display(), "Dataset imported");
        Ok(imported)
    }

    pub fn count_entries(&self) -> Result<i64, StoreError> {
        self.with_conn(|conn| repository::count_entries(conn))
    }
}

impl HealthStore for SqliteStore {
    fn save_entry(
        &self,
        record: &HealthRecord,
        risk_score: u32,
        risk_level: RiskLevel,
    ) -> Result<Uuid, StoreError> {
        self.with_conn(|conn| repository::insert_entry(conn, record, risk_score, risk_level))
    }

    fn fetch_dataset_rows(&self, limit: usize) -> Result<Vec<DatasetRow>, StoreError> {
        self.with_conn(|conn| repository::fetch_dataset_rows(conn, limit))
    }
}
