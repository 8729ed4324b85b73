//! Process-wide application state.
//!
//! `CoreState` is built once at startup and shared by every request through
//! an `Arc`. It owns the optional store, the statistics cache, and the
//! practitioner directory. Nothing here is mutated after construction except
//! the compute-once statistics cache.

use std::sync::Arc;

use uuid::Uuid;

use crate::analysis::{DatasetStatistics, RiskAssessment, StatisticsCache};
use crate::config::Config;
use crate::db::{HealthStore, SqliteStore, StoreError};
use crate::doctors::{DirectoryError, PractitionerDirectory};
use crate::models::HealthRecord;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    /// `None` when persistence is disabled.
    store: Option<Arc<dyn HealthStore>>,
    stats: StatisticsCache,
    directory: PractitionerDirectory,
}

impl CoreState {
    pub fn new(store: Option<Arc<dyn HealthStore>>, directory: PractitionerDirectory) -> Self {
        Self { store, stats: StatisticsCache::new(), directory }
    }

    /// State with no store and the built-in directory.
    pub fn without_store() -> Self {
        Self::new(None, PractitionerDirectory::builtin())
    }

    /// Open the store, seed the dataset, and load the directory as configured.
    ///
    /// A store that cannot be opened is a startup error. A dataset file that
    /// cannot be imported is only logged: the service still runs on default
    /// statistics.
    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        let store = match &config.db_path {
            Some(path) => {
                let store = SqliteStore::open(path)?;
                if let Some(dataset) = &config.dataset_path {
                    if let Err(e) = store.seed_dataset_if_empty(dataset) {
                        tracing::warn!(error = %e, path = %dataset.display(), "Dataset import failed");
                    }
                }
                Some(Arc::new(store) as Arc<dyn HealthStore>)
            }
            None => {
                tracing::info!("Persistence disabled, running without a store");
                None
            }
        };

        let directory = match &config.directory_path {
            Some(path) => PractitionerDirectory::from_json_file(path)?,
            None => PractitionerDirectory::builtin(),
        };

        Ok(Self::new(store, directory))
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    pub fn directory(&self) -> &PractitionerDirectory {
        &self.directory
    }

    /// Dataset statistics, computed from the store on first success.
    /// May block on store I/O.
    pub fn statistics(&self) -> Arc<DatasetStatistics> {
        self.stats.get_or_compute(self.store.as_deref())
    }

    /// Persist an accepted assessment. Failures are logged and reported as
    /// `None`; they never fail the request. May block on store I/O.
    pub fn save_entry(&self, record: &HealthRecord, assessment: &RiskAssessment) -> Option<Uuid> {
        let store = self.store.as_ref()?;
        match store.save_entry(record, assessment.risk_score, assessment.risk_level) {
            Ok(id) => {
                tracing::debug!(entry_id = %id, "Assessment stored");
                Some(id)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to store assessment");
                None
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

/// Errors raised while building `CoreState`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
