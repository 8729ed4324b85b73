//! Population statistics over the historical dataset.
//!
//! Computed once per process from at most `DATASET_FETCH_LIMIT` rows and
//! memoized with no invalidation. Store failures and empty datasets fall back
//! to `DatasetStatistics::defaults()` and are not memoized, so a later call
//! can still pick up real data.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::db::HealthStore;
use crate::models::DatasetRow;

pub const DATASET_FETCH_LIMIT: usize = 1000;
pub const DEFAULT_AVG_CYCLE_LENGTH: u32 = 28;
pub const DEFAULT_AVG_PERIOD_LENGTH: u32 = 5;

const TOP_SYMPTOM_COUNT: usize = 5;

/// Age buckets in display order.
pub const AGE_BUCKETS: [&str; 5] = ["15-20", "21-25", "26-30", "31-35", "36+"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub total_entries: usize,
    pub avg_cycle_length: u32,
    pub avg_period_length: u32,
    pub pcos_percentage: f64,
    pub most_common_symptoms: Vec<String>,
    pub age_distribution: BTreeMap<String, u32>,
}

impl DatasetStatistics {
    /// Stand-in used when no dataset is reachable.
    pub fn defaults() -> Self {
        Self {
            total_entries: 0,
            avg_cycle_length: DEFAULT_AVG_CYCLE_LENGTH,
            avg_period_length: DEFAULT_AVG_PERIOD_LENGTH,
            pcos_percentage: 0.0,
            most_common_symptoms: Vec::new(),
            age_distribution: BTreeMap::new(),
        }
    }
}

/// Aggregate a batch of dataset rows.
pub fn compute_statistics(rows: &[DatasetRow]) -> DatasetStatistics {
    DatasetStatistics {
        total_entries: rows.len(),
        avg_cycle_length: truncated_mean(rows.iter().filter_map(|r| digits(&r.cycle_length)))
            .unwrap_or(DEFAULT_AVG_CYCLE_LENGTH),
        avg_period_length: truncated_mean(rows.iter().filter_map(|r| digits(&r.period_length)))
            .unwrap_or(DEFAULT_AVG_PERIOD_LENGTH),
        pcos_percentage: pcos_percentage(rows),
        most_common_symptoms: most_common_symptoms(rows),
        age_distribution: age_distribution(rows.iter().filter_map(|r| digits(&r.age))),
    }
}

/// Share of rows with a PCOS diagnosis, in percent, rounded to one decimal.
pub fn pcos_percentage(rows: &[DatasetRow]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let diagnosed = rows.iter().filter(|r| is_yes(&r.pcos)).count();
    let pct = diagnosed as f64 / rows.len() as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Up to five symptom columns by number of "Yes" answers, most frequent
/// first. Ties keep column order; columns with no answers are left out.
pub fn most_common_symptoms(rows: &[DatasetRow]) -> Vec<String> {
    let mut counts: Vec<(&'static str, usize)> = DatasetRow::default()
        .symptom_indicators()
        .iter()
        .map(|(field, _)| (*field, 0))
        .collect();
    for row in rows {
        for (slot, (_, value)) in counts.iter_mut().zip(row.symptom_indicators()) {
            if value == Some("Yes") {
                slot.1 += 1;
            }
        }
    }
    counts.retain(|(_, count)| *count > 0);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_SYMPTOM_COUNT)
        .map(|(field, _)| field.to_string())
        .collect()
}

/// Histogram over the five fixed age buckets. Every bucket is present.
pub fn age_distribution(ages: impl IntoIterator<Item = u64>) -> BTreeMap<String, u32> {
    let mut buckets: BTreeMap<String, u32> =
        AGE_BUCKETS.iter().map(|b| (b.to_string(), 0)).collect();
    for age in ages {
        let bucket = match age {
            0..=20 => AGE_BUCKETS[0],
            21..=25 => AGE_BUCKETS[1],
            26..=30 => AGE_BUCKETS[2],
            31..=35 => AGE_BUCKETS[3],
            _ => AGE_BUCKETS[4],
        };
        *buckets.entry(bucket.to_string()).or_default() += 1;
    }
    buckets
}

fn digits(value: &Option<String>) -> Option<u64> {
    let v = value.as_deref()?;
    if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    v.parse().ok()
}

fn is_yes(value: &Option<String>) -> bool {
    value.as_deref() == Some("Yes")
}

/// Integer mean, fractional part dropped.
fn truncated_mean(values: impl Iterator<Item = u64>) -> Option<u32> {
    let (sum, count) = values.fold((0u64, 0u64), |(s, c), v| (s.saturating_add(v), c + 1));
    if count == 0 {
        return None;
    }
    u32::try_from(sum / count).ok()
}

// ═══════════════════════════════════════════
// StatisticsCache
// ═══════════════════════════════════════════

/// Compute-once cache for dataset statistics.
///
/// Two concurrent first calls may both compute; the first `set` wins and
/// the result is identical either way.
#[derive(Default)]
pub struct StatisticsCache {
    cached: OnceLock<Arc<DatasetStatistics>>,
}

impl StatisticsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached statistics, computing them from `store` on first success.
    /// Blocks on store I/O; call from a blocking context.
    pub fn get_or_compute(&self, store: Option<&dyn HealthStore>) -> Arc<DatasetStatistics> {
        if let Some(stats) = self.cached.get() {
            return Arc::clone(stats);
        }

        let Some(store) = store else {
            return Arc::new(DatasetStatistics::defaults());
        };

        match store.fetch_dataset_rows(DATASET_FETCH_LIMIT) {
            Ok(rows) if rows.is_empty() => {
                tracing::debug!("Dataset is empty, using default statistics");
                Arc::new(DatasetStatistics::defaults())
            }
            Ok(rows) => {
                let stats = Arc::new(compute_statistics(&rows));
                tracing::info!(rows = rows.len(), "Dataset statistics computed");
                let _ = self.cached.set(Arc::clone(&stats));
                self.cached.get().cloned().unwrap_or(stats)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Dataset fetch failed, using default statistics");
                Arc::new(DatasetStatistics::defaults())
            }
        }
    }

    pub fn is_populated(&self) -> bool {
        self.cached.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;
    use crate::models::{HealthRecord, RiskLevel};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn row(age: &str, cycle: &str, period: &str, pcos: &str) -> DatasetRow {
        DatasetRow {
            age: Some(age.into()),
            cycle_length: Some(cycle.into()),
            period_length: Some(period.into()),
            pcos: Some(pcos.into()),
            ..Default::default()
        }
    }

    struct CountingStore {
        rows: Vec<DatasetRow>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn new(rows: Vec<DatasetRow>, fail: bool) -> Self {
            Self { rows, fail, calls: AtomicUsize::new(0) }
        }
    }

    impl HealthStore for CountingStore {
        fn save_entry(&self, _: &HealthRecord, _: u32, _: RiskLevel) -> Result<Uuid, StoreError> {
            Ok(Uuid::new_v4())
        }

        fn fetch_dataset_rows(&self, limit: usize) -> Result<Vec<DatasetRow>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(limit, DATASET_FETCH_LIMIT);
            if self.fail {
                Err(StoreError::LockPoisoned)
            } else {
                Ok(self.rows.clone())
            }
        }
    }

    #[test]
    fn age_buckets_one_each() {
        let dist = age_distribution([18, 22, 27, 32, 40]);
        for bucket in AGE_BUCKETS {
            assert_eq!(dist[bucket], 1, "bucket {bucket}");
        }
    }

    #[test]
    fn averages_truncate() {
        let rows = vec![row("20", "28", "5", "No"), row("30", "31", "6", "No")];
        let stats = compute_statistics(&rows);
        // 29.5 → 29, 5.5 → 5
        assert_eq!(stats.avg_cycle_length, 29);
        assert_eq!(stats.avg_period_length, 5);
        assert_eq!(stats.total_entries, 2);
    }

    #[test]
    fn non_digit_values_are_skipped() {
        let rows = vec![row("abc", "", "4.5", "No"), row("25", "30", "-3", "No")];
        let stats = compute_statistics(&rows);
        assert_eq!(stats.avg_cycle_length, 30);
        assert_eq!(stats.avg_period_length, DEFAULT_AVG_PERIOD_LENGTH);
        assert_eq!(stats.age_distribution["21-25"], 1);
        assert_eq!(stats.age_distribution.values().sum::<u32>(), 1);
    }

    #[test]
    fn pcos_percentage_rounds_to_one_decimal() {
        let rows = vec![
            row("20", "28", "5", "Yes"),
            row("20", "28", "5", "No"),
            row("20", "28", "5", "No"),
        ];
        assert_eq!(pcos_percentage(&rows), 33.3);
        assert_eq!(pcos_percentage(&[]), 0.0);
    }

    #[test]
    fn common_symptoms_sorted_by_frequency() {
        let mut a = DatasetRow::default();
        a.acne_or_skin_tags = Some("Yes".into());
        a.always_tired = Some("Yes".into());
        let mut b = DatasetRow::default();
        b.always_tired = Some("Yes".into());
        b.hair_growth_chin = Some("Yes".into());
        b.weight_change = Some("No".into());

        let top = most_common_symptoms(&[a, b]);
        assert_eq!(top, vec!["always_tired", "hair_growth_chin", "acne_or_skin_tags"]);
    }

    #[test]
    fn cache_computes_once() {
        let store = CountingStore::new(vec![row("22", "35", "5", "Yes")], false);
        let cache = StatisticsCache::new();

        let first = cache.get_or_compute(Some(&store));
        let second = cache.get_or_compute(Some(&store));
        assert_eq!(first.avg_cycle_length, 35);
        assert_eq!(first, second);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_populated());
    }

    #[test]
    fn failures_fall_back_without_caching() {
        let store = CountingStore::new(Vec::new(), true);
        let cache = StatisticsCache::new();

        let stats = cache.get_or_compute(Some(&store));
        assert_eq!(*stats, DatasetStatistics::defaults());
        cache.get_or_compute(Some(&store));
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
        assert!(!cache.is_populated());
    }

    #[test]
    fn no_store_returns_defaults() {
        let cache = StatisticsCache::new();
        let stats = cache.get_or_compute(None);
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.avg_cycle_length, 28);
        assert_eq!(stats.avg_period_length, 5);
        assert!(stats.age_distribution.is_empty());
    }
}
