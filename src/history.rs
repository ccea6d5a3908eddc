//! History store adapter (spec §4.6). Append-only persistence of finished
//! analyses, replayed oldest-first to warm up the regional calibrator on
//! startup.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::record::AnalysisRecord;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, record: AnalysisRecord) -> Result<AnalysisRecord, AppError>;

    /// Returns records created within the last `days`, ordered oldest
    /// first — the order the calibrator must replay them in (spec §4.3
    /// "warm-up replays ascending").
    async fn recent(&self, days: i64) -> Result<Vec<AnalysisRecord>, AppError>;
}

/// Process-memory-backed store. Persistence across restarts is out of
/// scope (spec Non-goals); this exists so the service has somewhere to
/// put finished analyses and something to warm the calibrator from.
pub struct InMemoryHistoryStore {
    records: RwLock<Vec<AnalysisRecord>>,
    next_id: RwLock<i64>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: RwLock::new(1),
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, mut record: AnalysisRecord) -> Result<AnalysisRecord, AppError> {
        let mut next_id = self.next_id.write().await;
        record.id = *next_id;
        *next_id += 1;
        drop(next_id);

        let stored = record.clone();
        self.records.write().await.push(record);
        Ok(stored)
    }

    async fn recent(&self, days: i64) -> Result<Vec<AnalysisRecord>, AppError> {
        let cutoff = Utc::now() - Duration::days(days);
        let records = self.records.read().await;
        let mut out: Vec<AnalysisRecord> = records
            .iter()
            .filter(|r| r.created_at >= cutoff)
            .cloned()
            .collect();
        out.sort_by_key(|r| r.created_at);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::verdict::{Grade, SuitabilityClass};

    fn sample_record(id: i64, days_ago: i64) -> AnalysisRecord {
        AnalysisRecord {
            id,
            created_at: Utc::now() - Duration::days(days_ago),
            lat: 26.92,
            lng: 70.90,
            solar_irradiance: 5.8,
            cloud_cover_pct: 20.0,
            slope_degrees: 2.0,
            grid_distance_km: 8.0,
            score: 80,
            grade: Grade::A,
            suitability_class: SuitabilityClass::Excellent,
            confidence: 90,
            annual_energy_kwh: 30000.0,
            payback_years: 5.0,
            lifetime_profit: 500_000.0,
            ai_summary: "test".to_string(),
            ai_provider: "template".to_string(),
        }
    }

    #[tokio::test]
    async fn append_assigns_sequential_ids() {
        let store = InMemoryHistoryStore::new();
        let a = store.append(sample_record(0, 1)).await.unwrap();
        let b = store.append(sample_record(0, 1)).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn recent_excludes_records_older_than_window_and_sorts_ascending() {
        let store = InMemoryHistoryStore::new();
        store.append(sample_record(0, 200)).await.unwrap();
        store.append(sample_record(0, 10)).await.unwrap();
        store.append(sample_record(0, 5)).await.unwrap();

        let recent = store.recent(180).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].created_at <= recent[1].created_at);
    }
}
