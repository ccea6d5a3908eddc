//! Regional calibrator (spec §4.3). Process-wide, stateful EMA-based bias
//! corrector over a 5°x5° lat/lng grid. One instance is shared across all
//! requests via `Arc`; reads take a shared lock, observations take an
//! exclusive one.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::history::HistoryStore;

const EMA_ALPHA: f64 = 0.12;
const MIN_SAMPLE_COUNT_FOR_DELTA: u64 = 5;
const DEAD_BAND: f64 = 1.0;
const MAX_ABS_DELTA: f64 = 10.0;
const GRID_SIZE_DEGREES: f64 = 5.0;

pub type RegionKey = (i32, i32);

pub fn region_key(lat: f64, lng: f64) -> RegionKey {
    let cell = |v: f64| (v / GRID_SIZE_DEGREES).floor() as i32 * GRID_SIZE_DEGREES as i32;
    (cell(lat), cell(lng))
}

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    ema: f64,
    sample_count: u64,
}

impl Cell {
    fn observe(&mut self, value: f64) {
        self.ema = if self.sample_count == 0 {
            value
        } else {
            EMA_ALPHA * value + (1.0 - EMA_ALPHA) * self.ema
        };
        self.sample_count += 1;
    }
}

#[derive(Debug, Default)]
struct CalibratorState {
    cells: HashMap<RegionKey, Cell>,
    global: Cell,
}

/// Shared, mutable regional bias corrector. Reads (`delta`) take a shared
/// lock and never block each other; writes (`observe`) are serialized but
/// never cancelled once started (spec §4.3, §5).
pub struct RegionalCalibrator {
    state: RwLock<CalibratorState>,
}

impl RegionalCalibrator {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CalibratorState::default()),
        }
    }

    /// Records a new raw (pre-calibration) score for the region containing
    /// `(lat, lng)`. Updates both the region's EMA and the process-wide
    /// global EMA.
    pub async fn observe(&self, lat: f64, lng: f64, raw_score: f64) {
        let key = region_key(lat, lng);
        let mut state = self.state.write().await;
        state.cells.entry(key).or_default().observe(raw_score);
        state.global.observe(raw_score);
    }

    /// The score adjustment to apply for `(lat, lng)` (spec §4.3): `0` until
    /// the region has at least five observations or its EMA is within one
    /// point of the global EMA; otherwise the region's deviation from the
    /// global mean, negated and clamped to `±10`.
    pub async fn delta(&self, lat: f64, lng: f64) -> f64 {
        let key = region_key(lat, lng);
        let state = self.state.read().await;
        let Some(cell) = state.cells.get(&key) else {
            return 0.0;
        };
        if cell.sample_count < MIN_SAMPLE_COUNT_FOR_DELTA {
            return 0.0;
        }
        let deviation = cell.ema - state.global.ema;
        if deviation.abs() < DEAD_BAND {
            return 0.0;
        }
        -(deviation.clamp(-MAX_ABS_DELTA, MAX_ABS_DELTA))
    }

    /// Number of distinct grid cells observed so far, for the
    /// `calibrator_cells_total` gauge (spec §6).
    pub async fn cell_count(&self) -> usize {
        self.state.read().await.cells.len()
    }

    /// Replays the history store's last `warmup_days` of records,
    /// oldest-first, feeding each raw score back through `observe` so the
    /// calibrator starts warm instead of cold on process restart.
    pub async fn warm_up(&self, store: &dyn HistoryStore, warmup_days: i64) {
        match store.recent(warmup_days).await {
            Ok(records) => {
                for record in records {
                    self.observe(record.lat, record.lng, record.score as f64).await;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "calibrator warm-up failed, starting cold");
            }
        }
    }
}

impl Default for RegionalCalibrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_key_floors_to_grid() {
        assert_eq!(region_key(26.92, 70.90), (25, 70));
        assert_eq!(region_key(-1.0, -1.0), (-5, -5));
        assert_eq!(region_key(0.0, 0.0), (0, 0));
    }

    #[tokio::test]
    async fn delta_is_zero_below_minimum_sample_count() {
        let cal = RegionalCalibrator::new();
        for _ in 0..4 {
            cal.observe(26.92, 70.90, 90.0).await;
        }
        assert_eq!(cal.delta(26.92, 70.90).await, 0.0);
    }

    #[tokio::test]
    async fn cell_count_grows_with_distinct_regions_only() {
        let cal = RegionalCalibrator::new();
        assert_eq!(cal.cell_count().await, 0);
        cal.observe(26.92, 70.90, 80.0).await;
        cal.observe(26.92, 70.90, 85.0).await;
        cal.observe(1.0, 1.0, 60.0).await;
        assert_eq!(cal.cell_count().await, 2);
    }

    #[tokio::test]
    async fn delta_is_zero_for_unseen_region() {
        let cal = RegionalCalibrator::new();
        assert_eq!(cal.delta(1.0, 1.0).await, 0.0);
    }

    #[tokio::test]
    async fn delta_is_nonzero_once_region_diverges_from_global() {
        let cal = RegionalCalibrator::new();
        // Establish a global baseline far from the region under test.
        for _ in 0..20 {
            cal.observe(0.0, 0.0, 50.0).await;
        }
        for _ in 0..6 {
            cal.observe(26.92, 70.90, 90.0).await;
        }
        let delta = cal.delta(26.92, 70.90).await;
        // Region runs hot relative to global, so the correction is negative.
        assert!(delta < 0.0);
        assert!(delta >= -MAX_ABS_DELTA);
    }

    #[tokio::test]
    async fn delta_is_clamped_to_max_abs() {
        let cal = RegionalCalibrator::new();
        for _ in 0..20 {
            cal.observe(0.0, 0.0, 0.0).await;
        }
        for _ in 0..10 {
            cal.observe(26.92, 70.90, 100.0).await;
        }
        let delta = cal.delta(26.92, 70.90).await;
        assert!(delta >= -MAX_ABS_DELTA);
    }
}
