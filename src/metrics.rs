//! Process-wide counters exposed at `GET /metrics` (spec §6 HTTP Transport).
//! Follows the teacher's `prometheus_metrics` handler style (hand-built
//! HELP/TYPE text, one block per metric) rather than pulling in a metrics
//! crate, since the full set here is small and fixed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

#[derive(Default)]
pub struct Metrics {
    analyses_total: AtomicU64,
    constraint_violations_total: AtomicU64,
    provider_fallbacks_total: RwLock<HashMap<&'static str, u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_analysis(&self) {
        self.analyses_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_constraint_violations(&self, count: u64) {
        if count > 0 {
            self.constraint_violations_total.fetch_add(count, Ordering::Relaxed);
        }
    }

    pub async fn record_provider_fallback(&self, provider: &'static str) {
        let mut map = self.provider_fallbacks_total.write().await;
        *map.entry(provider).or_insert(0) += 1;
    }

    /// Renders the Prometheus text exposition format (spec §6): request
    /// counters, the labeled fallback counter, and the calibrator's
    /// current cell count as a gauge.
    pub async fn render(&self, calibrator_cells_total: usize) -> String {
        let mut out = String::with_capacity(1024);

        out.push_str("# HELP analyses_total Total number of completed site analyses\n");
        out.push_str("# TYPE analyses_total counter\n");
        out.push_str(&format!(
            "analyses_total {}\n",
            self.analyses_total.load(Ordering::Relaxed)
        ));

        out.push_str("# HELP constraint_violations_total Total hard-constraint violations across all analyses\n");
        out.push_str("# TYPE constraint_violations_total counter\n");
        out.push_str(&format!(
            "constraint_violations_total {}\n",
            self.constraint_violations_total.load(Ordering::Relaxed)
        ));

        out.push_str("# HELP provider_fallbacks_total Total times a data provider fell back to an estimate\n");
        out.push_str("# TYPE provider_fallbacks_total counter\n");
        let fallbacks = self.provider_fallbacks_total.read().await;
        for (provider, count) in fallbacks.iter() {
            out.push_str(&format!(
                "provider_fallbacks_total{{provider=\"{provider}\"}} {count}\n"
            ));
        }

        out.push_str("# HELP calibrator_cells_total Number of regional calibrator grid cells observed\n");
        out.push_str("# TYPE calibrator_cells_total gauge\n");
        out.push_str(&format!("calibrator_cells_total {calibrator_cells_total}\n"));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn render_includes_zeroed_counters_before_any_activity() {
        let metrics = Metrics::new();
        let text = metrics.render(0).await;
        assert!(text.contains("analyses_total 0"));
        assert!(text.contains("constraint_violations_total 0"));
        assert!(text.contains("calibrator_cells_total 0"));
    }

    #[tokio::test]
    async fn record_provider_fallback_is_labeled_and_counted() {
        let metrics = Metrics::new();
        metrics.record_provider_fallback("solar").await;
        metrics.record_provider_fallback("solar").await;
        metrics.record_provider_fallback("weather").await;
        let text = metrics.render(0).await;
        assert!(text.contains("provider_fallbacks_total{provider=\"solar\"} 2"));
        assert!(text.contains("provider_fallbacks_total{provider=\"weather\"} 1"));
    }

    #[test]
    fn record_analysis_and_violations_accumulate() {
        let metrics = Metrics::new();
        metrics.record_analysis();
        metrics.record_analysis();
        metrics.record_constraint_violations(3);
        assert_eq!(metrics.analyses_total.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.constraint_violations_total.load(Ordering::Relaxed), 3);
    }
}
