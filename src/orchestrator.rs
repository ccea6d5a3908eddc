//! Pipeline orchestrator (spec §4.5). Sequences acquisition → scoring +
//! calibration → financial projection → (summarize ‖ calibrator write ‖
//! persist), all under one overall request deadline.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::acquisition::DataAcquisition;
use crate::calibrator::RegionalCalibrator;
use crate::config::Config;
use crate::error::AppError;
use crate::financial::FinancialEngine;
use crate::history::HistoryStore;
use crate::metrics::Metrics;
use crate::models::query::Query;
use crate::models::record::AnalysisRecord;
use crate::models::wire::AnalysisResponse;
use crate::scoring;
use crate::summarizer::{Summarizer, TemplateSummarizer};

pub struct Orchestrator {
    config: Config,
    acquisition: DataAcquisition,
    calibrator: Arc<RegionalCalibrator>,
    financial: FinancialEngine,
    summarizer: Arc<dyn Summarizer>,
    history_store: Arc<dyn HistoryStore>,
    metrics: Arc<Metrics>,
}

impl Orchestrator {
    pub fn new(
        config: Config,
        calibrator: Arc<RegionalCalibrator>,
        summarizer: Arc<dyn Summarizer>,
        history_store: Arc<dyn HistoryStore>,
        metrics: Arc<Metrics>,
    ) -> Self {
        let acquisition = DataAcquisition::new(config.provider_timeout_ms, Arc::clone(&metrics));
        let financial = FinancialEngine::new(&config);
        Self {
            config,
            acquisition,
            calibrator,
            financial,
            summarizer,
            history_store,
            metrics,
        }
    }

    /// Runs the full pipeline under the overall request deadline (spec
    /// §4.5, §5). Only `InputInvalid` and `DeadlineExceeded` are allowed
    /// to surface here — every other internal failure degrades silently.
    pub async fn analyze(&self, query: Query) -> Result<AnalysisResponse, AppError> {
        query.validate()?;
        let deadline = Duration::from_millis(self.config.request_deadline_ms);
        match tokio::time::timeout(deadline, self.run(query)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::DeadlineExceeded),
        }
    }

    async fn run(&self, query: Query) -> Result<AnalysisResponse, AppError> {
        let features = self.acquisition.acquire(&query).await;

        let verdict = scoring::score(&features, &query);
        let raw_score = verdict.score;
        let delta = self.calibrator.delta(query.lat, query.lng).await;
        let verdict = scoring::apply_calibration(verdict, delta);

        self.metrics.record_analysis();
        self.metrics
            .record_constraint_violations(verdict.constraint_violations.len() as u64);

        let financial = self.financial.calculate(&query, &features);

        // The calibrator write is spawned as its own task so it is never
        // cancelled by this request's deadline or the caller disconnecting
        // (spec §4.3, §5): it still runs to completion before *this*
        // response is built under normal conditions, but outlives the
        // request future if that future is dropped.
        let calibrator = Arc::clone(&self.calibrator);
        let (lat, lng) = (query.lat, query.lng);
        let calibrator_handle = tokio::spawn(async move {
            calibrator.observe(lat, lng, raw_score as f64).await;
        });

        let (ai_summary, ai_provider) = self.summarize_with_fallback(&features, &verdict, &financial).await;
        if let Err(e) = calibrator_handle.await {
            tracing::warn!(error = %e, "calibrator observation task panicked");
        }

        let record = AnalysisRecord {
            id: 0,
            created_at: Utc::now(),
            lat: query.lat,
            lng: query.lng,
            solar_irradiance: features.solar_irradiance,
            cloud_cover_pct: features.cloud_cover_pct,
            slope_degrees: features.slope_degrees,
            grid_distance_km: features.grid_distance_km,
            score: verdict.score,
            grade: verdict.grade,
            suitability_class: verdict.suitability_class,
            confidence: verdict.confidence,
            annual_energy_kwh: financial.annual_energy_kwh,
            payback_years: financial.payback_years,
            lifetime_profit: financial.lifetime_profit,
            ai_summary: ai_summary.clone(),
            ai_provider: ai_provider.clone(),
        };
        if let Err(e) = self.history_store.append(record).await {
            tracing::warn!(error = %e, "failed to persist analysis record");
        }

        Ok(AnalysisResponse {
            verdict,
            financial,
            features,
            ai_summary,
            ai_provider,
        })
    }

    /// Calls the configured summarizer under its own timeout (spec §4.7);
    /// any failure or timeout degrades to the deterministic template
    /// rather than surfacing as a request failure (`SummarizerFailure`).
    async fn summarize_with_fallback(
        &self,
        features: &crate::models::features::Features,
        verdict: &crate::models::verdict::Verdict,
        financial: &crate::models::financial::Financial,
    ) -> (String, String) {
        let timeout = Duration::from_millis(self.config.summarizer_timeout_ms);
        let attempt = tokio::time::timeout(timeout, self.summarizer.summarize(features, verdict, financial)).await;

        match attempt {
            Ok(Ok(text)) => (text, self.summarizer.provider_name().to_string()),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "summarizer failed, using template fallback");
                self.template_fallback(features, verdict, financial).await
            }
            Err(_) => {
                tracing::warn!("summarizer timed out, using template fallback");
                self.template_fallback(features, verdict, financial).await
            }
        }
    }

    async fn template_fallback(
        &self,
        features: &crate::models::features::Features,
        verdict: &crate::models::verdict::Verdict,
        financial: &crate::models::financial::Financial,
    ) -> (String, String) {
        let template = TemplateSummarizer;
        let text = template
            .summarize(features, verdict, financial)
            .await
            .unwrap_or_else(|_| "Summary unavailable.".to_string());
        (text, template.provider_name().to_string())
    }

    /// Replays history into the calibrator at startup (spec §4.3, §4.6).
    pub async fn warm_up_calibrator(&self) {
        self.calibrator
            .warm_up(self.history_store.as_ref(), self.config.calibrator_warmup_days)
            .await;
    }

    /// Renders the Prometheus text exposition for `GET /metrics` (spec §6),
    /// combining the request counters with the calibrator's current cell
    /// count.
    pub async fn metrics_snapshot(&self) -> String {
        let cells = self.calibrator.cell_count().await;
        self.metrics.render(cells).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryHistoryStore;
    use crate::summarizer::FailingSummarizer;

    fn sample_query() -> Query {
        Query {
            lat: 26.92,
            lng: 70.90,
            plant_size_kw: 10.0,
            electricity_rate: 8.0,
            available_area_m2: Some(200.0),
            installation_cost: None,
            grid_distance_km: Some(8.0),
            panel_area: None,
            efficiency: None,
        }
    }

    fn orchestrator_with(summarizer: Arc<dyn Summarizer>) -> Orchestrator {
        Orchestrator::new(
            Config::default(),
            Arc::new(RegionalCalibrator::new()),
            summarizer,
            Arc::new(InMemoryHistoryStore::new()),
            Arc::new(Metrics::new()),
        )
    }

    #[tokio::test]
    async fn analyze_rejects_invalid_input_without_running_the_pipeline() {
        let orchestrator = orchestrator_with(Arc::new(TemplateSummarizer));
        let mut query = sample_query();
        query.plant_size_kw = 0.0;
        let result = orchestrator.analyze(query).await;
        assert!(matches!(result, Err(AppError::InputInvalid(_))));
    }

    #[tokio::test]
    async fn analyze_degrades_to_template_when_summarizer_fails() {
        let orchestrator = orchestrator_with(Arc::new(FailingSummarizer));
        let result = orchestrator.analyze(sample_query()).await.unwrap();
        assert_eq!(result.ai_provider, "template");
        assert!(!result.ai_summary.is_empty());
    }

    #[tokio::test]
    async fn analyze_produces_a_verdict_in_range() {
        let orchestrator = orchestrator_with(Arc::new(TemplateSummarizer));
        let result = orchestrator.analyze(sample_query()).await.unwrap();
        assert!((0..=100).contains(&result.verdict.score));
        assert!((0..=100).contains(&result.verdict.confidence));
    }

    #[tokio::test]
    async fn successful_analysis_is_reflected_in_the_metrics_snapshot() {
        let orchestrator = orchestrator_with(Arc::new(TemplateSummarizer));
        orchestrator.analyze(sample_query()).await.unwrap();
        let snapshot = orchestrator.metrics_snapshot().await;
        assert!(snapshot.contains("analyses_total 1"));
    }
}
