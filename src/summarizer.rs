//! External narrative summarizer (spec §4.5, §4.7). A thin collaborator
//! boundary: the orchestrator calls it under its own timeout and treats
//! any failure as `SummarizerFailure` — degrading to a deterministic
//! template rather than failing the request (spec §7).

use async_trait::async_trait;

use crate::models::features::Features;
use crate::models::financial::Financial;
use crate::models::verdict::Verdict;

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, features: &Features, verdict: &Verdict, financial: &Financial) -> Result<String, String>;

    /// Short identifier recorded on the response/record as `ai_provider`.
    fn provider_name(&self) -> &'static str;
}

/// Deterministic, template-based narrative. Used both as the production
/// default (no external LLM call configured) and as the fallback when an
/// external summarizer call fails or times out.
pub struct TemplateSummarizer;

#[async_trait]
impl Summarizer for TemplateSummarizer {
    async fn summarize(&self, features: &Features, verdict: &Verdict, financial: &Financial) -> Result<String, String> {
        Ok(format!(
            "This site scores {} ({:?}, {:?}) with {}% confidence. \
             Solar irradiance averages {:.1} kWh/m^2/day under {:.0}% cloud cover. \
             At the proposed capacity, expect {:.0} kWh/year and a payback of {}.",
            verdict.score,
            verdict.grade,
            verdict.suitability_class,
            verdict.confidence,
            features.solar_irradiance,
            features.cloud_cover_pct,
            financial.annual_energy_kwh,
            format_payback(financial.payback_years),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "template"
    }
}

fn format_payback(years: f64) -> String {
    if years.is_finite() {
        format!("{years:.1} years")
    } else {
        "never (no positive savings)".to_string()
    }
}

/// Test double that always fails, used to exercise the orchestrator's
/// `SummarizerFailure` degrade-to-template path.
#[cfg(test)]
pub struct FailingSummarizer;

#[cfg(test)]
#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _features: &Features, _verdict: &Verdict, _financial: &Financial) -> Result<String, String> {
        Err("summarizer unavailable".to_string())
    }

    fn provider_name(&self) -> &'static str {
        "failing-test-double"
    }
}
