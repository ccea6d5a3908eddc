use std::sync::Arc;

use crate::config::Config;
use crate::orchestrator::Orchestrator;

/// Axum application state (spec §4.5 Pipeline Orchestrator, shared across
/// all requests). The orchestrator itself owns the regional calibrator,
/// history store and summarizer handles.
#[derive(Clone)]
pub struct SharedState {
    pub orchestrator: Arc<Orchestrator>,
    pub config: Config,
}
