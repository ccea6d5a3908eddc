mod acquisition;
mod api_docs;
mod calibrator;
mod config;
mod controllers;
mod error;
mod financial;
mod history;
mod metrics;
mod models;
mod orchestrator;
mod routes;
mod scoring;
mod shared_state;
mod summarizer;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::calibrator::RegionalCalibrator;
use crate::config::Config;
use crate::history::InMemoryHistoryStore;
use crate::metrics::Metrics;
use crate::orchestrator::Orchestrator;
use crate::routes::api_routes;
use crate::shared_state::SharedState;
use crate::summarizer::TemplateSummarizer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match Config::load("config.json") {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to load config.json");
            return;
        }
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            tracing::error!(%e, "invalid configuration");
        }
        return;
    }

    let calibrator = Arc::new(RegionalCalibrator::new());
    let history_store = Arc::new(InMemoryHistoryStore::new());
    let summarizer = Arc::new(TemplateSummarizer);
    let metrics = Arc::new(Metrics::new());

    let orchestrator = Arc::new(Orchestrator::new(
        config.clone(),
        Arc::clone(&calibrator),
        summarizer,
        history_store,
        metrics,
    ));

    tracing::info!("warming up regional calibrator");
    orchestrator.warm_up_calibrator().await;

    let server_port = config.server.port;
    let state = SharedState {
        orchestrator,
        config: config.clone(),
    };

    let app = Router::new()
        .merge(api_routes(state))
        .route(
            "/scalar",
            get(|| async { Html(Scalar::new(ApiDoc::openapi()).to_html()) }),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    tracing::info!(%addr, "solar-site-analyzer listening");
    tracing::info!(scalar_ui = %format!("http://{addr}/scalar"), "API docs available");

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
