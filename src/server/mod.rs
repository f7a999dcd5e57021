use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub mod error;
pub mod handlers;

use crate::input::Artifacts;
use crate::pipeline::stage5_report::ChartOutput;
use crate::survey::store::SurveyStore;

#[derive(Debug, Clone)]
pub struct AppState {
    pub artifacts: Arc<Artifacts>,
    pub survey: Arc<SurveyStore>,
    pub charts: ChartOutput,
    pub chart_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(artifacts: Artifacts, survey: SurveyStore, static_dir: PathBuf) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
            survey: Arc::new(survey),
            charts: ChartOutput { static_dir },
            chart_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::survey_page))
        .route("/survey", get(handlers::survey_page))
        .route("/submit-survey", post(handlers::submit_survey))
        .route("/results", get(handlers::results_page))
        .route("/get-results", get(handlers::get_results))
        .route("/model", get(handlers::model_metrics))
        .route("/static/*path", get(handlers::static_file))
        .with_state(state)
}

pub async fn serve(bind: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[cfg(test)]
#[path = "../../tests/src_inline/server/tests.rs"]
mod tests;
