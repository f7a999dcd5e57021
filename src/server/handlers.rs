use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path as UrlPath, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::model::metrics::ClassificationMetrics;
use crate::pipeline::{EvalError, Evaluation, evaluate};
use crate::report::EvaluationReport;
use crate::server::AppState;
use crate::server::error::AppError;
use crate::survey::{SurveyForm, SurveyRow, SyntheticFields};

pub const SURVEY_PAGE: &str = include_str!("../../assets/survey.html");
pub const RESULTS_PAGE: &str = include_str!("../../assets/results.html");
pub const SUBMIT_OK_MESSAGE: &str = "Survey submitted and saved successfully!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitResponse {
    pub message: String,
}

pub async fn survey_page() -> Html<&'static str> {
    Html(SURVEY_PAGE)
}

pub async fn results_page() -> Html<&'static str> {
    Html(RESULTS_PAGE)
}

pub async fn submit_survey(
    State(state): State<AppState>,
    form: Result<Form<SurveyForm>, FormRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let Form(form) = form?;
    let synthetic = SyntheticFields::draw(&mut rand::thread_rng());
    let row = SurveyRow::build(&form, &synthetic)?;
    tracing::info!(
        id = form.id.as_deref().unwrap_or(""),
        customer_type = synthetic.customer_type,
        flight_distance = synthetic.flight_distance,
        satisfaction = row.satisfaction(),
        "survey received"
    );

    let store = Arc::clone(&state.survey);
    tokio::task::spawn_blocking(move || store.append(&row)).await??;

    Ok(Json(SubmitResponse {
        message: SUBMIT_OK_MESSAGE.to_string(),
    }))
}

pub async fn get_results(State(state): State<AppState>) -> Result<Json<EvaluationReport>, AppError> {
    let evaluation = run_evaluation(&state).await?;
    Ok(Json(evaluation.report))
}

pub async fn model_metrics(
    State(state): State<AppState>,
) -> Result<Json<ClassificationMetrics>, AppError> {
    let evaluation = run_evaluation(&state).await?;
    Ok(Json(evaluation.report.results))
}

pub async fn static_file(
    State(state): State<AppState>,
    UrlPath(path): UrlPath<String>,
) -> Result<Response, AppError> {
    let relative = sanitize_static_path(&path).ok_or_else(|| AppError::NotFound(path.clone()))?;
    let full = state.charts.static_dir.join(relative);
    let bytes = tokio::fs::read(&full)
        .await
        .map_err(|_| AppError::NotFound(path.clone()))?;
    Ok(([(header::CONTENT_TYPE, content_type(&full))], bytes).into_response())
}

async fn run_evaluation(state: &AppState) -> Result<Evaluation, AppError> {
    let evaluation = spawn_evaluation(state).await.await??;
    Ok(evaluation)
}

/// Starts one evaluation on the blocking pool. The chart lock is owned by
/// the blocking job, so it outlives a dropped request future.
pub async fn spawn_evaluation(state: &AppState) -> JoinHandle<Result<Evaluation, EvalError>> {
    let guard = Arc::clone(&state.chart_lock).lock_owned().await;
    let artifacts = Arc::clone(&state.artifacts);
    let charts = state.charts.clone();
    tokio::task::spawn_blocking(move || {
        let _guard = guard;
        evaluate(&artifacts, &charts)
    })
}

/// Only plain relative components are allowed.
pub fn sanitize_static_path(path: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => out.push(part),
            _ => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("html") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
