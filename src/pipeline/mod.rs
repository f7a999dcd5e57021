use std::path::PathBuf;
use std::time::Instant;

pub mod stage1_features;
pub mod stage2_predict;
pub mod stage3_metrics;
pub mod stage4_ipa;
pub mod stage5_report;

use crate::input::{Artifacts, InputError};
use crate::model::ModelError;
use crate::model::metrics::ConfusionMatrix;
use crate::report::EvaluationReport;
use crate::report::charts::ChartError;
use stage1_features::{Stage1Inputs, run_stage1};
use stage2_predict::run_stage2;
use stage3_metrics::run_stage3;
use stage4_ipa::{Stage4Inputs, run_stage4};
use stage5_report::{ChartOutput, build_report, write_charts};

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Render(#[from] ChartError),

    #[error("failed to write chart {path}: {source}")]
    Chart {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One request-scoped evaluation run.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub report: EvaluationReport,
    pub confusion: ConfusionMatrix,
    pub rows_evaluated: usize,
    pub rows_dropped: usize,
}

pub fn evaluate(artifacts: &Artifacts, charts: &ChartOutput) -> Result<Evaluation, EvalError> {
    let started = Instant::now();

    let features = run_stage1(&Stage1Inputs {
        dataset: &artifacts.dataset,
        encoder: &artifacts.encoder,
        scaler: &artifacts.scaler,
        feature_names: &artifacts.forest.feature_names,
    })?;
    let predictions = run_stage2(&artifacts.forest, &features)?;
    let stage3 = run_stage3(&features.labels, &predictions)?;
    let stage4 = run_stage4(&Stage4Inputs {
        dataset: &artifacts.dataset,
        attributes: &artifacts.attributes,
        importance: &artifacts.importance,
    })?;
    let images = write_charts(charts, &stage3, &stage4)?;
    let report = build_report(&stage3, &stage4, images);

    tracing::info!(
        rows = features.rows.len(),
        dropped = features.dropped_rows,
        accuracy = report.results.accuracy,
        auc = report.results.auc,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "evaluation finished"
    );

    Ok(Evaluation {
        report,
        confusion: stage3.confusion,
        rows_evaluated: features.rows.len(),
        rows_dropped: features.dropped_rows,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/evaluate.rs"]
mod tests;
