use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::EvalError;
use crate::pipeline::stage3_metrics::Stage3Output;
use crate::pipeline::stage4_ipa::Stage4Output;
use crate::report::charts::{render_confusion_matrix, render_ipa_chart, render_roc_curve};
use crate::report::{EvaluationReport, ImagePaths};

/// URL prefix under which the static directory is served.
pub const STATIC_URL_PREFIX: &str = "static";
pub const IMAGES_DIR: &str = "images";
pub const CONFUSION_MATRIX_FILE: &str = "confmatrix.svg";
pub const ROC_CURVE_FILE: &str = "roccurve.svg";
pub const IPA_FILE: &str = "ipa.svg";

#[derive(Debug, Clone)]
pub struct ChartOutput {
    pub static_dir: PathBuf,
}

impl ChartOutput {
    pub fn images_dir(&self) -> PathBuf {
        self.static_dir.join(IMAGES_DIR)
    }
}

pub fn image_paths() -> ImagePaths {
    let url = |file: &str| format!("{STATIC_URL_PREFIX}/{IMAGES_DIR}/{file}");
    ImagePaths {
        confusion_matrix: url(CONFUSION_MATRIX_FILE),
        roc_curve: url(ROC_CURVE_FILE),
        ipa: url(IPA_FILE),
    }
}

/// Renders all three charts, overwriting the previous run's files.
pub fn write_charts(
    output: &ChartOutput,
    stage3: &Stage3Output,
    stage4: &Stage4Output,
) -> Result<ImagePaths, EvalError> {
    let dir = output.images_dir();
    fs::create_dir_all(&dir).map_err(|source| EvalError::Chart {
        path: dir.clone(),
        source,
    })?;

    write_chart(
        &dir.join(CONFUSION_MATRIX_FILE),
        &render_confusion_matrix(&stage3.confusion)?,
    )?;
    write_chart(
        &dir.join(ROC_CURVE_FILE),
        &render_roc_curve(&stage3.roc, stage3.metrics.auc)?,
    )?;
    write_chart(
        &dir.join(IPA_FILE),
        &render_ipa_chart(&stage4.attributes, &stage4.means)?,
    )?;

    tracing::debug!(dir = %dir.display(), "charts written");
    Ok(image_paths())
}

pub fn build_report(
    stage3: &Stage3Output,
    stage4: &Stage4Output,
    images: ImagePaths,
) -> EvaluationReport {
    EvaluationReport {
        results: stage3.metrics,
        ipa: stage4.attributes.clone(),
        means: stage4.means,
        quadrant_stats: stage4.quadrant_stats.clone(),
        images,
    }
}

fn write_chart(path: &Path, svg: &str) -> Result<(), EvalError> {
    fs::write(path, svg).map_err(|source| EvalError::Chart {
        path: path.to_path_buf(),
        source,
    })
}
