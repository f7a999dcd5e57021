pub mod charts;
pub mod text;

use serde::Serialize;

use crate::model::metrics::ClassificationMetrics;
use crate::pipeline::stage4_ipa::{AttributeSummary, IpaMeans, QuadrantStats};

/// Body of `/get-results`.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub results: ClassificationMetrics,
    pub ipa: Vec<AttributeSummary>,
    pub means: IpaMeans,
    pub quadrant_stats: Vec<QuadrantStats>,
    pub images: ImagePaths,
}

/// URL paths of the rendered charts, relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePaths {
    #[serde(rename = "Confusion Matrix")]
    pub confusion_matrix: String,
    #[serde(rename = "ROC Curve")]
    pub roc_curve: String,
    #[serde(rename = "IPA")]
    pub ipa: String,
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Two-decimal rounding with ties to even.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

pub fn format_f64_4(v: f64) -> String {
    format!("{:.4}", v)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
