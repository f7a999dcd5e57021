use crate::model::ModelError;
use crate::model::metrics::{ClassificationMetrics, ConfusionMatrix, RocPoint};
use crate::pipeline::stage2_predict::{POSITIVE_CLASS, Predictions};

#[derive(Debug, Clone)]
pub struct Stage3Output {
    pub metrics: ClassificationMetrics,
    pub confusion: ConfusionMatrix,
    pub roc: Vec<RocPoint>,
}

pub fn run_stage3(y_true: &[usize], predictions: &Predictions) -> Result<Stage3Output, ModelError> {
    let confusion = ConfusionMatrix::from_labels(y_true, &predictions.predicted);
    let auc = roc_auc(y_true, &predictions.proba_positive)?;
    let roc = roc_curve(y_true, &predictions.proba_positive);

    let metrics = ClassificationMetrics {
        accuracy: confusion.accuracy(),
        precision: confusion.precision(),
        recall: confusion.recall(),
        f1: confusion.f1(),
        auc,
        kappa: confusion.cohen_kappa(),
    };

    Ok(Stage3Output {
        metrics,
        confusion,
        roc,
    })
}

/// Mann-Whitney form of the ROC area; tied scores share their average rank.
pub fn roc_auc(y_true: &[usize], scores: &[f64]) -> Result<f64, ModelError> {
    let n_pos = y_true.iter().filter(|&&y| y == POSITIVE_CLASS).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(ModelError::SingleClass);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut rank_sum_pos = 0.0f64;
    let mut i = 0usize;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        // ranks are 1-based
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            if y_true[idx] == POSITIVE_CLASS {
                rank_sum_pos += avg_rank;
            }
        }
        i = j + 1;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Ok((rank_sum_pos - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

/// One point per distinct score threshold, highest first, from (0,0).
pub fn roc_curve(y_true: &[usize], scores: &[f64]) -> Vec<RocPoint> {
    let n_pos = y_true.iter().filter(|&&y| y == POSITIVE_CLASS).count();
    let n_neg = y_true.len() - n_pos;
    let mut points = vec![RocPoint { fpr: 0.0, tpr: 0.0 }];
    if n_pos == 0 || n_neg == 0 {
        points.push(RocPoint { fpr: 1.0, tpr: 1.0 });
        return points;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut tp = 0usize;
    let mut fp = 0usize;
    for (k, &idx) in order.iter().enumerate() {
        if y_true[idx] == POSITIVE_CLASS {
            tp += 1;
        } else {
            fp += 1;
        }
        let last_of_threshold = order
            .get(k + 1)
            .is_none_or(|&next| scores[next] != scores[idx]);
        if last_of_threshold {
            points.push(RocPoint {
                fpr: fp as f64 / n_neg as f64,
                tpr: tp as f64 / n_pos as f64,
            });
        }
    }
    points
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_metrics.rs"]
mod tests;
