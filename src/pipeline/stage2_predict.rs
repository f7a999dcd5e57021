use crate::model::ModelError;
use crate::model::forest::{RandomForest, argmax};
use crate::pipeline::stage1_features::FeatureMatrix;

pub const POSITIVE_CLASS: usize = 1;

#[derive(Debug, Clone)]
pub struct Predictions {
    pub predicted: Vec<usize>,
    pub proba_positive: Vec<f64>,
}

pub fn run_stage2(forest: &RandomForest, features: &FeatureMatrix) -> Result<Predictions, ModelError> {
    if features.rows.is_empty() {
        return Err(ModelError::EmptyEvaluation);
    }
    if features.feature_names.len() != forest.n_features() {
        return Err(ModelError::InvalidArtifact {
            artifact: "random forest",
            reason: format!(
                "expects {} features, feature matrix has {}",
                forest.n_features(),
                features.feature_names.len()
            ),
        });
    }

    let mut predicted = Vec::with_capacity(features.rows.len());
    let mut proba_positive = Vec::with_capacity(features.rows.len());
    for row in &features.rows {
        let proba = forest.predict_proba(row);
        predicted.push(argmax(&proba));
        proba_positive.push(proba[POSITIVE_CLASS]);
    }

    Ok(Predictions {
        predicted,
        proba_positive,
    })
}
