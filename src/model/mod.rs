pub mod encoder;
pub mod forest;
pub mod metrics;
pub mod quadrant;
pub mod scaler;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid {artifact}: {reason}")]
    InvalidArtifact {
        artifact: &'static str,
        reason: String,
    },

    #[error("label {0:?} is not known to the label encoder")]
    UnknownLabel(String),

    #[error("model feature {0:?} matches no numeric column and no categorical dummy")]
    UnknownFeature(String),

    #[error("scaler column {0:?} is not a numeric dataset column")]
    MissingScalerColumn(String),

    #[error("binary evaluation needs exactly 2 classes, got {0}")]
    NotBinary(usize),

    #[error("ROC AUC is undefined when only one class is present in the ground truth")]
    SingleClass,

    #[error("no rows left to evaluate after preprocessing")]
    EmptyEvaluation,
}
