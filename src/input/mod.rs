use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

pub mod dataset;
pub mod importance;

use dataset::{Dataset, load_dataset};
use importance::load_importance;

use crate::model::ModelError;
use crate::model::encoder::LabelEncoder;
use crate::model::forest::RandomForest;
use crate::model::scaler::StandardScaler;

/// First service-rating column of the dataset layout.
pub const IPA_FIRST_COLUMN: usize = 8;
/// Columns after the ratings: two delays and the label.
pub const IPA_TRAILING_COLUMNS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("importance profile {0:?} not found")]
    MissingProfile(String),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub test_csv: PathBuf,
    pub forest: PathBuf,
    pub encoder: PathBuf,
    pub scaler: PathBuf,
    pub importance: PathBuf,
    pub importance_profile: String,
}

/// Everything evaluation reads; loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub dataset: Dataset,
    pub forest: RandomForest,
    pub encoder: LabelEncoder,
    pub scaler: StandardScaler,
    pub attributes: Vec<String>,
    pub importance: Vec<f64>,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let bytes = std::fs::read(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_label_encoder(path: &Path) -> Result<LabelEncoder, InputError> {
    let encoder: LabelEncoder = read_json(path)?;
    encoder.validate()?;
    Ok(encoder)
}

pub fn load_scaler(path: &Path) -> Result<StandardScaler, InputError> {
    let scaler: StandardScaler = read_json(path)?;
    scaler.validate()?;
    Ok(scaler)
}

pub fn load_forest(path: &Path) -> Result<RandomForest, InputError> {
    let forest: RandomForest = read_json(path)?;
    forest.validate()?;
    Ok(forest)
}

/// Service-rating columns used for IPA, taken positionally from the header.
pub fn ipa_attributes(dataset: &Dataset) -> Result<Vec<String>, InputError> {
    let n = dataset.columns.len();
    if n <= IPA_FIRST_COLUMN + IPA_TRAILING_COLUMNS {
        return Err(InputError::Invalid(format!(
            "dataset has {n} columns; IPA attributes need more than {}",
            IPA_FIRST_COLUMN + IPA_TRAILING_COLUMNS
        )));
    }
    Ok(dataset.columns[IPA_FIRST_COLUMN..n - IPA_TRAILING_COLUMNS].to_vec())
}

pub fn load_artifacts(paths: &ArtifactPaths) -> Result<Artifacts, InputError> {
    tracing::info!(
        test_csv = %paths.test_csv.display(),
        forest = %paths.forest.display(),
        encoder = %paths.encoder.display(),
        scaler = %paths.scaler.display(),
        "loading evaluation artifacts"
    );

    let dataset = load_dataset(&paths.test_csv)?;
    let forest = load_forest(&paths.forest)?;
    let encoder = load_label_encoder(&paths.encoder)?;
    let scaler = load_scaler(&paths.scaler)?;

    if encoder.n_classes() != 2 {
        return Err(ModelError::NotBinary(encoder.n_classes()).into());
    }
    if forest.n_classes != encoder.n_classes() {
        return Err(InputError::Invalid(format!(
            "forest predicts {} classes but the label encoder knows {}",
            forest.n_classes,
            encoder.n_classes()
        )));
    }

    let attributes = ipa_attributes(&dataset)?;
    let importance = load_importance(&paths.importance, &paths.importance_profile, &attributes)?;

    tracing::info!(
        rows = dataset.n_rows(),
        columns = dataset.columns.len(),
        trees = forest.trees.len(),
        features = forest.n_features(),
        attributes = attributes.len(),
        profile = %paths.importance_profile,
        "artifacts loaded"
    );

    Ok(Artifacts {
        dataset,
        forest,
        encoder,
        scaler,
        attributes,
        importance,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
