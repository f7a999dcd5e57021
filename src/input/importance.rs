use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::input::{InputError, read_json};

/// A profile is either positional (one score per attribute, in column
/// order) or keyed by attribute name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImportanceProfile {
    Positional(Vec<f64>),
    Named(BTreeMap<String, f64>),
}

pub type ImportanceFile = BTreeMap<String, ImportanceProfile>;

pub fn load_importance(
    path: &Path,
    profile: &str,
    attributes: &[String],
) -> Result<Vec<f64>, InputError> {
    let file: ImportanceFile = read_json(path)?;
    resolve_profile(&file, profile, attributes)
}

pub fn resolve_profile(
    file: &ImportanceFile,
    profile: &str,
    attributes: &[String],
) -> Result<Vec<f64>, InputError> {
    let Some(selected) = file.get(profile) else {
        return Err(InputError::MissingProfile(profile.to_string()));
    };

    let scores = match selected {
        ImportanceProfile::Positional(values) => {
            if values.len() != attributes.len() {
                return Err(InputError::Invalid(format!(
                    "importance profile {profile:?} has {} scores but the dataset has {} attributes",
                    values.len(),
                    attributes.len()
                )));
            }
            values.clone()
        }
        ImportanceProfile::Named(map) => {
            let mut values = Vec::with_capacity(attributes.len());
            for attr in attributes {
                match map.get(attr) {
                    Some(v) => values.push(*v),
                    None => {
                        return Err(InputError::Invalid(format!(
                            "importance profile {profile:?} has no score for {attr:?}"
                        )));
                    }
                }
            }
            values
        }
    };

    if scores.iter().any(|v| !v.is_finite()) {
        return Err(InputError::Invalid(format!(
            "importance profile {profile:?} contains a non-finite score"
        )));
    }
    Ok(scores)
}
