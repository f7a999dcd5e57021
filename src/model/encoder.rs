use serde::Deserialize;

use crate::model::ModelError;

/// Maps target labels to class indices in the order the classifier was
/// fitted with.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.classes.is_empty() {
            return Err(invalid("no classes"));
        }
        for (i, class) in self.classes.iter().enumerate() {
            if self.classes[..i].contains(class) {
                return Err(invalid(&format!("duplicate class {class:?}")));
            }
        }
        Ok(())
    }

    pub fn transform(&self, label: &str) -> Result<usize, ModelError> {
        self.classes
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| ModelError::UnknownLabel(label.to_string()))
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}

fn invalid(reason: &str) -> ModelError {
    ModelError::InvalidArtifact {
        artifact: "label encoder",
        reason: reason.to_string(),
    }
}
