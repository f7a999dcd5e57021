use serde::Deserialize;

use crate::model::ModelError;

/// Fitted standardization parameters, one entry per numeric column.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub columns: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.columns.len();
        if self.mean.len() != n || self.scale.len() != n {
            return Err(ModelError::InvalidArtifact {
                artifact: "scaler",
                reason: format!(
                    "columns/mean/scale lengths differ ({}/{}/{})",
                    n,
                    self.mean.len(),
                    self.scale.len()
                ),
            });
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidArtifact {
                artifact: "scaler",
                reason: "non-finite mean or scale".to_string(),
            });
        }
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn transform_value(&self, column: usize, x: f64) -> f64 {
        let scale = self.scale[column];
        let scale = if scale == 0.0 { 1.0 } else { scale };
        (x - self.mean[column]) / scale
    }
}
