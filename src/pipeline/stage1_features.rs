use crate::input::dataset::{Dataset, UNNAMED_INDEX_COLUMN};
use crate::input::InputError;
use crate::model::ModelError;
use crate::model::encoder::LabelEncoder;
use crate::model::scaler::StandardScaler;
use crate::pipeline::EvalError;

pub const LABEL_COLUMN: &str = "satisfaction";
const DROPPED_COLUMNS: &[&str] = &[UNNAMED_INDEX_COLUMN, "id"];

#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<usize>,
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq)]
enum FeatureSource {
    Numeric { column: usize, scaler: Option<usize> },
    Dummy { column: usize, value: String },
}

#[derive(Debug, Clone)]
pub struct Stage1Inputs<'a> {
    pub dataset: &'a Dataset,
    pub encoder: &'a LabelEncoder,
    pub scaler: &'a StandardScaler,
    pub feature_names: &'a [String],
}

pub fn run_stage1(inputs: &Stage1Inputs<'_>) -> Result<FeatureMatrix, EvalError> {
    let dataset = inputs.dataset;
    let label_col = dataset
        .column_index(LABEL_COLUMN)
        .ok_or_else(|| InputError::MissingColumn(LABEL_COLUMN.to_string()))?;

    let kept: Vec<usize> = (0..dataset.columns.len())
        .filter(|&c| c != label_col && !DROPPED_COLUMNS.contains(&dataset.columns[c].as_str()))
        .collect();
    let kinds: Vec<(usize, ColumnKind)> = kept
        .iter()
        .map(|&c| (c, column_kind(dataset, c)))
        .collect();
    let numeric: Vec<usize> = kinds
        .iter()
        .filter(|(_, k)| *k == ColumnKind::Numeric)
        .map(|(c, _)| *c)
        .collect();

    for name in &inputs.scaler.columns {
        let found = numeric.iter().any(|&c| dataset.columns[c] == *name);
        if !found {
            return Err(ModelError::MissingScalerColumn(name.clone()).into());
        }
    }
    for &c in &numeric {
        if inputs.scaler.column_index(&dataset.columns[c]).is_none() {
            tracing::debug!(column = %dataset.columns[c], "numeric column left unscaled");
        }
    }

    let sources = inputs
        .feature_names
        .iter()
        .map(|name| resolve_feature(dataset, &kinds, inputs.scaler, name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::with_capacity(dataset.n_rows());
    let mut labels = Vec::with_capacity(dataset.n_rows());
    let mut dropped_rows = 0usize;
    let mut parsed = vec![None; dataset.columns.len()];

    for row in &dataset.rows {
        let label = inputs.encoder.transform(&row[label_col])?;

        let mut complete = true;
        for &c in &numeric {
            parsed[c] = parse_number(&row[c]);
            if parsed[c].is_none() {
                complete = false;
            }
        }
        if !complete {
            dropped_rows += 1;
            continue;
        }

        let mut features = Vec::with_capacity(sources.len());
        for source in &sources {
            let v = match source {
                FeatureSource::Numeric { column, scaler } => {
                    let x = parsed[*column].unwrap_or(0.0);
                    match scaler {
                        Some(idx) => inputs.scaler.transform_value(*idx, x),
                        None => x,
                    }
                }
                FeatureSource::Dummy { column, value } => {
                    if row[*column] == *value {
                        1.0
                    } else {
                        0.0
                    }
                }
            };
            features.push(v);
        }
        rows.push(features);
        labels.push(label);
    }

    if dropped_rows > 0 {
        tracing::warn!(dropped_rows, "rows with missing numeric values dropped");
    }

    Ok(FeatureMatrix {
        feature_names: inputs.feature_names.to_vec(),
        rows,
        labels,
        dropped_rows,
    })
}

/// Numeric when every non-empty cell parses as a number.
pub fn column_kind(dataset: &Dataset, column: usize) -> ColumnKind {
    for row in &dataset.rows {
        let cell = &row[column];
        if !cell.is_empty() && cell.parse::<f64>().is_err() {
            return ColumnKind::Categorical;
        }
    }
    ColumnKind::Numeric
}

pub fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn resolve_feature(
    dataset: &Dataset,
    kinds: &[(usize, ColumnKind)],
    scaler: &StandardScaler,
    name: &str,
) -> Result<FeatureSource, ModelError> {
    for &(c, kind) in kinds {
        if kind == ColumnKind::Numeric && dataset.columns[c] == name {
            return Ok(FeatureSource::Numeric {
                column: c,
                scaler: scaler.column_index(name),
            });
        }
    }

    // Longest column-name prefix wins so "Type of Travel_x" never binds to "Type_".
    let mut best: Option<(usize, usize)> = None;
    for &(c, kind) in kinds {
        if kind != ColumnKind::Categorical {
            continue;
        }
        let col = &dataset.columns[c];
        let matches = name.len() > col.len() + 1
            && name.starts_with(col.as_str())
            && name.as_bytes()[col.len()] == b'_';
        if matches && best.is_none_or(|(_, len)| col.len() > len) {
            best = Some((c, col.len()));
        }
    }

    match best {
        Some((c, len)) => Ok(FeatureSource::Dummy {
            column: c,
            value: name[len + 1..].to_string(),
        }),
        None => Err(ModelError::UnknownFeature(name.to_string())),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_features.rs"]
mod tests;
