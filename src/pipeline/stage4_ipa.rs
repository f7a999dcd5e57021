use serde::Serialize;

use crate::input::InputError;
use crate::input::dataset::Dataset;
use crate::model::quadrant::{Quadrant, quadrant_order};
use crate::pipeline::stage1_features::parse_number;
use crate::report::{mean, round2};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSummary {
    #[serde(rename = "Attribute")]
    pub attribute: String,
    #[serde(rename = "Importance")]
    pub importance: f64,
    #[serde(rename = "Performance")]
    pub performance: f64,
    #[serde(rename = "Quadrant")]
    pub quadrant: Quadrant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IpaMeans {
    pub importance_mean: f64,
    pub performance_mean: f64,
}

/// Per-quadrant aggregate over the attribute summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantStats {
    pub quadrant: Quadrant,
    pub count: usize,
    pub avg_importance: f64,
    pub avg_performance: f64,
    /// Share of all attributes, 0-100.
    pub percentage: f64,
}

#[derive(Debug, Clone)]
pub struct Stage4Output {
    pub attributes: Vec<AttributeSummary>,
    pub means: IpaMeans,
    pub quadrant_stats: Vec<QuadrantStats>,
}

#[derive(Debug, Clone)]
pub struct Stage4Inputs<'a> {
    pub dataset: &'a Dataset,
    pub attributes: &'a [String],
    pub importance: &'a [f64],
}

pub fn run_stage4(inputs: &Stage4Inputs<'_>) -> Result<Stage4Output, InputError> {
    if inputs.attributes.len() != inputs.importance.len() {
        return Err(InputError::Invalid(format!(
            "{} attributes but {} importance scores",
            inputs.attributes.len(),
            inputs.importance.len()
        )));
    }
    if inputs.attributes.is_empty() {
        return Err(InputError::Invalid("no IPA attributes".to_string()));
    }

    let mut performance = Vec::with_capacity(inputs.attributes.len());
    for name in inputs.attributes {
        let column = inputs
            .dataset
            .column_index(name)
            .ok_or_else(|| InputError::MissingColumn(name.clone()))?;
        performance.push(round2(column_mean(inputs.dataset, column)?));
    }

    let means = IpaMeans {
        importance_mean: round2(mean(inputs.importance)),
        performance_mean: round2(mean(&performance)),
    };

    let attributes = inputs
        .attributes
        .iter()
        .zip(inputs.importance)
        .zip(&performance)
        .map(|((name, &importance), &performance)| AttributeSummary {
            attribute: name.clone(),
            importance,
            performance,
            quadrant: Quadrant::classify(
                importance,
                performance,
                means.importance_mean,
                means.performance_mean,
            ),
        })
        .collect::<Vec<_>>();
    let quadrant_stats = quadrant_stats(&attributes);

    Ok(Stage4Output {
        attributes,
        means,
        quadrant_stats,
    })
}

/// One entry per quadrant in display order; empty quadrants report zeros.
pub fn quadrant_stats(attributes: &[AttributeSummary]) -> Vec<QuadrantStats> {
    let total = attributes.len();
    quadrant_order()
        .iter()
        .map(|&quadrant| {
            let members: Vec<&AttributeSummary> =
                attributes.iter().filter(|a| a.quadrant == quadrant).collect();
            let count = members.len();
            let avg = |f: fn(&AttributeSummary) -> f64| {
                let values: Vec<f64> = members.iter().map(|a| f(a)).collect();
                round2(mean(&values))
            };
            QuadrantStats {
                quadrant,
                count,
                avg_importance: avg(|a| a.importance),
                avg_performance: avg(|a| a.performance),
                percentage: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                },
            }
        })
        .collect()
}

/// Mean over non-empty cells; a non-numeric cell is an error.
pub fn column_mean(dataset: &Dataset, column: usize) -> Result<f64, InputError> {
    let name = &dataset.columns[column];
    let mut values = Vec::with_capacity(dataset.n_rows());
    for (line, row) in dataset.rows.iter().enumerate() {
        let cell = &row[column];
        if cell.is_empty() {
            continue;
        }
        match parse_number(cell) {
            Some(v) => values.push(v),
            None => {
                return Err(InputError::Parse(format!(
                    "non-numeric value {cell:?} in column {name:?} (row {})",
                    line + 1
                )));
            }
        }
    }
    if values.is_empty() {
        return Err(InputError::Invalid(format!("column {name:?} has no values")));
    }
    Ok(mean(&values))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_ipa.rs"]
mod tests;
