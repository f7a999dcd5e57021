use serde::Deserialize;

use crate::model::ModelError;

const LEAF: i64 = -1;

/// One fitted tree in parallel-array layout. Node 0 is the root; a node is
/// a leaf when both children are `-1`.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    pub n_classes: usize,
    pub feature_names: Vec<String>,
    pub trees: Vec<DecisionTree>,
}

impl DecisionTree {
    pub fn n_nodes(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.n_nodes();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("node arrays have different lengths".to_string());
        }

        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];
            if (left == LEAF) != (right == LEAF) {
                return Err(format!("node {node} has exactly one child"));
            }
            if self.value[node].len() != n_classes {
                return Err(format!(
                    "node {node} value has {} entries, expected {n_classes}",
                    self.value[node].len()
                ));
            }
            if left == LEAF {
                let total: f64 = self.value[node].iter().sum();
                if self.value[node].iter().any(|v| *v < 0.0) || total <= 0.0 {
                    return Err(format!("leaf {node} has no class mass"));
                }
                continue;
            }
            // Children always sit after their parent, which also rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {node} has out-of-order child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {node} splits on unknown feature {feature}"));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {node} has a non-finite threshold"));
            }
        }
        Ok(())
    }

    pub fn leaf_for(&self, x: &[f64]) -> usize {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            // Splits were learned on single-precision inputs.
            let v = x[feature] as f32 as f64;
            node = if v <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    fn accumulate_proba(&self, x: &[f64], acc: &mut [f64]) {
        let leaf = &self.value[self.leaf_for(x)];
        let total: f64 = leaf.iter().sum();
        for (slot, v) in acc.iter_mut().zip(leaf) {
            *slot += v / total;
        }
    }
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_classes < 2 {
            return Err(invalid(format!("n_classes is {}", self.n_classes)));
        }
        if self.feature_names.is_empty() {
            return Err(invalid("no feature names".to_string()));
        }
        if self.trees.is_empty() {
            return Err(invalid("no trees".to_string()));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.feature_names.len(), self.n_classes)
                .map_err(|reason| invalid(format!("tree {idx}: {reason}")))?;
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Mean of the per-tree leaf class distributions.
    pub fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.n_features());
        let mut acc = vec![0.0f64; self.n_classes];
        for tree in &self.trees {
            tree.accumulate_proba(x, &mut acc);
        }
        let n_trees = self.trees.len() as f64;
        for v in &mut acc {
            *v /= n_trees;
        }
        acc
    }
}

/// Index of the largest value; the lowest index wins ties.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0usize;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

fn invalid(reason: String) -> ModelError {
    ModelError::InvalidArtifact {
        artifact: "random forest",
        reason,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/forest.rs"]
mod tests;
