use super::*;

fn stump(threshold: f64, left: [f64; 2], right: [f64; 2]) -> DecisionTree {
    DecisionTree {
        children_left: vec![1, -1, -1],
        children_right: vec![2, -1, -1],
        feature: vec![0, -2, -2],
        threshold: vec![threshold, -2.0, -2.0],
        value: vec![vec![1.0, 1.0], left.to_vec(), right.to_vec()],
    }
}

fn forest(trees: Vec<DecisionTree>) -> RandomForest {
    RandomForest {
        n_classes: 2,
        feature_names: vec!["x".to_string()],
        trees,
    }
}

#[test]
fn test_leaf_routing_uses_less_or_equal() {
    let tree = stump(0.5, [3.0, 1.0], [1.0, 3.0]);
    assert_eq!(tree.leaf_for(&[0.5]), 1);
    assert_eq!(tree.leaf_for(&[0.50001]), 2);
    assert_eq!(tree.leaf_for(&[-10.0]), 1);
}

#[test]
fn test_single_precision_rounding_before_compare() {
    // 0.1f32 widened is slightly above 0.1f64.
    let threshold = 0.1f32 as f64;
    let tree = stump(threshold, [1.0, 0.0], [0.0, 1.0]);
    assert_eq!(tree.leaf_for(&[0.1]), 1);
}

#[test]
fn test_proba_is_mean_of_normalized_leaves() {
    let f = forest(vec![
        stump(0.0, [8.0, 2.0], [0.0, 5.0]),
        stump(10.0, [1.0, 1.0], [0.0, 1.0]),
    ]);
    f.validate().unwrap();
    let proba = f.predict_proba(&[5.0]);
    // tree 1 -> right leaf [0, 1]; tree 2 -> left leaf [0.5, 0.5]
    assert!((proba[0] - 0.25).abs() < 1e-12);
    assert!((proba[1] - 0.75).abs() < 1e-12);
    assert_eq!(argmax(&proba), 1);
}

#[test]
fn test_argmax_tie_prefers_lowest_class() {
    assert_eq!(argmax(&[0.5, 0.5]), 0);
    assert_eq!(argmax(&[0.2, 0.3, 0.3]), 1);
    let f = forest(vec![stump(0.0, [1.0, 1.0], [1.0, 1.0])]);
    assert_eq!(argmax(&f.predict_proba(&[1.0])), 0);
}

#[test]
fn test_validate_rejects_backward_child() {
    let mut tree = stump(0.5, [1.0, 0.0], [0.0, 1.0]);
    tree.children_left[0] = 0;
    let err = forest(vec![tree]).validate().unwrap_err();
    assert!(err.to_string().contains("out-of-order child"));
}

#[test]
fn test_validate_rejects_unknown_feature() {
    let mut tree = stump(0.5, [1.0, 0.0], [0.0, 1.0]);
    tree.feature[0] = 3;
    assert!(forest(vec![tree]).validate().is_err());
}

#[test]
fn test_validate_rejects_half_leaf_and_bad_value_width() {
    let mut tree = stump(0.5, [1.0, 0.0], [0.0, 1.0]);
    tree.children_right[0] = -1;
    assert!(forest(vec![tree]).validate().is_err());

    let mut tree = stump(0.5, [1.0, 0.0], [0.0, 1.0]);
    tree.value[1] = vec![1.0];
    assert!(forest(vec![tree]).validate().is_err());
}

#[test]
fn test_validate_rejects_empty_forest_and_empty_leaf() {
    assert!(forest(vec![]).validate().is_err());
    let tree = stump(0.5, [0.0, 0.0], [0.0, 1.0]);
    assert!(forest(vec![tree]).validate().is_err());
}

#[test]
fn test_deserialize_from_json() {
    let f: RandomForest = serde_json::from_str(crate::test_support::FOREST_JSON).unwrap();
    f.validate().unwrap();
    assert_eq!(f.n_features(), 5);
    assert_eq!(f.trees[0].n_nodes(), 5);
}
