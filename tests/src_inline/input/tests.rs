use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

use super::dataset::{UNNAMED_INDEX_COLUMN, load_dataset, read_dataset};
use super::importance::{ImportanceFile, ImportanceProfile, resolve_profile};
use super::*;
use crate::test_support::{fixture_dataset_csv, make_temp_dir, write_file, write_fixture_artifacts};

fn attrs(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_blank_header_becomes_unnamed_index() {
    let data = ",id, Age \n0,7, 31\n";
    let ds = read_dataset(data.as_bytes()).unwrap();
    assert_eq!(ds.columns, vec![UNNAMED_INDEX_COLUMN, "id", "Age"]);
    assert_eq!(ds.rows, vec![vec!["0", "7", "31"]]);
    assert_eq!(ds.column_index("Age"), Some(2));
}

#[test]
fn test_ragged_row_is_rejected() {
    let data = "a,b\n1,2\n3\n";
    let err = read_dataset(data.as_bytes()).unwrap_err();
    assert!(matches!(err, InputError::Csv(_)));
}

#[test]
fn test_gz_dataset_matches_plain() {
    let dir = make_temp_dir();
    let plain = dir.join("test.csv");
    let gz = dir.join("test.csv.gz");
    write_file(&plain, &fixture_dataset_csv());
    let mut enc = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
    enc.write_all(fixture_dataset_csv().as_bytes()).unwrap();
    enc.finish().unwrap();

    let a = load_dataset(&plain).unwrap();
    let b = load_dataset(&gz).unwrap();
    assert_eq!(a.columns, b.columns);
    assert_eq!(a.rows, b.rows);
    assert_eq!(a.n_rows(), 8);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = make_temp_dir();
    let err = load_dataset(&dir.join("absent.csv")).unwrap_err();
    assert!(matches!(err, InputError::Read { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn test_ipa_attributes_are_positional() {
    let ds = read_dataset(fixture_dataset_csv().as_bytes()).unwrap();
    let attributes = ipa_attributes(&ds).unwrap();
    assert_eq!(attributes.len(), 14);
    assert_eq!(attributes[0], "Inflight wifi service");
    assert_eq!(attributes[5], "Online boarding");
    assert_eq!(attributes[13], "Cleanliness");
}

#[test]
fn test_ipa_attributes_need_enough_columns() {
    let ds = read_dataset("a,b,c\n1,2,3\n".as_bytes()).unwrap();
    assert!(matches!(ipa_attributes(&ds), Err(InputError::Invalid(_))));
}

#[test]
fn test_resolve_positional_profile() {
    let mut file = ImportanceFile::new();
    file.insert("p".to_string(), ImportanceProfile::Positional(vec![1.0, 2.0]));
    let scores = resolve_profile(&file, "p", &attrs(&["x", "y"])).unwrap();
    assert_eq!(scores, vec![1.0, 2.0]);

    let err = resolve_profile(&file, "p", &attrs(&["x", "y", "z"])).unwrap_err();
    assert!(matches!(err, InputError::Invalid(_)));
}

#[test]
fn test_resolve_named_profile_follows_attribute_order() {
    let mut named = BTreeMap::new();
    named.insert("y".to_string(), 4.0);
    named.insert("x".to_string(), 3.0);
    let mut file = ImportanceFile::new();
    file.insert("n".to_string(), ImportanceProfile::Named(named));

    let scores = resolve_profile(&file, "n", &attrs(&["y", "x"])).unwrap();
    assert_eq!(scores, vec![4.0, 3.0]);
    assert!(resolve_profile(&file, "n", &attrs(&["x", "w"])).is_err());
}

#[test]
fn test_resolve_missing_profile() {
    let file = ImportanceFile::new();
    let err = resolve_profile(&file, "company_9", &attrs(&["x"])).unwrap_err();
    assert!(matches!(err, InputError::MissingProfile(ref p) if p == "company_9"));
}

#[test]
fn test_importance_json_shapes_parse() {
    let file: ImportanceFile =
        serde_json::from_str(r#"{"a": [1, 2.5], "b": {"x": 1.5}}"#).unwrap();
    assert!(matches!(file["a"], ImportanceProfile::Positional(_)));
    assert!(matches!(file["b"], ImportanceProfile::Named(_)));
}

#[test]
fn test_load_fixture_artifacts() {
    let dir = make_temp_dir();
    let paths = write_fixture_artifacts(&dir);
    let artifacts = load_artifacts(&paths).unwrap();
    assert_eq!(artifacts.dataset.n_rows(), 8);
    assert_eq!(artifacts.attributes.len(), 14);
    assert_eq!(artifacts.importance.len(), 14);
    assert_eq!(artifacts.importance[0], 4.1);
    assert_eq!(artifacts.encoder.transform("satisfied").unwrap(), 1);
}

#[test]
fn test_non_binary_encoder_rejected() {
    let dir = make_temp_dir();
    let paths = write_fixture_artifacts(&dir);
    write_file(&paths.encoder, r#"{"classes": ["a", "b", "c"]}"#);
    let err = load_artifacts(&paths).unwrap_err();
    assert!(matches!(err, InputError::Model(ModelError::NotBinary(3))));
}

#[test]
fn test_duplicate_encoder_class_rejected() {
    let dir = make_temp_dir();
    let path = dir.join("enc.json");
    write_file(&path, r#"{"classes": ["a", "a"]}"#);
    assert!(matches!(
        load_label_encoder(&path),
        Err(InputError::Model(ModelError::InvalidArtifact { .. }))
    ));
}

#[test]
fn test_scaler_length_mismatch_rejected() {
    let dir = make_temp_dir();
    let path = dir.join("scaler.json");
    write_file(&path, r#"{"columns": ["a"], "mean": [1.0, 2.0], "scale": [1.0]}"#);
    assert!(load_scaler(&path).is_err());
}

#[test]
fn test_malformed_json_reports_path() {
    let dir = make_temp_dir();
    let path = dir.join("forest.json");
    write_file(&path, "{ not json");
    let err = load_forest(&path).unwrap_err();
    assert!(matches!(err, InputError::Json { .. }));
}
