use super::*;
use crate::input::load_artifacts;
use crate::model::quadrant::Quadrant;
use crate::pipeline::stage5_report::{IPA_FILE, image_paths};
use crate::test_support::{make_temp_dir, write_fixture_artifacts};

fn run_fixture() -> (Evaluation, ChartOutput) {
    let dir = make_temp_dir();
    let artifacts = load_artifacts(&write_fixture_artifacts(&dir)).unwrap();
    let charts = ChartOutput {
        static_dir: dir.join("static"),
    };
    (evaluate(&artifacts, &charts).unwrap(), charts)
}

#[test]
fn test_full_evaluation() {
    let (eval, charts) = run_fixture();
    assert_eq!(eval.rows_evaluated, 7);
    assert_eq!(eval.rows_dropped, 1);
    assert_eq!(eval.confusion.true_positives, 2);
    assert_eq!(eval.confusion.true_negatives, 3);

    let m = eval.report.results;
    for v in [m.accuracy, m.precision, m.recall, m.f1, m.auc] {
        assert!((0.0..=1.0).contains(&v));
    }
    assert!((m.auc - 2.0 / 3.0).abs() < 1e-12);

    assert_eq!(eval.report.images, image_paths());
    assert_eq!(eval.report.images.ipa, "static/images/ipa.svg");
    for file in ["confmatrix.svg", "roccurve.svg", IPA_FILE] {
        let path = charts.images_dir().join(file);
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"), "{}", path.display());
    }
    assert_eq!(eval.report.ipa[5].quadrant, Quadrant::GoodWork);
}

#[test]
fn test_repeated_runs_agree() {
    let (a, _) = run_fixture();
    let (b, _) = run_fixture();
    assert_eq!(a.report.results, b.report.results);
    assert_eq!(a.report.ipa, b.report.ipa);
    assert_eq!(a.confusion, b.confusion);
}

#[test]
fn test_report_json_shape() {
    let (eval, _) = run_fixture();
    let json = serde_json::to_value(&eval.report).unwrap();
    for key in ["accuracy", "precision", "recall", "f1", "auc", "kappa"] {
        assert!(json["results"][key].is_number(), "{key}");
    }
    assert!(json["ipa"].is_array());
    assert_eq!(json["quadrant_stats"][1]["quadrant"], "Good Work");
    assert_eq!(json["quadrant_stats"][1]["count"], 1);
    assert_eq!(json["images"]["Confusion Matrix"], "static/images/confmatrix.svg");
    assert_eq!(json["images"]["ROC Curve"], "static/images/roccurve.svg");
}

#[test]
fn test_text_report_lists_quadrants() {
    let (eval, _) = run_fixture();
    let text = crate::report::text::render_report_text(&eval);
    assert!(text.contains("Rows evaluated: 7"));
    assert!(text.contains("TN=3 FP=1 FN=1 TP=2"));
    assert!(text.contains("Good Work: Online boarding"));
    assert!(text.contains("Possible Overkill: -"));
    assert!(text.contains("Concentrate Here: 7 attributes (50.0%)"));
    assert!(text.contains("Good Work: 1 attributes (7.1%), avg importance 4.30, avg performance 3.25"));
}
