use crate::model::quadrant::quadrant_order;
use crate::pipeline::Evaluation;
use crate::report::format_f64_4;

pub fn render_report_text(eval: &Evaluation) -> String {
    let report = &eval.report;
    let mut out = String::new();

    out.push_str("Passenger Satisfaction Evaluation Report\n");
    out.push_str("========================================\n\n");

    out.push_str("1. Test set\n");
    out.push_str(&format!("Rows evaluated: {}\n", eval.rows_evaluated));
    out.push_str(&format!(
        "Rows dropped (missing values): {}\n\n",
        eval.rows_dropped
    ));

    out.push_str("2. Classifier metrics\n");
    let m = &report.results;
    for (name, value) in [
        ("Accuracy", m.accuracy),
        ("Precision", m.precision),
        ("Recall", m.recall),
        ("F1", m.f1),
        ("ROC AUC", m.auc),
        ("Cohen's kappa", m.kappa),
    ] {
        out.push_str(&format!("{name}: {}\n", format_f64_4(value)));
    }
    let [[tn, fp], [fn_, tp]] = eval.confusion.as_grid();
    out.push_str(&format!(
        "Confusion matrix (actual x predicted): TN={tn} FP={fp} FN={fn_} TP={tp}\n\n"
    ));

    out.push_str("3. Importance-Performance Analysis\n");
    out.push_str(&format!(
        "Mean importance: {:.2}\nMean performance: {:.2}\n",
        report.means.importance_mean, report.means.performance_mean
    ));
    for quadrant in quadrant_order() {
        let members: Vec<&str> = report
            .ipa
            .iter()
            .filter(|a| a.quadrant == *quadrant)
            .map(|a| a.attribute.as_str())
            .collect();
        let listed = if members.is_empty() {
            "-".to_string()
        } else {
            members.join(", ")
        };
        out.push_str(&format!("{}: {}\n", quadrant.label(), listed));
    }
    out.push('\n');
    for stats in &report.quadrant_stats {
        out.push_str(&format!(
            "{}: {} attributes ({:.1}%), avg importance {:.2}, avg performance {:.2}\n",
            stats.quadrant.label(),
            stats.count,
            stats.percentage,
            stats.avg_importance,
            stats.avg_performance
        ));
    }
    out.push('\n');

    out.push_str("4. Charts\n");
    out.push_str(&format!("{}\n", report.images.confusion_matrix));
    out.push_str(&format!("{}\n", report.images.roc_curve));
    out.push_str(&format!("{}\n", report.images.ipa));

    out
}
