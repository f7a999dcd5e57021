use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::model::metrics::{ConfusionMatrix, RocPoint};
use crate::model::quadrant::{Quadrant, quadrant_order};
use crate::pipeline::stage4_ipa::{AttributeSummary, IpaMeans};

const CLASS_LABELS: [&str; 2] = ["Neutral/Dissatisfied", "Satisfied"];
const FONT: &str = "sans-serif";
const CHANCE_GREY: RGBColor = RGBColor(128, 128, 128);
const ROC_ORANGE: RGBColor = RGBColor(255, 140, 0);

#[derive(Debug, thiserror::Error)]
#[error("chart rendering failed: {0}")]
pub struct ChartError(String);

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError(err.to_string())
    }
}

/// Heatmap with actual class on rows (top is class 0) and predicted class on
/// columns.
pub fn render_confusion_matrix(cm: &ConfusionMatrix) -> Result<String, ChartError> {
    let grid = cm.as_grid();
    let max = grid.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;

    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, (600, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Confusion Matrix", (FONT, 24))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(
                KeyPointAxis((0f64..2f64).with_key_points(vec![0.5, 1.5])),
                KeyPointAxis((0f64..2f64).with_key_points(vec![0.5, 1.5])),
            )?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Predicted")
            .y_desc("Actual")
            .x_label_formatter(&|v| class_label(*v, false))
            .y_label_formatter(&|v| class_label(*v, true))
            .draw()?;

        for (r, row) in grid.iter().enumerate() {
            for (c, &count) in row.iter().enumerate() {
                let intensity = count as f64 / max;
                let x = c as f64;
                // row 0 is drawn on top
                let y = 1.0 - r as f64;
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x, y), (x + 1.0, y + 1.0)],
                    blues(intensity).filled(),
                )))?;
                let fill = if intensity > 0.5 { WHITE } else { BLACK };
                let style = TextStyle::from((FONT, 22).into_font())
                    .color(&fill)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                chart.draw_series(std::iter::once(Text::new(
                    count.to_string(),
                    (x + 0.5, y + 0.5),
                    style,
                )))?;
            }
        }

        root.present()?;
    }
    Ok(out)
}

/// ROC curve against the chance diagonal, AUC in the legend.
pub fn render_roc_curve(points: &[RocPoint], auc: f64) -> Result<String, ChartError> {
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, (800, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("ROC Curve", (FONT, 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..1f64, 0f64..1.05f64)?;

        chart
            .configure_mesh()
            .x_desc("False Positive Rate")
            .y_desc("True Positive Rate")
            .draw()?;

        chart
            .draw_series(DashedLineSeries::new(
                vec![(0.0, 0.0), (1.0, 1.0)],
                6,
                4,
                CHANCE_GREY.stroke_width(1),
            ))?
            .label("Chance")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CHANCE_GREY));

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.fpr, p.tpr)),
                ROC_ORANGE.stroke_width(2),
            ))?
            .label(format!("AUC = {:.2}", auc))
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], ROC_ORANGE.stroke_width(2))
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
    }
    Ok(out)
}

/// Performance on x, importance on y, dashed lines at both means.
pub fn render_ipa_chart(
    attributes: &[AttributeSummary],
    means: &IpaMeans,
) -> Result<String, ChartError> {
    let x_range = padded_range(
        attributes
            .iter()
            .map(|a| a.performance)
            .chain([means.performance_mean]),
    );
    let y_range = padded_range(
        attributes
            .iter()
            .map(|a| a.importance)
            .chain([means.importance_mean]),
    );

    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, (800, 800)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Importance-Performance Analysis (IPA)", (FONT, 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

        chart
            .configure_mesh()
            .x_desc("Performance")
            .y_desc("Importance")
            .draw()?;

        chart
            .draw_series(DashedLineSeries::new(
                vec![
                    (x_range.0, means.importance_mean),
                    (x_range.1, means.importance_mean),
                ],
                8,
                5,
                RED.stroke_width(1),
            ))?
            .label("Mean Importance")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
        chart
            .draw_series(DashedLineSeries::new(
                vec![
                    (means.performance_mean, y_range.0),
                    (means.performance_mean, y_range.1),
                ],
                8,
                5,
                RED.stroke_width(1),
            ))?
            .label("Mean Performance")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        for &quadrant in quadrant_order() {
            let color = quadrant_color(quadrant);
            chart
                .draw_series(
                    attributes
                        .iter()
                        .filter(|a| a.quadrant == quadrant)
                        .map(|a| {
                            EmptyElement::at((a.performance, a.importance))
                                + Circle::new((0, 0), 6, color.filled())
                                + Text::new(a.attribute.clone(), (8, -14), (FONT, 11).into_font())
                        }),
                )?
                .label(quadrant.label())
                .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
    }
    Ok(out)
}

/// Forwards to `WithKeyPoints`; exists only so the axis satisfies plotters'
/// `ValueFormatter` bound (labels come from the custom formatters above).
struct KeyPointAxis(WithKeyPoints<RangedCoordf64>);

impl Ranged for KeyPointAxis {
    type ValueType = f64;
    type FormatOption = DefaultFormatting;

    fn range(&self) -> std::ops::Range<f64> {
        self.0.range()
    }

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> std::ops::Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

fn class_label(v: f64, flipped: bool) -> String {
    let idx = if v < 1.0 { 0 } else { 1 };
    let idx = if flipped { 1 - idx } else { idx };
    CLASS_LABELS[idx].to_string()
}

fn quadrant_color(q: Quadrant) -> RGBColor {
    let (r, g, b) = q.rgb();
    RGBColor(r, g, b)
}

/// White-to-navy ramp for `t` in [0, 1].
fn blues(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(mix(247.0, 8.0), mix(251.0, 48.0), mix(255.0, 107.0))
}

/// Data range widened by 10% per side so points never sit on the frame.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.1 } else { 0.5 };
    (lo - pad, hi + pad)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/charts.rs"]
mod tests;
