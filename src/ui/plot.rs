use std::ops::RangeInclusive;

use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{GridMark, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};

use live_trend::chart::ChartSpec;

use crate::state::AppState;

const MARKER_COLOR: Color32 = Color32::from_rgb(230, 160, 40);

// ---------------------------------------------------------------------------
// Live-data plot (central panel)
// ---------------------------------------------------------------------------

/// Render the line chart in the central panel.
pub fn live_plot(ui: &mut Ui, state: &AppState) {
    let spec = match &state.spec {
        Some(spec) => spec,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Drop an .xlsx file here  (or File → Open…)");
            });
            return;
        }
    };

    // Tick and hover labels map point indices back to axis values.
    let ticks = ChartSpec {
        x_labels: spec.x_labels.clone(),
        ..ChartSpec::default()
    };
    let hover = ticks.clone();
    let y_title = if state.options.minmax_scaling {
        "Scaled value"
    } else {
        "Value"
    };

    Plot::new("live_plot")
        .legend(Legend::default())
        .x_axis_label(spec.x_title.clone())
        .y_axis_label(y_title)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            ticks.x_label(mark.value).unwrap_or_default().to_string()
        })
        .label_formatter(move |name: &str, value: &PlotPoint| {
            let x = hover.x_label(value.x.round()).unwrap_or_default();
            if name.is_empty() {
                format!("{x}\n{:.2}", value.y)
            } else {
                format!("{name}\n{x}: {:.2}", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for line in &spec.lines {
                let points: PlotPoints = line.points.iter().copied().collect();
                plot_ui.line(
                    Line::new(&line.name, points)
                        .color(line.color)
                        .width(1.5),
                );
            }

            if spec.markers.is_empty() {
                return;
            }
            let points: PlotPoints = spec.markers.iter().map(|m| [m.x, m.y]).collect();
            plot_ui.points(
                Points::new("主C / 音乐", points)
                    .shape(MarkerShape::Diamond)
                    .radius(5.0)
                    .color(MARKER_COLOR),
            );
            for marker in &spec.markers {
                plot_ui.text(
                    Text::new(
                        "",
                        PlotPoint::new(marker.x, marker.y),
                        RichText::new(&marker.text).small(),
                    )
                    .anchor(Align2::LEFT_BOTTOM)
                    .color(MARKER_COLOR),
                );
            }
        });
}
