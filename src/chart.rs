//! Declarative line-chart definition built from [`ChartData`].
//!
//! The viewer draws a [`ChartSpec`] with egui_plot; keeping the shaping here
//! means scaling and annotation placement are testable without a window.

use std::collections::BTreeSet;

use eframe::egui::Color32;

use crate::color::SeriesColors;
use crate::data::dictionary;
use crate::data::series::{ChartData, Series};

/// Display toggles from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    /// Scale every line to [0, 1] so lines of different magnitude share the plot.
    pub minmax_scaling: bool,
    pub show_annotations: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            minmax_scaling: false,
            show_annotations: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub field: String,
    pub name: String,
    pub color: Color32,
    /// `[point index, value]`; gaps are omitted.
    pub points: Vec<[f64; 2]>,
}

/// Annotation label pinned to one axis position.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSpec {
    pub x_title: String,
    /// Tick label per point index.
    pub x_labels: Vec<String>,
    pub lines: Vec<LineSpec>,
    pub markers: Vec<Marker>,
}

impl ChartSpec {
    /// Tick label for a plot x coordinate, only at whole point indices.
    pub fn x_label(&self, x: f64) -> Option<&str> {
        if x < 0.0 || x.fract().abs() > 1e-6 {
            return None;
        }
        self.x_labels.get(x.round() as usize).map(String::as_str)
    }
}

/// Build the chart for the series in `visible`, in series order.
///
/// Markers sit on the first visible line, or on y = 0 when no line is shown
/// or that line has a gap at the marker's position.
pub fn build(
    data: &ChartData,
    visible: &BTreeSet<String>,
    colors: &SeriesColors,
    options: ChartOptions,
) -> ChartSpec {
    let shown: Vec<(&Series, Vec<Option<f64>>)> = data
        .series
        .iter()
        .filter(|s| visible.contains(&s.field))
        .map(|s| {
            let values = if options.minmax_scaling {
                minmax_scale(&s.values)
            } else {
                s.values.clone()
            };
            (s, values)
        })
        .collect();

    let lines = shown
        .iter()
        .map(|(s, values)| LineSpec {
            field: s.field.clone(),
            name: s.label.clone(),
            color: colors.color_for(&s.field),
            points: values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|y| [i as f64, y]))
                .collect(),
        })
        .collect();

    let markers = if options.show_annotations {
        let anchor = shown.first().map(|(_, values)| values);
        data.annotations
            .iter()
            .enumerate()
            .filter_map(|(i, text)| {
                let text = text.as_ref()?;
                let y = anchor.and_then(|values| values[i]).unwrap_or(0.0);
                Some(Marker {
                    x: i as f64,
                    y,
                    text: text.clone(),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let x_title = match dictionary::lookup(&data.axis_field) {
        Some(label) => format!("{label} ({})", data.axis_field),
        None => data.axis_field.clone(),
    };

    ChartSpec {
        x_title,
        x_labels: data.axis.iter().map(|v| v.to_string()).collect(),
        lines,
        markers,
    }
}

/// Scale present values to [0, 1]; a constant series maps to 0.
fn minmax_scale(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present = values.iter().flatten();
    let min = present.clone().cloned().fold(f64::INFINITY, f64::min);
    let max = present.cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    values
        .iter()
        .map(|v| {
            v.map(|y| {
                if range.abs() < f64::EPSILON {
                    0.0
                } else {
                    (y - min) / range
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::FieldValue;

    fn series(field: &str, values: &[Option<f64>], visible: bool) -> Series {
        Series {
            field: field.to_string(),
            label: field.to_string(),
            values: values.to_vec(),
            visible_by_default: visible,
        }
    }

    fn sample() -> ChartData {
        ChartData {
            axis_field: "timeMinute".to_string(),
            axis: vec![
                FieldValue::Text("20:00".into()),
                FieldValue::Text("20:01".into()),
                FieldValue::Text("20:02".into()),
            ],
            series: vec![
                series("watchUcnt", &[Some(10.0), None, Some(30.0)], true),
                series("watchUcntRank", &[Some(1.0), Some(2.0), Some(3.0)], true),
                series("likeCnt", &[Some(5.0), Some(5.0), Some(5.0)], false),
            ],
            annotations: vec![None, Some("主C：Bob".into()), Some("主C：Alice，音乐：SongX".into())],
        }
    }

    fn defaults(data: &ChartData) -> BTreeSet<String> {
        data.default_visible().map(str::to_string).collect()
    }

    #[test]
    fn test_default_lines_and_axis_labels() {
        let data = sample();
        let colors = SeriesColors::new(&data.series);
        let spec = build(&data, &defaults(&data), &colors, ChartOptions::default());

        assert_eq!(spec.lines.len(), 2);
        assert_eq!(spec.lines[0].points, vec![[0.0, 10.0], [2.0, 30.0]]);
        assert_eq!(spec.x_labels, vec!["20:00", "20:01", "20:02"]);
        assert_eq!(spec.x_title, "时刻 (timeMinute)");
        assert_eq!(spec.x_label(1.0), Some("20:01"));
        assert_eq!(spec.x_label(1.5), None);
        assert_eq!(spec.x_label(7.0), None);
        assert_ne!(spec.lines[0].color, spec.lines[1].color);
    }

    #[test]
    fn test_markers_follow_first_visible_line() {
        let data = sample();
        let colors = SeriesColors::new(&data.series);
        let spec = build(&data, &defaults(&data), &colors, ChartOptions::default());

        assert_eq!(
            spec.markers,
            vec![
                // watchUcnt has a gap at index 1
                Marker { x: 1.0, y: 0.0, text: "主C：Bob".into() },
                Marker { x: 2.0, y: 30.0, text: "主C：Alice，音乐：SongX".into() },
            ]
        );
    }

    #[test]
    fn test_annotations_can_be_hidden() {
        let data = sample();
        let colors = SeriesColors::new(&data.series);
        let options = ChartOptions {
            show_annotations: false,
            ..ChartOptions::default()
        };
        let spec = build(&data, &defaults(&data), &colors, options);
        assert!(spec.markers.is_empty());
    }

    #[test]
    fn test_minmax_scaling() {
        let data = sample();
        let colors = SeriesColors::new(&data.series);
        let visible: BTreeSet<String> = ["watchUcnt", "likeCnt"].iter().map(|s| s.to_string()).collect();
        let options = ChartOptions {
            minmax_scaling: true,
            ..ChartOptions::default()
        };
        let spec = build(&data, &visible, &colors, options);

        assert_eq!(spec.lines[0].points, vec![[0.0, 0.0], [2.0, 1.0]]);
        // constant line
        assert_eq!(spec.lines[1].points, vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
    }

    #[test]
    fn test_no_visible_lines_puts_markers_on_zero() {
        let data = sample();
        let colors = SeriesColors::new(&data.series);
        let spec = build(&data, &BTreeSet::new(), &colors, ChartOptions::default());
        assert!(spec.lines.is_empty());
        assert!(spec.markers.iter().all(|m| m.y == 0.0));
    }
}
