use super::dictionary;
use super::model::{FieldValue, Record, Table};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Static selection
// ---------------------------------------------------------------------------

/// A field merged into the per-point annotation, rendered as `<prefix>：<value>`.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationField {
    pub field: &'static str,
    pub prefix: &'static str,
}

/// Which columns become the axis, the default lines and the annotations.
#[derive(Debug, Clone, Copy)]
pub struct SeriesSelection {
    pub axis: &'static str,
    pub default_series: &'static [&'static str],
    pub annotation_fields: &'static [AnnotationField],
}

/// Separator between annotation parts (full-width comma).
pub const ANNOTATION_SEPARATOR: &str = "，";

/// The live-data chart: minute axis, audience lines, lead/music labels.
pub const LIVE_SELECTION: SeriesSelection = SeriesSelection {
    axis: "timeMinute",
    default_series: &["watchUcnt", "watchUcntRank"],
    annotation_fields: &[
        AnnotationField {
            field: "c",
            prefix: "主C",
        },
        AnnotationField {
            field: "music",
            prefix: "音乐",
        },
    ],
};

// ---------------------------------------------------------------------------
// Selected data
// ---------------------------------------------------------------------------

/// One plottable column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub field: String,
    /// Legend name: dictionary label plus the field name.
    pub label: String,
    /// One entry per axis value; `None` is a gap.
    pub values: Vec<Option<f64>>,
    pub visible_by_default: bool,
}

/// Columns picked out of a table, aligned on the axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub axis_field: String,
    pub axis: Vec<FieldValue>,
    pub series: Vec<Series>,
    pub annotations: Vec<Option<String>>,
}

impl ChartData {
    pub fn len(&self) -> usize {
        self.axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    /// Fields of the series shown without user action.
    pub fn default_visible(&self) -> impl Iterator<Item = &str> {
        self.series
            .iter()
            .filter(|s| s.visible_by_default)
            .map(|s| s.field.as_str())
    }
}

/// Merge the annotation fields of one record into a single label.
/// Absent or blank fields are left out; nothing present → `None`.
pub fn annotation_for(
    record: &Record,
    fields: &[AnnotationField],
) -> Option<String> {
    let parts: Vec<String> = fields
        .iter()
        .filter_map(|af| {
            let value = record.get(af.field)?;
            Some(format!("{}：{}", af.prefix, value.to_string().trim()))
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(ANNOTATION_SEPARATOR))
    }
}

/// Split a table into axis values, numeric series and annotations.
///
/// Default series come first in selection order; every other column with at
/// least one numeric value follows as a hidden extra series. Records with a
/// blank axis cell are skipped.
pub fn select(table: &Table, selection: &SeriesSelection) -> Result<ChartData> {
    if !table.has_column(selection.axis) {
        return Err(Error::MissingAxis {
            column: selection.axis.to_string(),
        });
    }

    let rows: Vec<_> = table
        .records
        .iter()
        .enumerate()
        .filter(|(i, rec)| {
            let keep = rec.get(selection.axis).is_some();
            if !keep {
                log::warn!("row {}: no {} value, skipped", i + 1, selection.axis);
            }
            keep
        })
        .map(|(_, rec)| rec)
        .collect();

    let axis = rows
        .iter()
        .filter_map(|rec| rec.get(selection.axis).cloned())
        .collect();

    let column_series = |field: &str, visible: bool| Series {
        field: field.to_string(),
        label: series_label(field),
        values: rows
            .iter()
            .map(|rec| rec.get(field).and_then(FieldValue::as_f64))
            .collect(),
        visible_by_default: visible,
    };

    let mut series = Vec::new();
    for &field in selection.default_series {
        if table.has_column(field) {
            series.push(column_series(field, true));
        } else {
            log::warn!("default series {field} not present in table");
        }
    }

    let reserved = |col: &str| {
        col == selection.axis
            || selection.default_series.iter().any(|f| *f == col)
            || selection.annotation_fields.iter().any(|af| af.field == col)
    };
    for col in table.columns.iter().filter(|c| !reserved(c.as_str())) {
        let extra = column_series(col.as_str(), false);
        if extra.values.iter().any(Option::is_some) {
            series.push(extra);
        }
    }

    let annotations = rows
        .iter()
        .map(|rec| annotation_for(rec, selection.annotation_fields))
        .collect();

    Ok(ChartData {
        axis_field: selection.axis.to_string(),
        axis,
        series,
        annotations,
    })
}

fn series_label(field: &str) -> String {
    match dictionary::lookup(field) {
        Some(label) => format!("{label} ({field})"),
        None => field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, FieldValue)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn live_table() -> Table {
        let columns = ["timeMinute", "watchUcnt", "watchUcntRank", "c", "music", "likeCnt", "operatorName"];
        let records = vec![
            record(&[
                ("timeMinute", text("20:00")),
                ("watchUcnt", FieldValue::Integer(120)),
                ("watchUcntRank", FieldValue::Integer(3)),
                ("c", text("Alice")),
                ("music", text("SongX")),
                ("likeCnt", FieldValue::Integer(40)),
                ("operatorName", text("ops")),
            ]),
            record(&[
                ("timeMinute", text("20:01")),
                ("watchUcnt", FieldValue::Integer(150)),
                ("watchUcntRank", text("n/a")),
            ]),
            record(&[
                ("timeMinute", text("20:02")),
                ("watchUcnt", FieldValue::Integer(90)),
                ("watchUcntRank", FieldValue::Integer(2)),
                ("c", text("Bob")),
            ]),
        ];
        Table::new(columns.iter().map(|c| c.to_string()).collect(), records)
    }

    #[test]
    fn test_axis_in_file_order_and_two_default_lines() {
        let data = select(&live_table(), &LIVE_SELECTION).unwrap();

        assert_eq!(data.axis, vec![text("20:00"), text("20:01"), text("20:02")]);
        let defaults: Vec<&str> = data.default_visible().collect();
        assert_eq!(defaults, vec!["watchUcnt", "watchUcntRank"]);
        assert_eq!(data.series[0].values, vec![Some(120.0), Some(150.0), Some(90.0)]);
        assert_eq!(data.series[1].values, vec![Some(3.0), None, Some(2.0)]);
        assert_eq!(data.series[0].label, "进入直播间人数 (watchUcnt)");
    }

    #[test]
    fn test_extra_numeric_columns_are_hidden() {
        let data = select(&live_table(), &LIVE_SELECTION).unwrap();
        let extras: Vec<&str> = data
            .series
            .iter()
            .filter(|s| !s.visible_by_default)
            .map(|s| s.field.as_str())
            .collect();
        // operatorName has no numeric value; c/music are annotations.
        assert_eq!(extras, vec!["likeCnt"]);
    }

    #[test]
    fn test_annotations_per_point() {
        let data = select(&live_table(), &LIVE_SELECTION).unwrap();
        assert_eq!(
            data.annotations,
            vec![
                Some("主C：Alice，音乐：SongX".to_string()),
                None,
                Some("主C：Bob".to_string()),
            ]
        );
    }

    #[test]
    fn test_annotation_with_both_fields() {
        let rec = record(&[("c", text("Alice")), ("music", text("SongX"))]);
        assert_eq!(
            annotation_for(&rec, LIVE_SELECTION.annotation_fields).as_deref(),
            Some("主C：Alice，音乐：SongX")
        );
    }

    #[test]
    fn test_annotation_without_music() {
        let rec = record(&[("c", text("Alice"))]);
        assert_eq!(
            annotation_for(&rec, LIVE_SELECTION.annotation_fields).as_deref(),
            Some("主C：Alice")
        );
        let rec = record(&[("music", text("SongX"))]);
        assert_eq!(
            annotation_for(&rec, LIVE_SELECTION.annotation_fields).as_deref(),
            Some("音乐：SongX")
        );
    }

    #[test]
    fn test_empty_annotation_fields_count_as_absent() {
        let rec = record(&[("c", text("Alice")), ("music", text(""))]);
        assert_eq!(
            annotation_for(&rec, LIVE_SELECTION.annotation_fields).as_deref(),
            Some("主C：Alice")
        );
        let rec = record(&[("c", text(" ")), ("music", FieldValue::Null)]);
        assert_eq!(annotation_for(&rec, LIVE_SELECTION.annotation_fields), None);
    }

    #[test]
    fn test_missing_axis_column_fails_fast() {
        let table = Table::new(
            vec!["watchUcnt".to_string()],
            vec![record(&[("watchUcnt", FieldValue::Integer(1))])],
        );
        let err = select(&table, &LIVE_SELECTION).unwrap_err();
        assert!(matches!(err, Error::MissingAxis { ref column } if column == "timeMinute"));
    }

    #[test]
    fn test_rows_without_axis_value_are_skipped() {
        let table = Table::new(
            vec!["timeMinute".to_string(), "watchUcnt".to_string()],
            vec![
                record(&[("timeMinute", FieldValue::Integer(1)), ("watchUcnt", FieldValue::Integer(5))]),
                record(&[("watchUcnt", FieldValue::Integer(6))]),
                record(&[("timeMinute", FieldValue::Integer(3)), ("watchUcnt", FieldValue::Integer(7))]),
            ],
        );
        let data = select(&table, &LIVE_SELECTION).unwrap();
        assert_eq!(data.axis, vec![FieldValue::Integer(1), FieldValue::Integer(3)]);
        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].values, vec![Some(5.0), Some(7.0)]);
        assert_eq!(data.annotations, vec![None, None]);
    }
}
