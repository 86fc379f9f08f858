/// Data layer: core types, loading, and series selection.
///
/// Architecture:
/// ```text
///  .xlsx / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse first sheet → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table   │  ordered columns, Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  series  │  axis / default lines / annotations → ChartData
///   └──────────┘
/// ```
///
/// `dictionary` holds the field labels shared with the converter.

pub mod dictionary;
pub mod loader;
pub mod model;
pub mod series;
