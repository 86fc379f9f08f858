//! Live-stream minute data tooling.
//!
//! Two pipelines share the types in [`data`]:
//!
//! ```text
//!  chart viewer                        converter
//!  ────────────                        ─────────
//!  .xlsx / .csv                        source .json
//!      │                                   │
//!      ▼                                   ▼
//!  data::loader   → Table              convert::payload  → RawPayload
//!      │                                   │  unescape
//!      ▼                                   ▼
//!  data::series   → ChartData          InnerPayload → Table
//!      │                                   │
//!      ▼                                   ▼
//!  chart          → ChartSpec          convert::writer   → <dest>/<name>.xlsx
//! ```
//!
//! [`live_index`] lists the converter's output directory so the viewer can
//! offer the workbooks as a menu.

pub mod chart;
pub mod color;
pub mod convert;
pub mod data;
pub mod error;
pub mod live_index;

pub use error::{Error, Result};
