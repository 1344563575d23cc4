/// Data layer: parsing, typing, outlier removal, envelope, and queries.
///
/// Architecture:
/// ```text
///   uploaded text / bundled .csv
///        │
///        ▼
///   ┌──────────┐
///   │   raw    │  split cells, skip rows/cols, header → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize │  date + time → timestamp, cells → f64 channels
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ outlier  │  IQR fence per channel → TimeSeriesTable
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ envelope │   │  query   │  range / point lookups per interaction
///   └──────────┘   └──────────┘
/// ```
///
/// `session` runs the whole chain for one input source.

pub mod envelope;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod outlier;
pub mod query;
pub mod raw;
pub mod session;
