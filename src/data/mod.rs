/// Data layer: core types, loading, filtering, aggregation, highlighting.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → StatDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ StatDataset │  Vec<StatRecord>, column index
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐   ┌───────────┐   ┌───────────┐
///   │  filter   │ → │ aggregate │ → │ highlight │
///   └──────────┘   └───────────┘   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  TableView: columns, rows, flags, advisories
///   └──────────┘
/// ```
///
/// The dataset is immutable once loaded; every stage produces a new view
/// (index vectors or fresh rows) and is recomputed in full per interaction.

pub mod aggregate;
pub mod columns;
pub mod filter;
pub mod highlight;
pub mod loader;
pub mod model;
pub mod view;
