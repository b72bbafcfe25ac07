/// Data layer: row types, loading, grouping, threshold filter and export.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv / .json / .parquet   (one or more files)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse each file (one thread per file) → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  group    │  partition rows by EAN, first-seen order
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  sort each group by price, keep rows ≤ threshold
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  ExportRows → xlsx (Arkusz1) or csv
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod group;
pub mod loader;
pub mod model;
