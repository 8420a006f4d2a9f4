/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///   gem_cleaned_2025.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode + parse → Dataset (cached per path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, Schema, categorical value index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → FilteredDataset (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  capacity by status / by start year (GW)
///   └───────────┘
/// ```

pub mod aggregate;
pub mod columns;
pub mod filter;
pub mod loader;
pub mod model;
