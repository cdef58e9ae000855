/// Data layer: launch table types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset  │  Vec<LaunchRecord>, sites, payload bounds
///   └───────────────┘
///        │
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌──────────┐          ┌───────────┐
///   │  filter   │          │ aggregate  │  group-by-then-count
///   └──────────┘          └───────────┘
///   payload + site            success counts,
///   → scatter subset          success rates
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
