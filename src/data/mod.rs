/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RestaurantDataset (memoized per path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ RestaurantDataset │  Vec<Restaurant>, cuisine index
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  cuisine tags + cost ceiling → row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  View → Summary, rankings, counts, histogram
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
