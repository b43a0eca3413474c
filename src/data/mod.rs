//! Data layer: raw rows, loading, and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Vec<RawRow>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  validate (parse) + skip sentinel sectors + sum
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ EmissionData  │  EmissionKey → value
//!   └──────────────┘
//! ```

pub mod aggregate;
pub mod loader;
pub mod model;
pub mod parse;

pub use aggregate::{aggregate, aggregate_with, AggregateOptions, Aggregation};
pub use model::{EmissionData, EmissionKey, NestedEmissions, RawRow};
pub use parse::{EmptyValues, RowError};
