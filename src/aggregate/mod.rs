//! Aggregation engine.
//!
//! Pure functions over a read-only `Dataset`: filter by a `Subset`, group by
//! one or more `GroupField`s and average a `Metric`.

pub mod mean;

pub use mean::*;
