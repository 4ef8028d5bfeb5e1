//! Aggregation and statistics helpers shared by the chart generators.

pub mod aggregate;
pub mod geo;
pub mod stats;
