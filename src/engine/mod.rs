//! Single-pass aggregation engine.
//!
//! Owns every accumulator for the run, reads the input exactly once through
//! one reusable line buffer, and hands the accumulators to the report builder
//! at end of stream.

mod aggregator;
mod config;

pub use aggregator::{AggregationEngine, AggregationOutcome, MalformedRecord, Phase};
pub use config::{AggregatorConfig, MalformedLinePolicy};
