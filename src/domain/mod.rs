//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - income classification tiers and resolved countries (`IncomeTier`, `Country`)
//! - indicator definitions and long-format observations (`IndicatorDef`, `Observation`)
//! - the run configuration (`CollectConfig`, `OutputMode`)
//! - per-indicator fetch outcomes (`FetchReport`)

pub mod types;

pub use types::*;
