//! Long-to-wide reshaping of fetched observations.

pub mod pivot;

pub use pivot::*;
