//! Remote data access.
//!
//! - World Bank REST client + the `WdiSource` trait (`worldbank`)
//! - request pacing policy (`pacer`)

pub mod pacer;
pub mod worldbank;

pub use pacer::*;
pub use worldbank::*;
