//! Output file writers (CSV + plain text).

pub mod export;

pub use export::*;
