//! Observability helpers (spans, tracing setup).

pub mod spans;
pub mod tracing_setup;

pub use spans::*;
pub use tracing_setup::*;
