//! Shared utilities for the ballot workspace.

pub mod logging;
pub mod time;
pub mod tracing_spans;

pub use logging::{init_logging, LogFormat};
pub use time::{format_duration, format_millis};
