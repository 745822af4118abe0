//! Observability for the check commands
//!
//! Structured logging only; the tool is short-lived and exports no metrics.

pub mod logging;

pub use logging::{init_default_logging, init_logging, LogFormat};

// Span macros for structured logging
pub use logging::kafka_span;
