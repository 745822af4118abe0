//! Command handlers
//!
//! Each handler takes parsed arguments, builds its own [`crate::config::CheckConfig`]
//! and returns a [`crate::error::CheckResult`]; logging the failure and picking
//! the exit status is left to the binary.

pub mod completion;
pub mod consumer;
pub mod producer;
