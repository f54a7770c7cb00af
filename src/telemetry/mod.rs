//! Logging setup
//!
//! Library code logs through `tracing` (and `log` in the host layer);
//! binaries call [`init_logging`] once at startup.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogGuard};
