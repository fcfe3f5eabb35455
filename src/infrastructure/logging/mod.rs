//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or pretty console output on stderr
//! - Optional rolling JSON log files
//! - Secret scrubbing on every writer

pub mod config;
pub mod logger;
pub mod secret_scrubbing;

pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::LoggerImpl;
pub use secret_scrubbing::{ScrubbingMakeWriter, SecretScrubber};
