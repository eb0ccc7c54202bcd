//! Structured logging setup.
//!
//! # Modules
//!
//! - `init`: Subscriber construction from configuration
//! - `file_writer`: Size-rotating log file writer

pub mod file_writer;
pub mod init;

pub use file_writer::RotatingLogWriter;
pub use init::init_tracing;
