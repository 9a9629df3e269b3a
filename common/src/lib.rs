//! Shared plumbing for the imputation workspace: logging setup and
//! configuration file format detection.

pub mod file_format;
pub mod log_setup;

pub use file_format::{ConfigFormat, FileFormatError};
pub use log_setup::{LogConfig, LogSetupError, setup_logging};
