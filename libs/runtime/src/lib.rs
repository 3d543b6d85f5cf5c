//! Process-level plumbing shared by binaries: layered configuration and
//! logging initialization.

pub mod config;
pub mod logging;

pub use config::{AppConfig, CliArgs, LogSection, LoggingConfig, ServerConfig};
pub use logging::init_logging_from_config;
