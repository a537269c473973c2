//! Logger configuration
//!
//! Settings come from a YAML file (`~/.config/msgkit/config.yaml` by default)
//! and can be overridden from the environment:
//! - `MSGKIT_NAME`, `MSGKIT_TEMPLATE`, `MSGKIT_TIME_FORMAT`
//! - `MSGKIT_LOG_LEVEL`: debug, info, warning or error
//! - `MSGKIT_EXIT_CODE`

mod error;
mod logger_config;

pub use error::{ConfigError, ConfigResult};
pub use logger_config::LoggerConfig;
